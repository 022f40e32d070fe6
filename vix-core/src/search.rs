// Copyright (C) 2025 Vix contributors. This program is free software: you can
// redistribute it and/or modify it under the terms of the GNU General Public
// License as published by the Free Software Foundation, version 3.
//
// This program is distributed in the hope that it will be useful, but WITHOUT
// ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS
// FOR A PARTICULAR PURPOSE. See the GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License along with
// this program. If not, see <https://www.gnu.org/licenses/>.
//

//! Regex search over the buffer: `/`, `n`/`N`, `*`/`#`.
//!
//! Match positions are char offsets (the buffer's currency), converted from
//! the byte offsets the regex engine reports. The match list persists until
//! the next search or `:noh`, so `n`/`N` keep cycling with wraparound.

use regex::RegexBuilder;
use tracing::debug;

use crate::buffer::ScriptBuffer;
use crate::motion::is_word_char;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Match {
    pub start: usize,
    pub end: usize,
}

#[derive(Debug, PartialEq, Eq)]
pub enum SearchResult {
    /// Cursor target plus total match count.
    Found { target: usize, count: usize },
    NotFound,
    InvalidPattern,
}

#[derive(Debug, PartialEq, Eq)]
pub enum WordSearchResult {
    Found {
        target: usize,
        count: usize,
        pattern: String,
    },
    NoWordUnderCursor,
    NotFound,
}

#[derive(Debug, Default)]
pub struct SearchState {
    pattern: String,
    matches: Vec<Match>,
    current: Option<usize>,
}

impl SearchState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn matches(&self) -> &[Match] {
        &self.matches
    }

    /// `:noh` and empty `/` both land here.
    pub fn clear(&mut self) {
        self.matches.clear();
        self.current = None;
    }

    /// Run a `/` search. Always case-insensitive; the cursor jumps to the
    /// first match in the buffer.
    pub fn perform(&mut self, buf: &ScriptBuffer, pattern: &str) -> SearchResult {
        if pattern.is_empty() {
            self.clear();
            return SearchResult::NotFound;
        }
        let re = match RegexBuilder::new(pattern).case_insensitive(true).build() {
            Ok(re) => re,
            Err(_) => return SearchResult::InvalidPattern,
        };
        self.pattern = pattern.to_string();
        self.matches = find_matches(&re, &buf.content());
        debug!(pattern, count = self.matches.len(), "search");
        match self.matches.first() {
            Some(m) => {
                self.current = Some(0);
                SearchResult::Found {
                    target: m.start,
                    count: self.matches.len(),
                }
            }
            None => {
                self.current = None;
                SearchResult::NotFound
            }
        }
    }

    /// `*` / `#`: whole-word search for the identifier under the cursor,
    /// case-sensitive, jumping to the nearest match in the given direction.
    pub fn word_search(
        &mut self,
        buf: &ScriptBuffer,
        cursor: usize,
        forward: bool,
    ) -> WordSearchResult {
        let Some(word) = word_under_cursor(buf, cursor) else {
            return WordSearchResult::NoWordUnderCursor;
        };
        let pattern = format!(r"\b{}\b", regex::escape(&word));
        let re = match RegexBuilder::new(&pattern).build() {
            // escaped identifiers always compile
            Ok(re) => re,
            Err(_) => return WordSearchResult::NotFound,
        };
        let matches = find_matches(&re, &buf.content());
        if matches.is_empty() {
            return WordSearchResult::NotFound;
        }

        let idx = if forward {
            matches.iter().position(|m| m.start > cursor).unwrap_or(0)
        } else {
            matches
                .iter()
                .rposition(|m| m.start < cursor)
                .unwrap_or(matches.len() - 1)
        };
        let target = matches[idx].start;
        let count = matches.len();
        self.pattern = pattern.clone();
        self.matches = matches;
        self.current = Some(idx);
        WordSearchResult::Found {
            target,
            count,
            pattern,
        }
    }

    /// `n`: cycle forward with wraparound. Returns the new cursor target.
    pub fn next(&mut self) -> Option<usize> {
        if self.matches.is_empty() {
            return None;
        }
        let idx = match self.current {
            Some(i) => (i + 1) % self.matches.len(),
            None => 0,
        };
        self.current = Some(idx);
        Some(self.matches[idx].start)
    }

    /// `N`: cycle backward with wraparound.
    pub fn prev(&mut self) -> Option<usize> {
        if self.matches.is_empty() {
            return None;
        }
        let idx = match self.current {
            Some(0) | None => self.matches.len() - 1,
            Some(i) => i - 1,
        };
        self.current = Some(idx);
        Some(self.matches[idx].start)
    }
}

/// Collect all matches, converting byte offsets to char offsets in a single
/// left-to-right pass.
fn find_matches(re: &regex::Regex, content: &str) -> Vec<Match> {
    let mut out = Vec::new();
    let mut chars = 0usize;
    let mut last_byte = 0usize;
    for m in re.find_iter(content) {
        chars += content[last_byte..m.start()].chars().count();
        let start = chars;
        chars += content[m.start()..m.end()].chars().count();
        last_byte = m.end();
        out.push(Match { start, end: chars });
    }
    out
}

/// The run of word chars the cursor sits in, or `None` when it sits on
/// whitespace or punctuation.
fn word_under_cursor(buf: &ScriptBuffer, cursor: usize) -> Option<String> {
    if !buf.char_at(cursor).is_some_and(is_word_char) {
        return None;
    }
    let mut start = cursor;
    let mut end = cursor;
    while start > 0 && buf.char_at(start - 1).is_some_and(is_word_char) {
        start -= 1;
    }
    while end + 1 < buf.len() && buf.char_at(end + 1).is_some_and(is_word_char) {
        end += 1;
    }
    Some(buf.slice(start, end + 1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_is_case_insensitive() {
        let buf = ScriptBuffer::new("foo Foo FOO");
        let mut s = SearchState::new();
        assert_eq!(
            s.perform(&buf, "foo"),
            SearchResult::Found { target: 0, count: 3 }
        );
    }

    #[test]
    fn test_next_prev_wrap_around() {
        let buf = ScriptBuffer::new("a b a b a");
        let mut s = SearchState::new();
        s.perform(&buf, "a");
        assert_eq!(s.next(), Some(4));
        assert_eq!(s.next(), Some(8));
        assert_eq!(s.next(), Some(0));
        assert_eq!(s.prev(), Some(8));
    }

    #[test]
    fn test_not_found_and_invalid() {
        let buf = ScriptBuffer::new("abc");
        let mut s = SearchState::new();
        assert_eq!(s.perform(&buf, "zzz"), SearchResult::NotFound);
        assert_eq!(s.perform(&buf, "[unclosed"), SearchResult::InvalidPattern);
    }

    #[test]
    fn test_clear_stops_cycling() {
        let buf = ScriptBuffer::new("x x");
        let mut s = SearchState::new();
        s.perform(&buf, "x");
        s.clear();
        assert_eq!(s.next(), None);
        assert_eq!(s.prev(), None);
    }

    #[test]
    fn test_word_search_whole_words_only() {
        //                          0123456789012345678
        let buf = ScriptBuffer::new("foo foobar foo");
        let mut s = SearchState::new();
        match s.word_search(&buf, 1, true) {
            WordSearchResult::Found { target, count, .. } => {
                assert_eq!(count, 2); // foobar is not a whole-word match
                assert_eq!(target, 11);
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn test_word_search_backward_wraps() {
        let buf = ScriptBuffer::new("foo bar foo");
        let mut s = SearchState::new();
        match s.word_search(&buf, 0, false) {
            WordSearchResult::Found { target, .. } => assert_eq!(target, 8),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn test_word_search_needs_a_word() {
        let buf = ScriptBuffer::new("   ");
        let mut s = SearchState::new();
        assert_eq!(
            s.word_search(&buf, 1, true),
            WordSearchResult::NoWordUnderCursor
        );
    }

    #[test]
    fn test_match_offsets_are_char_based() {
        let buf = ScriptBuffer::new("héllo wörld wörld");
        let mut s = SearchState::new();
        match s.perform(&buf, "wörld") {
            SearchResult::Found { target, count } => {
                assert_eq!(target, 6);
                assert_eq!(count, 2);
                assert_eq!(s.matches()[1].start, 12);
            }
            other => panic!("unexpected: {other:?}"),
        }
    }
}
