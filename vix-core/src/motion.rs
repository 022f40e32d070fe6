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

//! Motions: pure computations from cursor + repeat count to a target offset.
//!
//! Motions never mutate state; the session applies the result (or hands it to
//! a pending operator). Every motion that runs off the buffer clamps to the
//! last valid normal-mode offset instead of erroring.

use crate::buffer::ScriptBuffer;

pub(crate) fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

pub(crate) fn is_blank(c: char) -> bool {
    c.is_whitespace()
}

pub(crate) fn is_symbol(c: char) -> bool {
    !is_word_char(c) && !is_blank(c)
}

fn is_sentence_end(c: char) -> bool {
    matches!(c, '.' | '!' | '?')
}

/// The four char-search flavors: `f`, `F`, `t`, `T`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CharSearchKind {
    Find,
    FindBack,
    Till,
    TillBack,
}

impl CharSearchKind {
    pub fn from_key(c: char) -> Option<Self> {
        match c {
            'f' => Some(CharSearchKind::Find),
            'F' => Some(CharSearchKind::FindBack),
            't' => Some(CharSearchKind::Till),
            'T' => Some(CharSearchKind::TillBack),
            _ => None,
        }
    }

    /// The opposite direction, same till-ness (for `,`).
    pub fn reversed(self) -> Self {
        match self {
            CharSearchKind::Find => CharSearchKind::FindBack,
            CharSearchKind::FindBack => CharSearchKind::Find,
            CharSearchKind::Till => CharSearchKind::TillBack,
            CharSearchKind::TillBack => CharSearchKind::Till,
        }
    }
}

/// A remembered `f`/`F`/`t`/`T`, repeatable with `;` and `,`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CharSearch {
    pub ch: char,
    pub kind: CharSearchKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Motion {
    Left,
    Right,
    Up,
    Down,
    LineStart,
    FirstNonBlank,
    LineEnd,
    LastNonBlank,
    WordForward,
    WordEnd,
    WordBackward,
    PrevWordEnd,
    BigWordForward,
    BigWordEnd,
    BigWordBackward,
    ParagraphForward,
    ParagraphBackward,
    SentenceForward,
    SentenceBackward,
    /// Jump to a zero-based line (`gg`, `G`, `:N`).
    GotoLine(usize),
    MatchingBracket,
    ScreenTop,
    ScreenMiddle,
    ScreenBottom,
    HalfPageDown,
    HalfPageUp,
    PageDown,
    PageUp,
    NextLineFirstNonBlank,
    PrevLineFirstNonBlank,
    FirstNonBlankDown,
    Column,
    CharSearch(CharSearch),
}

impl Motion {
    /// Map a plain normal-mode key to its motion, if it is one.
    pub fn from_key(c: char) -> Option<Motion> {
        match c {
            'h' => Some(Motion::Left),
            'l' => Some(Motion::Right),
            'j' => Some(Motion::Down),
            'k' => Some(Motion::Up),
            '0' => Some(Motion::LineStart),
            '^' => Some(Motion::FirstNonBlank),
            '$' => Some(Motion::LineEnd),
            'w' => Some(Motion::WordForward),
            'W' => Some(Motion::BigWordForward),
            'e' => Some(Motion::WordEnd),
            'E' => Some(Motion::BigWordEnd),
            'b' => Some(Motion::WordBackward),
            'B' => Some(Motion::BigWordBackward),
            '}' => Some(Motion::ParagraphForward),
            '{' => Some(Motion::ParagraphBackward),
            ')' => Some(Motion::SentenceForward),
            '(' => Some(Motion::SentenceBackward),
            '%' => Some(Motion::MatchingBracket),
            'H' => Some(Motion::ScreenTop),
            'M' => Some(Motion::ScreenMiddle),
            'L' => Some(Motion::ScreenBottom),
            '+' => Some(Motion::NextLineFirstNonBlank),
            '-' => Some(Motion::PrevLineFirstNonBlank),
            '_' => Some(Motion::FirstNonBlankDown),
            '|' => Some(Motion::Column),
            _ => None,
        }
    }

    /// Map a `g`-prefixed key (`ge`, `g_`).
    pub fn from_g_key(c: char) -> Option<Motion> {
        match c {
            'e' => Some(Motion::PrevWordEnd),
            '_' => Some(Motion::LastNonBlank),
            _ => None,
        }
    }

    /// Map a ctrl-chord scroll key.
    pub fn from_ctrl_key(c: char) -> Option<Motion> {
        match c {
            'd' => Some(Motion::HalfPageDown),
            'u' => Some(Motion::HalfPageUp),
            'f' => Some(Motion::PageDown),
            'b' => Some(Motion::PageUp),
            _ => None,
        }
    }

    /// When combined with an operator, these motions include the char at the
    /// target offset (`de`, `d$`, `df,` ...). Everything else is
    /// end-exclusive.
    pub fn is_inclusive(&self) -> bool {
        matches!(
            self,
            Motion::WordEnd
                | Motion::BigWordEnd
                | Motion::PrevWordEnd
                | Motion::LineEnd
                | Motion::LastNonBlank
                | Motion::CharSearch(_)
        )
    }

    /// `dw`/`dW` cover the word run plus its trailing whitespace: the raw
    /// scan position, which may sit one past the last char where the cursor
    /// target clamps back. Other motions return `None` and use the cursor
    /// target with [`Motion::is_inclusive`].
    pub fn operator_end(&self, buf: &ScriptBuffer, cursor: usize, count: usize) -> Option<usize> {
        let count = count.max(1);
        match self {
            Motion::WordForward => Some(word_forward(buf, cursor, count).min(buf.len())),
            Motion::BigWordForward => Some(big_word_forward(buf, cursor, count).min(buf.len())),
            _ => None,
        }
    }

    /// These motions still apply a pending operator when the target equals
    /// the cursor (e.g. `d$` at the end of a line deletes the last char).
    pub fn operates_at_rest(&self) -> bool {
        matches!(
            self,
            Motion::LineEnd
                | Motion::LineStart
                | Motion::FirstNonBlank
                | Motion::GotoLine(_)
                | Motion::WordForward
                | Motion::BigWordForward
                | Motion::WordEnd
                | Motion::BigWordEnd
                | Motion::WordBackward
                | Motion::BigWordBackward
        )
    }

    /// Compute the target offset. Pure with respect to buffer + cursor.
    pub fn target(&self, buf: &ScriptBuffer, cursor: usize, count: usize) -> usize {
        let count = count.max(1);
        let line = buf.line_of(cursor);
        let col = buf.column_of(cursor);
        let last_line = buf.line_count().saturating_sub(1);

        let pos = match self {
            Motion::Left => cursor.saturating_sub(count).max(buf.line_start(line)),
            Motion::Right => {
                let eol = buf.line_end(line).saturating_sub(1).max(buf.line_start(line));
                (cursor + count).min(eol)
            }
            Motion::Down => buf.from_line_col(line + count, col),
            Motion::Up => buf.from_line_col(line.saturating_sub(count), col),
            Motion::LineStart => buf.line_start(line),
            Motion::FirstNonBlank => buf.first_non_blank(line),
            Motion::LineEnd => buf.line_end(line).saturating_sub(1).max(buf.line_start(line)),
            Motion::LastNonBlank => buf.last_non_blank(line),
            Motion::WordForward => word_forward(buf, cursor, count),
            Motion::WordEnd => word_end(buf, cursor, count),
            Motion::WordBackward => word_backward(buf, cursor, count),
            Motion::PrevWordEnd => prev_word_end(buf, cursor, count),
            Motion::BigWordForward => big_word_forward(buf, cursor, count),
            Motion::BigWordEnd => big_word_end(buf, cursor, count),
            Motion::BigWordBackward => big_word_backward(buf, cursor, count),
            Motion::ParagraphForward => {
                let mut l = line;
                for _ in 0..count {
                    while l < last_line && !buf.is_line_blank(l) {
                        l += 1;
                    }
                    while l < last_line && buf.is_line_blank(l) {
                        l += 1;
                    }
                }
                buf.line_start(l)
            }
            Motion::ParagraphBackward => {
                let mut l = line;
                for _ in 0..count {
                    while l > 0 && !buf.is_line_blank(l) {
                        l -= 1;
                    }
                    while l > 0 && buf.is_line_blank(l) {
                        l -= 1;
                    }
                }
                buf.line_start(l)
            }
            Motion::SentenceForward => sentence_forward(buf, cursor, count),
            Motion::SentenceBackward => sentence_backward(buf, cursor, count),
            Motion::GotoLine(l) => buf.line_start(*l),
            Motion::MatchingBracket => matching_bracket(buf, cursor),
            Motion::ScreenTop => buf.line_start(line.saturating_sub(10)),
            Motion::ScreenMiddle => buf.line_start(buf.line_count() / 2),
            Motion::ScreenBottom => buf.line_start((line + 10).min(last_line)),
            Motion::HalfPageDown => buf.from_line_col((line + 15).min(last_line), col),
            Motion::HalfPageUp => buf.from_line_col(line.saturating_sub(15), col),
            Motion::PageDown => buf.from_line_col((line + 30).min(last_line), col),
            Motion::PageUp => buf.from_line_col(line.saturating_sub(30), col),
            Motion::NextLineFirstNonBlank => buf.first_non_blank((line + count).min(last_line)),
            Motion::PrevLineFirstNonBlank => buf.first_non_blank(line.saturating_sub(count)),
            Motion::FirstNonBlankDown => buf.first_non_blank((line + count - 1).min(last_line)),
            Motion::Column => buf.from_line_col(line, count - 1),
            Motion::CharSearch(search) => char_search(buf, cursor, *search),
        };
        buf.clamp_normal(pos)
    }
}

fn word_forward(buf: &ScriptBuffer, cursor: usize, count: usize) -> usize {
    let mut pos = cursor;
    for _ in 0..count {
        while buf.char_at(pos).is_some_and(is_word_char) {
            pos += 1;
        }
        while buf.char_at(pos).is_some_and(is_symbol) {
            pos += 1;
        }
        while buf.char_at(pos).is_some_and(is_blank) {
            pos += 1;
        }
    }
    pos
}

fn big_word_forward(buf: &ScriptBuffer, cursor: usize, count: usize) -> usize {
    let mut pos = cursor;
    for _ in 0..count {
        while buf.char_at(pos).is_some_and(|c| !is_blank(c)) {
            pos += 1;
        }
        while buf.char_at(pos).is_some_and(is_blank) {
            pos += 1;
        }
    }
    pos
}

fn word_end(buf: &ScriptBuffer, cursor: usize, count: usize) -> usize {
    let len = buf.len();
    let mut pos = cursor;
    for _ in 0..count {
        pos += 1;
        while buf.char_at(pos).is_some_and(is_blank) {
            pos += 1;
        }
        while pos + 1 < len
            && buf.char_at(pos).is_some_and(is_word_char)
            && buf.char_at(pos + 1).is_some_and(is_word_char)
        {
            pos += 1;
        }
        if buf.char_at(pos).is_some_and(is_symbol) {
            while pos + 1 < len && buf.char_at(pos + 1).is_some_and(is_symbol) {
                pos += 1;
            }
        }
    }
    pos
}

fn big_word_end(buf: &ScriptBuffer, cursor: usize, count: usize) -> usize {
    let len = buf.len();
    let mut pos = cursor;
    for _ in 0..count {
        pos += 1;
        while buf.char_at(pos).is_some_and(is_blank) {
            pos += 1;
        }
        while pos + 1 < len && buf.char_at(pos + 1).is_some_and(|c| !is_blank(c)) {
            pos += 1;
        }
    }
    pos
}

fn word_backward(buf: &ScriptBuffer, cursor: usize, count: usize) -> usize {
    let mut pos = cursor;
    for _ in 0..count {
        if pos == 0 {
            break;
        }
        pos -= 1;
        while pos > 0 && buf.char_at(pos).is_some_and(is_blank) {
            pos -= 1;
        }
        if pos > 0 && buf.char_at(pos).is_some_and(is_symbol) {
            while pos > 0 && buf.char_at(pos - 1).is_some_and(is_symbol) {
                pos -= 1;
            }
        } else {
            while pos > 0 && buf.char_at(pos - 1).is_some_and(is_word_char) {
                pos -= 1;
            }
        }
    }
    pos
}

fn big_word_backward(buf: &ScriptBuffer, cursor: usize, count: usize) -> usize {
    let mut pos = cursor;
    for _ in 0..count {
        if pos == 0 {
            break;
        }
        pos -= 1;
        while pos > 0 && buf.char_at(pos).is_some_and(is_blank) {
            pos -= 1;
        }
        while pos > 0 && buf.char_at(pos - 1).is_some_and(|c| !is_blank(c)) {
            pos -= 1;
        }
    }
    pos
}

fn prev_word_end(buf: &ScriptBuffer, cursor: usize, count: usize) -> usize {
    let mut pos = cursor;
    for _ in 0..count {
        if pos == 0 {
            break;
        }
        pos -= 1;
        while pos > 0 && buf.char_at(pos).is_some_and(is_blank) {
            pos -= 1;
        }
    }
    pos
}

fn sentence_forward(buf: &ScriptBuffer, cursor: usize, count: usize) -> usize {
    let len = buf.len();
    let mut pos = cursor;
    for _ in 0..count {
        while pos < len && !buf.char_at(pos).is_some_and(is_sentence_end) {
            pos += 1;
        }
        pos += 1;
        while pos < len && buf.char_at(pos).is_some_and(is_blank) {
            pos += 1;
        }
    }
    pos.min(len)
}

fn sentence_backward(buf: &ScriptBuffer, cursor: usize, count: usize) -> usize {
    let mut pos = cursor;
    for _ in 0..count {
        if pos == 0 {
            break;
        }
        pos -= 1;
        while pos > 0 && buf.char_at(pos).is_some_and(is_blank) {
            pos -= 1;
        }
        while pos > 0 && !buf.char_at(pos).is_some_and(is_sentence_end) {
            pos -= 1;
        }
        if pos > 0 {
            pos -= 1;
            while pos > 0 && buf.char_at(pos).is_some_and(is_blank) {
                pos -= 1;
            }
            while pos > 0 && !buf.char_at(pos - 1).is_some_and(is_sentence_end) {
                pos -= 1;
            }
        }
    }
    pos
}

/// `%`: only fires when the cursor sits on a bracket char; otherwise the
/// cursor is returned unchanged. Tracks nesting depth in the direction the
/// bracket implies.
fn matching_bracket(buf: &ScriptBuffer, cursor: usize) -> usize {
    let Some(ch) = buf.char_at(cursor) else {
        return cursor;
    };
    let (target, forward) = match ch {
        '(' => (')', true),
        '[' => (']', true),
        '{' => ('}', true),
        '<' => ('>', true),
        ')' => ('(', false),
        ']' => ('[', false),
        '}' => ('{', false),
        '>' => ('<', false),
        _ => return cursor,
    };

    let mut depth = 1usize;
    if forward {
        let mut pos = cursor + 1;
        while let Some(c) = buf.char_at(pos) {
            if c == ch {
                depth += 1;
            } else if c == target {
                depth -= 1;
                if depth == 0 {
                    return pos;
                }
            }
            pos += 1;
        }
    } else {
        let mut pos = cursor;
        while pos > 0 {
            pos -= 1;
            match buf.char_at(pos) {
                Some(c) if c == ch => depth += 1,
                Some(c) if c == target => {
                    depth -= 1;
                    if depth == 0 {
                        return pos;
                    }
                }
                _ => {}
            }
        }
    }
    cursor
}

/// `f`/`F`/`t`/`T`: scan the current line only; the cursor is returned
/// unchanged when the char does not occur.
fn char_search(buf: &ScriptBuffer, cursor: usize, search: CharSearch) -> usize {
    let line = buf.line_of(cursor);
    match search.kind {
        CharSearchKind::Find | CharSearchKind::Till => {
            let end = buf.line_end(line);
            let mut pos = cursor + 1;
            while pos < end {
                if buf.char_at(pos) == Some(search.ch) {
                    return if search.kind == CharSearchKind::Till {
                        pos - 1
                    } else {
                        pos
                    };
                }
                pos += 1;
            }
            cursor
        }
        CharSearchKind::FindBack | CharSearchKind::TillBack => {
            let start = buf.line_start(line);
            let mut pos = cursor;
            while pos > start {
                pos -= 1;
                if buf.char_at(pos) == Some(search.ch) {
                    return if search.kind == CharSearchKind::TillBack {
                        pos + 1
                    } else {
                        pos
                    };
                }
            }
            cursor
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn buf(text: &str) -> ScriptBuffer {
        ScriptBuffer::new(text)
    }

    #[test]
    fn test_word_forward_runs() {
        let b = buf("foo bar baz");
        assert_eq!(Motion::WordForward.target(&b, 0, 1), 4);
        assert_eq!(Motion::WordForward.target(&b, 4, 1), 8);
        // counts multiply
        assert_eq!(Motion::WordForward.target(&b, 0, 2), 8);
        // clamps at the end
        assert_eq!(Motion::WordForward.target(&b, 8, 3), 10);
    }

    #[test]
    fn test_word_forward_symbol_runs() {
        let b = buf("foo();bar");
        // from 'f': skip word run, then the symbol run, land on 'b'
        assert_eq!(Motion::WordForward.target(&b, 0, 1), 6);
    }

    #[test]
    fn test_big_word_forward() {
        let b = buf("hello world  test\n  another line");
        assert_eq!(Motion::BigWordForward.target(&b, 0, 1), 6);
        assert_eq!(Motion::BigWordForward.target(&b, 6, 1), 13);
        assert_eq!(Motion::BigWordForward.target(&b, 13, 1), 20);
    }

    #[test]
    fn test_word_end() {
        let b = buf("foo bar baz");
        assert_eq!(Motion::WordEnd.target(&b, 0, 1), 2);
        assert_eq!(Motion::WordEnd.target(&b, 2, 1), 6);
    }

    #[test]
    fn test_word_backward() {
        let b = buf("foo bar baz");
        assert_eq!(Motion::WordBackward.target(&b, 8, 1), 4);
        assert_eq!(Motion::WordBackward.target(&b, 4, 1), 0);
        assert_eq!(Motion::WordBackward.target(&b, 0, 1), 0);
    }

    #[test]
    fn test_h_l_clamp_to_line() {
        let b = buf("ab\ncd");
        // 'l' never crosses the newline
        assert_eq!(Motion::Right.target(&b, 1, 5), 1);
        // 'h' never crosses the line start
        assert_eq!(Motion::Left.target(&b, 3, 5), 3);
    }

    #[test]
    fn test_j_k_preserve_column() {
        let b = buf("abcdef\nxy\nlonger line");
        let pos = Motion::Down.target(&b, 4, 1); // col 4 clamps to 'y' end
        assert_eq!(b.line_of(pos), 1);
        assert_eq!(b.column_of(pos), 1);
        let pos = Motion::Down.target(&b, 4, 2);
        assert_eq!(b.line_of(pos), 2);
        assert_eq!(b.column_of(pos), 4);
    }

    #[test]
    fn test_line_relative() {
        let b = buf("  foo bar  ");
        assert_eq!(Motion::LineStart.target(&b, 6, 1), 0);
        assert_eq!(Motion::FirstNonBlank.target(&b, 6, 1), 2);
        assert_eq!(Motion::LineEnd.target(&b, 0, 1), 10);
        assert_eq!(Motion::LastNonBlank.target(&b, 0, 1), 8);
    }

    #[test]
    fn test_paragraph_motions() {
        let b = buf("one\ntwo\n\nthree\nfour\n\n\nfive");
        assert_eq!(Motion::ParagraphForward.target(&b, 0, 1), 9); // "three"
        assert_eq!(Motion::ParagraphForward.target(&b, 0, 2), 22); // "five"
        assert_eq!(Motion::ParagraphBackward.target(&b, 22, 1), 9);
    }

    #[test]
    fn test_sentence_forward() {
        let b = buf("One. Two! Three");
        assert_eq!(Motion::SentenceForward.target(&b, 0, 1), 5);
        assert_eq!(Motion::SentenceForward.target(&b, 5, 1), 10);
    }

    #[test]
    fn test_goto_line() {
        let b = buf("a\nb\nc\nd");
        assert_eq!(Motion::GotoLine(2).target(&b, 0, 1), 4);
        assert_eq!(Motion::GotoLine(99).target(&b, 0, 1), 6);
    }

    #[test]
    fn test_matching_bracket() {
        let b = buf("fn foo(a, (b))");
        assert_eq!(Motion::MatchingBracket.target(&b, 6, 1), 13);
        assert_eq!(Motion::MatchingBracket.target(&b, 13, 1), 6);
        assert_eq!(Motion::MatchingBracket.target(&b, 10, 1), 12);
        // not a bracket: unchanged
        assert_eq!(Motion::MatchingBracket.target(&b, 0, 1), 0);
    }

    #[test]
    fn test_unmatched_bracket_stays_put() {
        let b = buf("(abc");
        assert_eq!(Motion::MatchingBracket.target(&b, 0, 1), 0);
    }

    #[test]
    fn test_char_search_on_line_only() {
        let b = buf("abcabc\nxaz");
        let f = |kind| CharSearch { ch: 'a', kind };
        assert_eq!(
            Motion::CharSearch(f(CharSearchKind::Find)).target(&b, 0, 1),
            3
        );
        assert_eq!(
            Motion::CharSearch(f(CharSearchKind::Till)).target(&b, 0, 1),
            2
        );
        assert_eq!(
            Motion::CharSearch(f(CharSearchKind::FindBack)).target(&b, 5, 1),
            3
        );
        // no occurrence ahead on this line: cursor unchanged
        assert_eq!(
            Motion::CharSearch(f(CharSearchKind::Find)).target(&b, 3, 1),
            3
        );
    }

    #[test]
    fn test_clamping_invariant() {
        let b = buf("short");
        let motions = [
            Motion::Right,
            Motion::WordForward,
            Motion::WordEnd,
            Motion::LineEnd,
            Motion::ParagraphForward,
            Motion::SentenceForward,
            Motion::GotoLine(50),
            Motion::PageDown,
        ];
        for m in motions {
            let t = m.target(&b, 4, 9);
            assert!(t <= 4, "{m:?} escaped the buffer: {t}");
        }
    }

    #[test]
    fn test_column_motion() {
        let b = buf("abcdef");
        assert_eq!(Motion::Column.target(&b, 0, 4), 3);
        assert_eq!(Motion::Column.target(&b, 0, 99), 5);
    }
}
