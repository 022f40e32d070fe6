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

//! Text objects: the `i`/`a` targets operators and visual mode act on.
//!
//! Resolution yields an end-exclusive char range, or `None` when the object
//! does not exist at the cursor (no enclosing quote pair on the line, no
//! enclosing bracket pair in the buffer).

use crate::buffer::ScriptBuffer;
use crate::motion::{is_blank, is_word_char};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextObjectModifier {
    Inner,
    Around,
}

impl TextObjectModifier {
    pub fn from_key(c: char) -> Option<Self> {
        match c {
            'i' => Some(TextObjectModifier::Inner),
            'a' => Some(TextObjectModifier::Around),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextObject {
    Word,
    BigWord,
    Quote(char),
    Bracket(char, char),
    Paragraph,
    Line,
}

impl TextObject {
    pub fn from_key(c: char) -> Option<Self> {
        match c {
            'w' => Some(TextObject::Word),
            'W' => Some(TextObject::BigWord),
            '"' | '\'' | '`' => Some(TextObject::Quote(c)),
            '(' | ')' | 'b' => Some(TextObject::Bracket('(', ')')),
            '[' | ']' => Some(TextObject::Bracket('[', ']')),
            '{' | '}' | 'B' => Some(TextObject::Bracket('{', '}')),
            '<' | '>' => Some(TextObject::Bracket('<', '>')),
            'p' => Some(TextObject::Paragraph),
            'l' => Some(TextObject::Line),
            _ => None,
        }
    }

    /// Resolve to an end-exclusive range at `cursor`.
    pub fn resolve(
        &self,
        buf: &ScriptBuffer,
        cursor: usize,
        modifier: TextObjectModifier,
    ) -> Option<(usize, usize)> {
        let around = modifier == TextObjectModifier::Around;
        match self {
            TextObject::Word => {
                let (start, end) = inner_word(buf, cursor, false);
                Some(if around {
                    widen_with_whitespace(buf, start, end)
                } else {
                    (start, end)
                })
            }
            TextObject::BigWord => {
                let (start, end) = inner_word(buf, cursor, true);
                Some(if around {
                    widen_with_whitespace(buf, start, end)
                } else {
                    (start, end)
                })
            }
            TextObject::Quote(q) => {
                let (start, end) = inner_quote(buf, cursor, *q)?;
                Some(if around { (start - 1, end + 1) } else { (start, end) })
            }
            TextObject::Bracket(open, close) => {
                let (start, end) = inner_bracket(buf, cursor, *open, *close)?;
                Some(if around { (start - 1, end + 1) } else { (start, end) })
            }
            // `ip` and `ap` behave identically here.
            TextObject::Paragraph => Some(paragraph(buf, cursor)),
            TextObject::Line => {
                let line = buf.line_of(cursor);
                Some((buf.first_non_blank(line), buf.line_end(line)))
            }
        }
    }
}

/// Expand from the cursor over the run it sits in. `iw` distinguishes word,
/// whitespace and symbol runs; `iW` only whitespace vs non-whitespace.
fn inner_word(buf: &ScriptBuffer, cursor: usize, big: bool) -> (usize, usize) {
    #[derive(Clone, Copy, PartialEq)]
    enum Class {
        Word,
        Blank,
        Symbol,
    }
    let classify = |c: char| {
        if is_blank(c) {
            Class::Blank
        } else if big || is_word_char(c) {
            Class::Word
        } else {
            Class::Symbol
        }
    };
    let cls = match buf.char_at(cursor) {
        Some(c) => classify(c),
        // past the end of the buffer: symbol run, which expands over nothing
        None if !big => Class::Symbol,
        None => Class::Word,
    };

    let len = buf.len();
    let mut start = cursor;
    let mut end = cursor;
    while start > 0 && buf.char_at(start - 1).is_some_and(|c| classify(c) == cls) {
        start -= 1;
    }
    while end + 1 < len && buf.char_at(end + 1).is_some_and(|c| classify(c) == cls) {
        end += 1;
    }
    (start, end + 1)
}

/// `aw`/`aW`: take trailing whitespace, or leading when there is none.
fn widen_with_whitespace(buf: &ScriptBuffer, start: usize, end: usize) -> (usize, usize) {
    let mut start = start;
    let mut end = end;
    if buf.char_at(end).is_some_and(is_blank) {
        while buf.char_at(end).is_some_and(is_blank) {
            end += 1;
        }
    } else if start > 0 && buf.char_at(start - 1).is_some_and(is_blank) {
        while start > 0 && buf.char_at(start - 1).is_some_and(is_blank) {
            start -= 1;
        }
    }
    (start, end)
}

/// Scan the cursor's line for an unescaped quote pair containing the cursor
/// column. Pairs are matched left to right, so `i"` in the gap between two
/// pairs resolves to neither.
fn inner_quote(buf: &ScriptBuffer, cursor: usize, quote: char) -> Option<(usize, usize)> {
    let line = buf.line_of(cursor);
    let line_start = buf.line_start(line);
    let text: Vec<char> = buf.line_text(line).chars().collect();
    let cursor_col = cursor - line_start;

    let mut first = None;
    for (i, &c) in text.iter().enumerate() {
        if c != quote || (i > 0 && text[i - 1] == '\\') {
            continue;
        }
        match first {
            None => first = Some(i),
            Some(f) => {
                if cursor_col >= f && cursor_col <= i {
                    return Some((line_start + f + 1, line_start + i));
                }
                first = None;
            }
        }
    }
    None
}

/// Depth-tracked scan out from the cursor for the nearest enclosing pair.
fn inner_bracket(
    buf: &ScriptBuffer,
    cursor: usize,
    open: char,
    close: char,
) -> Option<(usize, usize)> {
    let mut depth = 0usize;
    let mut start = None;
    let mut pos = cursor.min(buf.len().saturating_sub(1)) as isize;
    while pos >= 0 {
        let c = buf.char_at(pos as usize)?;
        if c == close {
            depth += 1;
        }
        if c == open {
            if depth == 0 {
                start = Some(pos as usize + 1);
                break;
            }
            depth -= 1;
        }
        pos -= 1;
    }
    let start = start?;

    let mut depth = 0usize;
    for i in cursor..buf.len() {
        let c = buf.char_at(i)?;
        if c == open {
            depth += 1;
        }
        if c == close {
            if depth == 0 {
                return Some((start, i));
            }
            depth -= 1;
        }
    }
    None
}

/// The blank-line-delimited block of lines around the cursor.
fn paragraph(buf: &ScriptBuffer, cursor: usize) -> (usize, usize) {
    let mut start_line = buf.line_of(cursor);
    let mut end_line = start_line;
    while start_line > 0 && !buf.is_line_blank(start_line - 1) {
        start_line -= 1;
    }
    let last = buf.line_count().saturating_sub(1);
    while end_line < last && !buf.is_line_blank(end_line + 1) {
        end_line += 1;
    }
    (buf.line_start(start_line), buf.line_end(end_line))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolve(text: &str, cursor: usize, modifier: char, object: char) -> Option<(usize, usize)> {
        let buf = ScriptBuffer::new(text);
        let m = TextObjectModifier::from_key(modifier).unwrap();
        TextObject::from_key(object).unwrap().resolve(&buf, cursor, m)
    }

    #[test]
    fn test_inner_word() {
        //            0123456789
        let ranges = [
            resolve("hello world", 2, 'i', 'w'),
            resolve("hello world", 0, 'i', 'w'),
            resolve("hello world", 4, 'i', 'w'),
        ];
        for r in ranges {
            assert_eq!(r, Some((0, 5)));
        }
        assert_eq!(resolve("hello world", 7, 'i', 'w'), Some((6, 11)));
        // on whitespace: the whitespace run itself
        assert_eq!(resolve("a   b", 2, 'i', 'w'), Some((1, 4)));
        // on a symbol run
        assert_eq!(resolve("a();b", 2, 'i', 'w'), Some((1, 4)));
    }

    #[test]
    fn test_a_word_takes_trailing_whitespace() {
        assert_eq!(resolve("hello world", 2, 'a', 'w'), Some((0, 6)));
        // no trailing: takes leading instead
        assert_eq!(resolve("hello world", 7, 'a', 'w'), Some((5, 11)));
    }

    #[test]
    fn test_big_word() {
        assert_eq!(resolve("foo(x) bar", 2, 'i', 'W'), Some((0, 6)));
        assert_eq!(resolve("foo(x) bar", 2, 'a', 'W'), Some((0, 7)));
    }

    #[test]
    fn test_quote_objects() {
        //            0123456789012345678901
        let text = r#"say "hello world" now"#;
        assert_eq!(resolve(text, 8, 'i', '"'), Some((5, 16)));
        assert_eq!(resolve(text, 8, 'a', '"'), Some((4, 17)));
        // cursor outside every pair
        assert_eq!(resolve(text, 1, 'i', '"'), None);
        // escaped quotes are not delimiters
        assert_eq!(resolve(r#"a "x\"y" b"#, 5, 'i', '"'), Some((3, 7)));
    }

    #[test]
    fn test_bracket_objects_nest() {
        //           0123456789012
        let text = "f(a, (b), c)";
        assert_eq!(resolve(text, 6, 'i', 'b'), Some((6, 7)));
        assert_eq!(resolve(text, 3, 'i', 'b'), Some((2, 11)));
        assert_eq!(resolve(text, 3, 'a', 'b'), Some((1, 12)));
        assert_eq!(resolve("no brackets", 3, 'i', 'b'), None);
    }

    #[test]
    fn test_paragraph_object() {
        let text = "one\ntwo\n\nthree\nfour";
        assert_eq!(resolve(text, 5, 'i', 'p'), Some((0, 7)));
        assert_eq!(resolve(text, 10, 'i', 'p'), Some((9, 19)));
    }

    #[test]
    fn test_line_object() {
        assert_eq!(resolve("  foo bar\nnext", 4, 'i', 'l'), Some((2, 9)));
    }
}
