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

//! The text buffer and all line/offset arithmetic.
//!
//! A `ScriptBuffer` is the sole source of truth for content. Positions are
//! zero-based char offsets; lines and columns are always derived from the
//! rope, never stored. Out-of-range input is clamped everywhere - navigation
//! never fails and never panics.

pub struct ScriptBuffer {
    rope: ropey::Rope,
}

impl ScriptBuffer {
    pub fn new(text: &str) -> Self {
        Self {
            rope: ropey::Rope::from_str(text),
        }
    }

    pub fn empty() -> Self {
        Self {
            rope: ropey::Rope::new(),
        }
    }

    /// Replace the entire content (loading a different script).
    pub fn replace_content(&mut self, text: &str) {
        self.rope = ropey::Rope::from_str(text);
    }

    pub fn content(&self) -> String {
        self.rope.to_string()
    }

    /// Total length in chars.
    pub fn len(&self) -> usize {
        self.rope.len_chars()
    }

    pub fn is_empty(&self) -> bool {
        self.rope.len_chars() == 0
    }

    pub fn line_count(&self) -> usize {
        self.rope.len_lines()
    }

    pub fn char_at(&self, pos: usize) -> Option<char> {
        if pos < self.rope.len_chars() {
            Some(self.rope.char(pos))
        } else {
            None
        }
    }

    /// The line containing `pos`. O(log N)
    pub fn line_of(&self, pos: usize) -> usize {
        self.rope.char_to_line(self.clamp_insert(pos))
    }

    /// The column of `pos` within its line. O(log N)
    pub fn column_of(&self, pos: usize) -> usize {
        let pos = self.clamp_insert(pos);
        pos - self.rope.line_to_char(self.rope.char_to_line(pos))
    }

    /// Offset of the first char of `line`. Lines out of range clamp.
    pub fn line_start(&self, line: usize) -> usize {
        let line = line.min(self.line_count().saturating_sub(1));
        self.rope.line_to_char(line)
    }

    /// Offset one past the last char of `line` (the newline position, or the
    /// end of the buffer on the final line). An empty line has
    /// `line_start == line_end`.
    pub fn line_end(&self, line: usize) -> usize {
        let line = line.min(self.line_count().saturating_sub(1));
        self.line_start(line) + self.line_len(line)
    }

    /// Length of `line` excluding its terminator. O(log N)
    pub fn line_len(&self, line: usize) -> usize {
        if line >= self.line_count() {
            return 0;
        }
        let start = self.rope.line_to_char(line);
        if line + 1 < self.line_count() {
            self.rope.line_to_char(line + 1) - start - 1
        } else {
            self.rope.len_chars() - start
        }
    }

    pub fn line_text(&self, line: usize) -> String {
        if line >= self.line_count() {
            return String::new();
        }
        let s = self.line_start(line);
        self.rope.slice(s..s + self.line_len(line)).to_string()
    }

    pub fn is_line_blank(&self, line: usize) -> bool {
        if line >= self.line_count() {
            return true;
        }
        self.rope.line(line).chars().all(|c| c.is_whitespace())
    }

    /// Offset of the first non-blank char of `line`, clamped onto the line
    /// (a line of pure whitespace yields its last char).
    pub fn first_non_blank(&self, line: usize) -> usize {
        let line = line.min(self.line_count().saturating_sub(1));
        let len = self.line_len(line);
        let leading = self
            .rope
            .line(line)
            .chars()
            .take(len)
            .take_while(|c| c.is_whitespace())
            .count();
        self.line_start(line) + leading.min(len.saturating_sub(1))
    }

    /// Offset of the last non-blank char of `line` (line start when blank).
    pub fn last_non_blank(&self, line: usize) -> usize {
        let line = line.min(self.line_count().saturating_sub(1));
        let text = self.line_text(line);
        let trimmed = text.trim_end().chars().count();
        self.line_start(line) + trimmed.saturating_sub(1)
    }

    /// Offset for a line/column pair, clamping the line to the buffer and the
    /// column to the clamped line's content (last char, not the terminator).
    pub fn from_line_col(&self, line: usize, col: usize) -> usize {
        let line = line.min(self.line_count().saturating_sub(1));
        let len = self.line_len(line);
        self.line_start(line) + col.min(len.saturating_sub(1))
    }

    /// Clamp for normal-mode cursor placement: `[0, max(0, len-1)]`.
    pub fn clamp_normal(&self, pos: usize) -> usize {
        pos.min(self.len().saturating_sub(1))
    }

    /// Clamp for insert-mode cursor placement: `[0, len]`.
    pub fn clamp_insert(&self, pos: usize) -> usize {
        pos.min(self.len())
    }

    pub fn slice(&self, start: usize, end: usize) -> String {
        let end = end.min(self.len());
        let start = start.min(end);
        self.rope.slice(start..end).to_string()
    }

    pub fn insert(&mut self, pos: usize, text: &str) {
        let pos = self.clamp_insert(pos);
        self.rope.insert(pos, text);
    }

    /// Delete `[start, end)` and return the removed text. `None` when the
    /// range is empty or out of bounds.
    pub fn delete_range(&mut self, start: usize, end: usize) -> Option<String> {
        if start >= end || end > self.len() {
            return None;
        }
        let deleted = self.rope.slice(start..end).to_string();
        self.rope.remove(start..end);
        Some(deleted)
    }
}

impl std::fmt::Debug for ScriptBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScriptBuffer")
            .field("len", &self.len())
            .field("lines", &self.line_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn buf() -> ScriptBuffer {
        ScriptBuffer::new("Hello\ncruel\nworld!")
    }

    #[test]
    fn test_line_column_roundtrip() {
        let b = buf();
        assert_eq!(b.line_of(7), 1);
        assert_eq!(b.column_of(7), 1);
        assert_eq!(b.from_line_col(1, 1), 7);
    }

    #[test]
    fn test_line_bounds() {
        let b = buf();
        assert_eq!(b.line_start(0), 0);
        assert_eq!(b.line_end(0), 5); // position of the newline
        assert_eq!(b.line_start(2), 12);
        assert_eq!(b.line_end(2), 18); // end of buffer on the last line
        assert_eq!(b.line_len(1), 5);
    }

    #[test]
    fn test_empty_line_start_equals_end() {
        let b = ScriptBuffer::new("a\n\nb");
        assert_eq!(b.line_start(1), 2);
        assert_eq!(b.line_end(1), 2);
        assert!(b.is_line_blank(1));
    }

    #[test]
    fn test_out_of_range_clamps() {
        let b = buf();
        assert_eq!(b.line_start(99), 12);
        assert_eq!(b.from_line_col(99, 99), 17); // last char of last line
        assert_eq!(b.clamp_normal(1000), 17);
        assert_eq!(b.clamp_insert(1000), 18);
    }

    #[test]
    fn test_empty_buffer_offset_zero_valid() {
        let b = ScriptBuffer::empty();
        assert_eq!(b.clamp_normal(5), 0);
        assert_eq!(b.clamp_insert(5), 0);
        assert_eq!(b.line_start(0), 0);
        assert_eq!(b.line_end(0), 0);
        assert_eq!(b.first_non_blank(0), 0);
    }

    #[test]
    fn test_first_and_last_non_blank() {
        let b = ScriptBuffer::new("  foo bar  \nnext");
        assert_eq!(b.first_non_blank(0), 2);
        assert_eq!(b.last_non_blank(0), 8);
        // blank line clamps onto itself
        let b = ScriptBuffer::new("   \nx");
        assert_eq!(b.first_non_blank(0), 2);
    }

    #[test]
    fn test_insert_and_delete() {
        let mut b = ScriptBuffer::new("Hello, world!");
        b.insert(7, "cruel ");
        assert_eq!(b.content(), "Hello, cruel world!");
        assert_eq!(b.delete_range(7, 13), Some("cruel ".to_string()));
        assert_eq!(b.content(), "Hello, world!");
        assert_eq!(b.delete_range(5, 5), None);
        assert_eq!(b.delete_range(5, 1000), None);
    }

    #[test]
    fn test_replace_content() {
        let mut b = buf();
        b.replace_content("fresh");
        assert_eq!(b.content(), "fresh");
        assert_eq!(b.line_count(), 1);
    }
}
