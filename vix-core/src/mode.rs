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

//! Editing modes, visual selections and the command/search overlays.

/// Exactly one mode is active at a time. Entry and exit are the only places
/// where selection, pending-operator and char-wait state are created or
/// destroyed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    Normal,
    Insert,
    Visual,
    VisualLine,
    VisualBlock,
    Replace,
}

impl Mode {
    pub fn is_visual(&self) -> bool {
        matches!(self, Mode::Visual | Mode::VisualLine | Mode::VisualBlock)
    }

    /// Status-line name, matching the host's mode badge.
    pub fn name(&self) -> &'static str {
        match self {
            Mode::Normal => "NORMAL",
            Mode::Insert => "INSERT",
            Mode::Visual => "VISUAL",
            Mode::VisualLine => "V-LINE",
            Mode::VisualBlock => "V-BLOCK",
            Mode::Replace => "REPLACE",
        }
    }
}

/// A visual-mode selection: a fixed anchor and a live head.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    pub anchor: usize,
    pub head: usize,
}

impl Selection {
    pub fn new(pos: usize) -> Self {
        Self {
            anchor: pos,
            head: pos,
        }
    }

    /// Normalized inclusive range: `[min(anchor, head), max(anchor, head) + 1)`.
    pub fn range(&self) -> (usize, usize) {
        let start = self.anchor.min(self.head);
        let end = self.anchor.max(self.head) + 1;
        (start, end)
    }

    /// Swap anchor and head (visual-mode `o`).
    pub fn swap(&mut self) {
        std::mem::swap(&mut self.anchor, &mut self.head);
    }
}

/// Command-line (`:`) and search (`/`) overlays suspend normal key routing
/// while active. They are not buffer-editing modes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Overlay {
    Command(String),
    Search(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selection_normalizes() {
        let sel = Selection { anchor: 7, head: 3 };
        assert_eq!(sel.range(), (3, 8));
        let sel = Selection { anchor: 3, head: 7 };
        assert_eq!(sel.range(), (3, 8));
    }

    #[test]
    fn test_selection_swap() {
        let mut sel = Selection { anchor: 2, head: 9 };
        sel.swap();
        assert_eq!(sel.anchor, 9);
        assert_eq!(sel.head, 2);
        assert_eq!(sel.range(), (2, 10));
    }

    #[test]
    fn test_single_char_selection() {
        let sel = Selection::new(4);
        assert_eq!(sel.range(), (4, 5));
    }
}
