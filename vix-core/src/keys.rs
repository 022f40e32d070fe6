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

//! The raw key-event contract between the host UI and the engine.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Char(char),
    Escape,
    Enter,
    Backspace,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyInput {
    pub key: Key,
    pub ctrl: bool,
}

impl KeyInput {
    pub fn char(c: char) -> Self {
        Self {
            key: Key::Char(c),
            ctrl: false,
        }
    }

    pub fn ctrl(c: char) -> Self {
        Self {
            key: Key::Char(c),
            ctrl: true,
        }
    }

    pub fn escape() -> Self {
        Self {
            key: Key::Escape,
            ctrl: false,
        }
    }

    pub fn enter() -> Self {
        Self {
            key: Key::Enter,
            ctrl: false,
        }
    }

    pub fn backspace() -> Self {
        Self {
            key: Key::Backspace,
            ctrl: false,
        }
    }
}

impl From<char> for KeyInput {
    fn from(c: char) -> Self {
        KeyInput::char(c)
    }
}
