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

//! A modal (vi-style) text editing engine for embedded script editors.
//!
//! The host owns rendering, key capture and persistence; the engine owns
//! everything between a key event and the resulting buffer/cursor/mode
//! state. One [`EditorSession`] per open document.

pub mod buffer;
pub mod clipboard;
pub mod command;
pub mod editor;
pub mod history;
pub mod keys;
pub mod mode;
pub mod motion;
pub mod operator;
pub mod register;
pub mod search;
pub mod syntax;
pub mod text_object;

pub use buffer::ScriptBuffer;
pub use clipboard::{Clipboard, PasteRequest, SystemClipboard};
pub use editor::{EditorSession, EngineEvent};
pub use keys::{Key, KeyInput};
pub use mode::{Mode, Overlay, Selection};
pub use motion::Motion;
pub use operator::Operator;
pub use syntax::{tokenize, Token, TokenKind};
