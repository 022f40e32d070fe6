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

//! The editor session: one per open document.
//!
//! All mutable editing state lives here - buffer, cursor, mode, register,
//! history, search. Key handling returns events for the host instead of
//! calling into it, so the session never blocks and multiple sessions can
//! coexist. Anything the host must do (persist, touch the clipboard) comes
//! back as an [`EngineEvent`].

use tracing::debug;

use crate::buffer::ScriptBuffer;
use crate::clipboard::{PasteRequest, PasteTracker};
use crate::command::{self, CommandEffect};
use crate::history::History;
use crate::keys::{Key, KeyInput};
use crate::mode::{Mode, Overlay, Selection};
use crate::motion::{CharSearch, CharSearchKind, Motion};
use crate::operator::Operator;
use crate::register::Register;
use crate::search::{SearchResult, SearchState, WordSearchResult};
use crate::text_object::{TextObject, TextObjectModifier};

/// Side effects the host must carry out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    /// `:w` and friends. The host owns persistence.
    SaveRequested,
    /// `p`/`P` issued; answer with [`EditorSession::complete_paste`].
    PasteRequested(PasteRequest),
    /// A yank or visual-mode copy; write it to the system clipboard.
    CopyToClipboard(String),
}

/// What a pending `r`/`f`/`F`/`t`/`T` is waiting for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CharWait {
    ReplaceChar,
    Search(CharSearchKind),
}

pub struct EditorSession {
    buffer: ScriptBuffer,
    cursor: usize,
    mode: Mode,
    selection: Option<Selection>,
    overlay: Option<Overlay>,
    pending_operator: Option<Operator>,
    count_buffer: String,
    prefix_buffer: String,
    awaiting_char: Option<CharWait>,
    last_char_search: Option<CharSearch>,
    register: Register,
    history: History,
    search: SearchState,
    paste: PasteTracker,
    status: String,
    events: Vec<EngineEvent>,
}

impl EditorSession {
    pub fn new(content: &str) -> Self {
        Self {
            buffer: ScriptBuffer::new(content),
            cursor: 0,
            mode: Mode::Normal,
            selection: None,
            overlay: None,
            pending_operator: None,
            count_buffer: String::new(),
            prefix_buffer: String::new(),
            awaiting_char: None,
            last_char_search: None,
            register: Register::new(),
            history: History::new(content, 0),
            search: SearchState::new(),
            paste: PasteTracker::new(),
            status: String::new(),
            events: Vec::new(),
        }
    }

    pub fn content(&self) -> String {
        self.buffer.content()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn selection(&self) -> Option<Selection> {
        self.selection
    }

    pub fn overlay(&self) -> Option<&Overlay> {
        self.overlay.as_ref()
    }

    pub fn search_matches(&self) -> &[crate::search::Match] {
        self.search.matches()
    }

    pub fn register_text(&self) -> &str {
        self.register.text()
    }

    /// Load different content from outside (switching scripts). Resets
    /// history and search; everything ephemeral is dropped.
    pub fn load_content(&mut self, content: &str) {
        self.buffer.replace_content(content);
        self.cursor = 0;
        self.history = History::new(content, 0);
        self.search.clear();
        self.exit_to_normal();
    }

    /// Host-side reconciliation while in insert mode (the host may own the
    /// text widget during insertion). No checkpoint; that happens on Escape.
    pub fn sync_insert(&mut self, content: &str, cursor: usize) {
        if self.mode != Mode::Insert {
            return;
        }
        self.buffer.replace_content(content);
        self.cursor = self.buffer.clamp_insert(cursor);
    }

    /// Route one key event. Returns the host-side effects it produced.
    pub fn handle_key(&mut self, input: KeyInput) -> Vec<EngineEvent> {
        if self.overlay.is_some() {
            self.handle_overlay_key(input);
        } else {
            match self.mode {
                Mode::Normal => self.handle_normal_key(input),
                Mode::Visual | Mode::VisualLine | Mode::VisualBlock => {
                    self.handle_visual_key(input)
                }
                Mode::Insert => self.handle_insert_key(input),
                Mode::Replace => self.handle_replace_key(input),
            }
        }
        std::mem::take(&mut self.events)
    }

    /// Deliver clipboard text for a paste request. Stale completions (a newer
    /// request was issued since) are dropped.
    pub fn complete_paste(&mut self, id: u64, clipboard_text: Option<String>) {
        let Some(req) = self.paste.accept(id) else {
            debug!(id, "stale paste completion dropped");
            return;
        };
        let text = match clipboard_text {
            Some(t) if !t.is_empty() => t,
            _ => self.register.text().to_string(),
        };
        if text.is_empty() {
            return;
        }
        let at = if req.before {
            self.cursor
        } else {
            self.buffer.clamp_insert(self.cursor + 1)
        };
        self.buffer.insert(at, &text);
        self.cursor = self
            .buffer
            .clamp_normal(at + text.chars().count().saturating_sub(1));
        self.checkpoint();
    }

    // ---- normal mode ----

    fn handle_normal_key(&mut self, input: KeyInput) {
        if self.awaiting_char.is_some() {
            self.handle_awaited_char(input);
            return;
        }

        let count = self.count();

        if input.ctrl {
            if let Key::Char(c) = input.key {
                match c {
                    'd' | 'u' | 'f' | 'b' => {
                        if let Some(m) = Motion::from_ctrl_key(c) {
                            self.cursor = m.target(&self.buffer, self.cursor, count);
                        }
                    }
                    'v' => self.enter_visual(Mode::VisualBlock),
                    'r' => self.redo(),
                    _ => {}
                }
            }
            self.count_buffer.clear();
            self.prefix_buffer.clear();
            self.pending_operator = None;
            return;
        }

        let key = match input.key {
            Key::Char(c) => c,
            Key::Escape => {
                self.exit_to_normal();
                return;
            }
            // Enter/Backspace have no normal-mode meaning
            Key::Enter | Key::Backspace => return,
        };

        if self.accumulate_count(key) {
            return;
        }

        if self.pending_operator.is_some() && self.handle_operator_pending(key, count) {
            return;
        }

        if self.prefix_buffer == "g" {
            match key {
                'g' => {
                    let line = if count > 1 { count - 1 } else { 0 };
                    self.cursor = Motion::GotoLine(line).target(&self.buffer, self.cursor, 1);
                }
                'e' | '_' => {
                    if let Some(m) = Motion::from_g_key(key) {
                        self.cursor = m.target(&self.buffer, self.cursor, count);
                    }
                }
                _ => {}
            }
            self.prefix_buffer.clear();
            self.count_buffer.clear();
            return;
        }

        match key {
            'd' | 'c' | 'y' => {
                self.pending_operator = Operator::from_key(key);
                return;
            }

            'h' | 'j' | 'k' | 'l' | 'w' | 'W' | 'e' | 'E' | 'b' | 'B' | '0' | '^' | '$' | '{'
            | '}' | '(' | ')' | '%' | 'H' | 'M' | 'L' | '+' | '-' | '_' | '|' => {
                if let Some(m) = Motion::from_key(key) {
                    self.cursor = m.target(&self.buffer, self.cursor, count);
                }
            }

            'G' => self.cursor = self.goto_line_target(),

            'g' => {
                self.prefix_buffer = "g".to_string();
                return;
            }

            'f' | 'F' | 't' | 'T' => {
                self.awaiting_char = CharSearchKind::from_key(key).map(CharWait::Search);
                return;
            }

            ';' => {
                if let Some(s) = self.last_char_search {
                    self.cursor = Motion::CharSearch(s).target(&self.buffer, self.cursor, 1);
                }
            }
            ',' => {
                if let Some(s) = self.last_char_search {
                    let reversed = CharSearch {
                        ch: s.ch,
                        kind: s.kind.reversed(),
                    };
                    self.cursor =
                        Motion::CharSearch(reversed).target(&self.buffer, self.cursor, 1);
                }
            }

            'r' => {
                self.awaiting_char = Some(CharWait::ReplaceChar);
                return;
            }
            'R' => self.mode = Mode::Replace,

            's' => {
                if self.cursor < self.buffer.len() {
                    let end = self.buffer.clamp_insert(self.cursor + count);
                    self.buffer.delete_range(self.cursor, end);
                }
                self.mode = Mode::Insert;
            }
            'S' => {
                let line = self.buffer.line_of(self.cursor);
                let start = self.buffer.first_non_blank(line);
                let end = self.buffer.line_end(line);
                self.delete_span(start, end, true);
            }
            'C' => {
                let end = self.buffer.line_end(self.buffer.line_of(self.cursor));
                self.delete_span(self.cursor, end, true);
            }
            'D' => {
                let end = self.buffer.line_end(self.buffer.line_of(self.cursor));
                self.delete_span(self.cursor, end, false);
            }
            'Y' => self.yank_lines(count),

            'i' => self.mode = Mode::Insert,
            'a' => {
                self.mode = Mode::Insert;
                self.cursor = self.buffer.clamp_insert(self.cursor + 1);
            }
            'I' => {
                self.mode = Mode::Insert;
                self.cursor = self.buffer.first_non_blank(self.buffer.line_of(self.cursor));
            }
            'A' => {
                self.mode = Mode::Insert;
                self.cursor = self.buffer.line_end(self.buffer.line_of(self.cursor));
            }
            'o' => {
                let end = self.buffer.line_end(self.buffer.line_of(self.cursor));
                self.buffer.insert(end, "\n");
                self.cursor = end + 1;
                self.mode = Mode::Insert;
            }
            'O' => {
                let start = self.buffer.line_start(self.buffer.line_of(self.cursor));
                self.buffer.insert(start, "\n");
                self.cursor = start;
                self.mode = Mode::Insert;
            }

            'v' => self.enter_visual(Mode::Visual),
            'V' => self.enter_visual(Mode::VisualLine),

            'x' => {
                if self.cursor < self.buffer.len() {
                    let end = self.buffer.clamp_insert(self.cursor + count);
                    self.delete_span(self.cursor, end, false);
                }
            }
            'X' => {
                let start = self.cursor - count.min(self.cursor);
                if start < self.cursor {
                    self.delete_span(start, self.cursor, false);
                }
            }

            'J' => self.join_lines(),

            'p' => {
                let req = self.paste.issue(false);
                self.events.push(EngineEvent::PasteRequested(req));
            }
            'P' => {
                let req = self.paste.issue(true);
                self.events.push(EngineEvent::PasteRequested(req));
            }

            'u' => self.undo(),

            ':' => self.overlay = Some(Overlay::Command(String::new())),
            '/' => self.overlay = Some(Overlay::Search(String::new())),
            '?' => {
                self.overlay = Some(Overlay::Search(String::new()));
                self.status = "Search backward (use N to go backward)".to_string();
            }

            'n' => {
                if let Some(pos) = self.search.next() {
                    self.cursor = self.buffer.clamp_normal(pos);
                }
            }
            'N' => {
                if let Some(pos) = self.search.prev() {
                    self.cursor = self.buffer.clamp_normal(pos);
                }
            }
            '*' => self.word_search(true),
            '#' => self.word_search(false),

            '~' => self.toggle_case(),

            _ => {}
        }

        self.count_buffer.clear();
        self.prefix_buffer.clear();
    }

    /// The char consumed by a pending `r` or `f`/`F`/`t`/`T`.
    fn handle_awaited_char(&mut self, input: KeyInput) {
        let wait = match self.awaiting_char {
            Some(w) => w,
            None => return,
        };
        let ch = match input.key {
            Key::Escape => {
                self.awaiting_char = None;
                return;
            }
            Key::Char(c) if !input.ctrl => c,
            _ => return,
        };

        match wait {
            CharWait::ReplaceChar => {
                if self.cursor < self.buffer.len() {
                    self.buffer.delete_range(self.cursor, self.cursor + 1);
                    self.buffer.insert(self.cursor, &ch.to_string());
                    self.checkpoint();
                }
            }
            CharWait::Search(kind) => {
                let search = CharSearch { ch, kind };
                let target = Motion::CharSearch(search).target(&self.buffer, self.cursor, 1);
                if let Some(op) = self.pending_operator.take() {
                    let start = self.cursor.min(target);
                    let end = self.cursor.max(target) + 1;
                    self.apply_operator(op, start, end);
                } else {
                    self.cursor = target;
                    self.last_char_search = Some(search);
                }
            }
        }
        self.awaiting_char = None;
        self.prefix_buffer.clear();
        self.count_buffer.clear();
    }

    /// Operator-pending routing. Returns true when the key was consumed.
    fn handle_operator_pending(&mut self, key: char, count: usize) -> bool {
        let op = match self.pending_operator {
            Some(op) => op,
            None => return false,
        };

        // text object second key: `diw`, `da"` ...
        if let Some(modifier) = TextObjectModifier::from_key(
            self.prefix_buffer.chars().next().unwrap_or('\0'),
        ) {
            if let Some(obj) = TextObject::from_key(key) {
                if let Some((start, end)) = obj.resolve(&self.buffer, self.cursor, modifier) {
                    self.apply_operator(op, start, end);
                }
            }
            self.pending_operator = None;
            self.prefix_buffer.clear();
            self.count_buffer.clear();
            return true;
        }

        if key == 'i' || key == 'a' {
            self.prefix_buffer = key.to_string();
            return true;
        }

        if key == op.doubled_key() {
            match op {
                Operator::Delete => self.delete_lines(count, false),
                Operator::Change => self.delete_lines(count, true),
                Operator::Yank => self.yank_lines(count),
            }
            self.pending_operator = None;
            self.prefix_buffer.clear();
            self.count_buffer.clear();
            return true;
        }

        if let Some(kind) = CharSearchKind::from_key(key) {
            self.awaiting_char = Some(CharWait::Search(kind));
            return true;
        }

        // g-prefixed motions complete the operator too (`dgg`, `dge`)
        if self.prefix_buffer == "g" {
            let motion = match key {
                'g' => Some(Motion::GotoLine(if count > 1 { count - 1 } else { 0 })),
                _ => Motion::from_g_key(key),
            };
            self.pending_operator = None;
            self.prefix_buffer.clear();
            self.count_buffer.clear();
            if let Some(m) = motion {
                self.apply_operator_motion(op, m, 1);
            }
            return true;
        }
        if key == 'g' {
            self.prefix_buffer = "g".to_string();
            return true;
        }

        let motion = if key == 'G' {
            Some(Motion::GotoLine(self.buffer.line_of(self.goto_line_target())))
        } else {
            Motion::from_key(key)
        };
        match motion {
            Some(m) => {
                self.pending_operator = None;
                self.prefix_buffer.clear();
                self.count_buffer.clear();
                self.apply_operator_motion(op, m, count);
                true
            }
            None => {
                // not a motion: the operator is abandoned and the key
                // handled normally
                self.pending_operator = None;
                false
            }
        }
    }

    fn apply_operator_motion(&mut self, op: Operator, motion: Motion, count: usize) {
        let target = motion.target(&self.buffer, self.cursor, count);
        if target == self.cursor && !motion.operates_at_rest() {
            return;
        }
        let (start, end) = match motion.operator_end(&self.buffer, self.cursor, count) {
            // forward word ranges: run + trailing whitespace, end-exclusive
            Some(raw) => (self.cursor.min(raw), raw.max(self.cursor)),
            None => {
                let start = self.cursor.min(target);
                let end = self.cursor.max(target) + usize::from(motion.is_inclusive());
                (start, end)
            }
        };
        self.apply_operator(op, start, end);
    }

    fn apply_operator(&mut self, op: Operator, start: usize, end: usize) {
        if op.removes_text() {
            self.delete_span(start, end, op.enters_insert());
        } else {
            self.yank_span(start, end);
        }
    }

    // ---- visual mode ----

    fn handle_visual_key(&mut self, input: KeyInput) {
        let count = self.count();

        if input.ctrl {
            if let Key::Char(c @ ('d' | 'u')) = input.key {
                if let Some(m) = Motion::from_ctrl_key(c) {
                    self.move_visual(m, count);
                }
            }
            self.count_buffer.clear();
            return;
        }

        let key = match input.key {
            Key::Char(c) => c,
            Key::Escape => {
                self.exit_to_normal();
                return;
            }
            Key::Enter | Key::Backspace => return,
        };

        if self.accumulate_count(key) {
            return;
        }

        // text object selection: `viw`, `va(` ...
        if let Some(modifier) = TextObjectModifier::from_key(
            self.prefix_buffer.chars().next().unwrap_or('\0'),
        ) {
            if let Some(obj) = TextObject::from_key(key) {
                if let Some((start, end)) = obj.resolve(&self.buffer, self.cursor, modifier) {
                    let head = end.saturating_sub(1);
                    self.selection = Some(Selection {
                        anchor: start,
                        head,
                    });
                    self.cursor = self.buffer.clamp_normal(head);
                }
            }
            self.prefix_buffer.clear();
            self.count_buffer.clear();
            return;
        }

        match key {
            'i' | 'a' => {
                self.prefix_buffer = key.to_string();
                return;
            }

            'h' | 'j' | 'k' | 'l' | 'w' | 'W' | 'E' | 'b' | 'B' | '0' | '^' | '$' | '{' | '}'
            | '(' | ')' | '%' | '_' => {
                if let Some(m) = Motion::from_key(key) {
                    self.move_visual(m, count);
                }
            }

            'g' => {
                if self.prefix_buffer == "g" {
                    let line = if count > 1 { count - 1 } else { 0 };
                    self.move_visual(Motion::GotoLine(line), 1);
                    self.prefix_buffer.clear();
                } else {
                    self.prefix_buffer = "g".to_string();
                    return;
                }
            }
            'e' => {
                if self.prefix_buffer == "g" {
                    self.move_visual(Motion::PrevWordEnd, count);
                    self.prefix_buffer.clear();
                } else {
                    self.move_visual(Motion::WordEnd, count);
                }
            }
            'G' => {
                let target = self.goto_line_target();
                self.move_visual(Motion::GotoLine(self.buffer.line_of(target)), 1);
            }

            'd' | 'x' => {
                if let Some(sel) = self.selection {
                    let (start, end) = sel.range();
                    self.delete_span(start, end, false);
                    self.exit_to_normal();
                }
            }
            'c' | 's' => {
                if let Some(sel) = self.selection {
                    let (start, end) = sel.range();
                    self.delete_span(start, end, true);
                    self.selection = None;
                }
            }
            'y' => {
                if let Some(sel) = self.selection {
                    let (start, end) = sel.range();
                    self.yank_span(start, end);
                    self.exit_to_normal();
                }
            }

            'o' => {
                if let Some(sel) = &mut self.selection {
                    sel.swap();
                    self.cursor = sel.head;
                }
            }

            _ => {}
        }

        self.count_buffer.clear();
        if key != 'g' {
            self.prefix_buffer.clear();
        }
    }

    fn move_visual(&mut self, motion: Motion, count: usize) {
        self.cursor = motion.target(&self.buffer, self.cursor, count);
        if let Some(sel) = &mut self.selection {
            sel.head = self.cursor;
        }
    }

    // ---- insert / replace ----

    fn handle_insert_key(&mut self, input: KeyInput) {
        match input.key {
            Key::Escape => {
                self.history.checkpoint(&self.buffer.content(), self.cursor);
                self.mode = Mode::Normal;
                self.cursor = self.buffer.clamp_normal(self.cursor.saturating_sub(1));
            }
            Key::Char(c) if !input.ctrl => {
                self.buffer.insert(self.cursor, &c.to_string());
                self.cursor += 1;
            }
            Key::Enter => {
                self.buffer.insert(self.cursor, "\n");
                self.cursor += 1;
            }
            Key::Backspace => {
                if self.cursor > 0 {
                    self.buffer.delete_range(self.cursor - 1, self.cursor);
                    self.cursor -= 1;
                }
            }
            _ => {}
        }
    }

    fn handle_replace_key(&mut self, input: KeyInput) {
        match input.key {
            Key::Escape => self.mode = Mode::Normal,
            Key::Char(c) if !input.ctrl => {
                if self.cursor < self.buffer.len() {
                    self.buffer.delete_range(self.cursor, self.cursor + 1);
                }
                self.buffer.insert(self.cursor, &c.to_string());
                self.cursor += 1;
                self.checkpoint();
            }
            _ => {}
        }
    }

    // ---- overlays ----

    fn handle_overlay_key(&mut self, input: KeyInput) {
        let Some(overlay) = self.overlay.as_mut() else {
            return;
        };
        let line = match overlay {
            Overlay::Command(s) | Overlay::Search(s) => s,
        };
        match input.key {
            Key::Char(c) if !input.ctrl => line.push(c),
            Key::Backspace => {
                line.pop();
            }
            Key::Escape => self.overlay = None,
            Key::Enter => {
                let overlay = self.overlay.take();
                match overlay {
                    Some(Overlay::Command(cmd)) => self.run_command(&cmd),
                    Some(Overlay::Search(pattern)) => self.run_search(&pattern),
                    None => {}
                }
            }
            _ => {}
        }
    }

    fn run_command(&mut self, cmd: &str) {
        let result = command::execute(cmd, &mut self.buffer, self.cursor);
        self.status = result.status;
        match result.effect {
            CommandEffect::Save => self.events.push(EngineEvent::SaveRequested),
            CommandEffect::MoveCursor(pos) => self.cursor = self.buffer.clamp_normal(pos),
            CommandEffect::Edited => {
                self.cursor = self.buffer.clamp_normal(self.cursor);
                self.checkpoint();
            }
            CommandEffect::ClearSearch => self.search.clear(),
            CommandEffect::None => {}
        }
    }

    fn run_search(&mut self, pattern: &str) {
        match self.search.perform(&self.buffer, pattern) {
            SearchResult::Found { target, count } => {
                self.cursor = self.buffer.clamp_normal(target);
                self.status = format!("Found {count} matches");
            }
            SearchResult::NotFound => {
                if !pattern.is_empty() {
                    self.status = "Pattern not found".to_string();
                }
            }
            SearchResult::InvalidPattern => {
                self.status = "Invalid regex pattern".to_string();
            }
        }
    }

    fn word_search(&mut self, forward: bool) {
        match self.search.word_search(&self.buffer, self.cursor, forward) {
            WordSearchResult::Found {
                target,
                count,
                pattern,
            } => {
                self.cursor = self.buffer.clamp_normal(target);
                self.status = format!("/{pattern} ({count} matches)");
            }
            WordSearchResult::NoWordUnderCursor => {
                self.status = "No word under cursor".to_string();
            }
            WordSearchResult::NotFound => {
                self.status = "Pattern not found".to_string();
            }
        }
    }

    // ---- shared edit primitives ----

    /// Remove `[start, end)`, filling the register; cursor lands on `start`
    /// clamped into the shrunken buffer. Change-style calls land in insert
    /// mode and defer their checkpoint to insert exit.
    fn delete_span(&mut self, start: usize, end: usize, enter_insert: bool) {
        let deleted = self.buffer.delete_range(start, end).unwrap_or_default();
        self.register.set(deleted);
        self.cursor = self.buffer.clamp_normal(start);
        if enter_insert {
            self.mode = Mode::Insert;
            self.cursor = self.buffer.clamp_insert(start);
        } else {
            self.checkpoint();
        }
    }

    fn yank_span(&mut self, start: usize, end: usize) {
        let text = self.buffer.slice(start, end);
        self.status = format!("Yanked {} characters", text.chars().count());
        self.register.set(text.clone());
        self.events.push(EngineEvent::CopyToClipboard(text));
    }

    /// `dd`/`cc`: linewise removal. `cc` keeps the line and empties it.
    fn delete_lines(&mut self, count: usize, enter_insert: bool) {
        let line = self.buffer.line_of(self.cursor);
        let line_count = self.buffer.line_count();
        let end_line = (line + count - 1).min(line_count.saturating_sub(1));
        let start = self.buffer.line_start(line);
        let end = self.buffer.line_end(end_line);

        if enter_insert {
            // empty the current line only
            self.register
                .set(self.buffer.slice(start, self.buffer.line_end(line)));
            self.buffer.delete_range(start, self.buffer.line_end(line));
            self.cursor = start;
            self.mode = Mode::Insert;
            return;
        }

        if line_count <= count {
            self.register.set(self.buffer.content());
            self.buffer.replace_content("");
            self.cursor = 0;
        } else if end_line == line_count - 1 {
            // last line(s): the preceding newline goes too
            let cut = start.saturating_sub(1);
            self.register.set(self.buffer.slice(cut, self.buffer.len()));
            self.buffer.delete_range(cut, self.buffer.len());
            self.cursor = self.buffer.line_start(line.saturating_sub(1));
        } else {
            self.register.set(self.buffer.slice(start, end + 1));
            self.buffer.delete_range(start, end + 1);
            self.cursor = start;
        }
        self.cursor = self.buffer.clamp_normal(self.cursor);
        self.checkpoint();
    }

    /// `yy`/`Y`: register and clipboard, buffer untouched.
    fn yank_lines(&mut self, count: usize) {
        let line = self.buffer.line_of(self.cursor);
        let end_line = (line + count - 1).min(self.buffer.line_count().saturating_sub(1));
        let text = self
            .buffer
            .slice(self.buffer.line_start(line), self.buffer.line_end(end_line));
        self.register.set(text.clone());
        self.events.push(EngineEvent::CopyToClipboard(text));
        self.status = format!("Yanked {count} line(s)");
    }

    /// `J`: splice the next line up, collapsing its indentation to one space.
    fn join_lines(&mut self) {
        let line = self.buffer.line_of(self.cursor);
        if line + 1 >= self.buffer.line_count() {
            return;
        }
        let end = self.buffer.line_end(line);
        let next_start = self.buffer.line_start(line + 1);
        let indent = self
            .buffer
            .line_text(line + 1)
            .chars()
            .take_while(|c| c.is_whitespace())
            .count();
        self.buffer.delete_range(end, next_start + indent);
        self.buffer.insert(end, " ");
        self.cursor = end;
        self.checkpoint();
    }

    /// `~`: flip the case of the char under the cursor and step right.
    fn toggle_case(&mut self) {
        let Some(c) = self.buffer.char_at(self.cursor) else {
            return;
        };
        let flipped: String = if c.is_uppercase() {
            c.to_lowercase().collect()
        } else {
            c.to_uppercase().collect()
        };
        self.buffer.delete_range(self.cursor, self.cursor + 1);
        self.buffer.insert(self.cursor, &flipped);
        self.cursor = self.buffer.clamp_normal(self.cursor + 1);
        self.checkpoint();
    }

    fn undo(&mut self) {
        let depth = self.history.undo_depth();
        match self.history.undo() {
            Some(snap) => {
                let (content, cursor) = (snap.content.clone(), snap.cursor);
                self.buffer.replace_content(&content);
                self.cursor = self.buffer.clamp_normal(cursor);
                self.status = format!("Undo: {depth} changes left");
            }
            None => self.status = "Already at oldest change".to_string(),
        }
    }

    fn redo(&mut self) {
        match self.history.redo() {
            Some(snap) => {
                let (content, cursor) = (snap.content.clone(), snap.cursor);
                self.buffer.replace_content(&content);
                self.cursor = self.buffer.clamp_normal(cursor);
                self.status = format!("Redo: {} changes ahead", self.history.redo_depth());
            }
            None => self.status = "Already at newest change".to_string(),
        }
    }

    // ---- small helpers ----

    fn checkpoint(&mut self) {
        self.history.checkpoint(&self.buffer.content(), self.cursor);
    }

    fn count(&self) -> usize {
        self.count_buffer.parse().unwrap_or(1)
    }

    /// `G` takes its count as an absolute line number; without one it goes
    /// to the last line.
    fn goto_line_target(&self) -> usize {
        let raw: usize = self.count_buffer.parse().unwrap_or(0);
        let line = if raw > 1 {
            raw - 1
        } else {
            self.buffer.line_count().saturating_sub(1)
        };
        self.buffer.line_start(line)
    }

    fn accumulate_count(&mut self, key: char) -> bool {
        if key.is_ascii_digit() && (key != '0' || !self.count_buffer.is_empty()) {
            self.count_buffer.push(key);
            return true;
        }
        false
    }

    fn enter_visual(&mut self, mode: Mode) {
        self.mode = mode;
        self.selection = Some(Selection::new(self.cursor));
    }

    fn exit_to_normal(&mut self) {
        self.mode = Mode::Normal;
        self.selection = None;
        self.overlay = None;
        self.prefix_buffer.clear();
        self.count_buffer.clear();
        self.pending_operator = None;
        self.awaiting_char = None;
    }
}
