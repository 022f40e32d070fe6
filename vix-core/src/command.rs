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

//! The `:` command language: save, line jumps, substitution, `noh`.
//!
//! Execution mutates the buffer directly when needed and hands everything
//! else back to the session as an effect plus a status line.

use regex::{Regex, RegexBuilder};
use tracing::debug;

use crate::buffer::ScriptBuffer;

/// What the session must do after a command ran.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandEffect {
    None,
    /// Ask the host to persist; the engine has no storage of its own.
    Save,
    MoveCursor(usize),
    /// The buffer was rewritten in place; checkpoint it.
    Edited,
    ClearSearch,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandResult {
    pub status: String,
    pub effect: CommandEffect,
}

impl CommandResult {
    fn new(status: impl Into<String>, effect: CommandEffect) -> Self {
        Self {
            status: status.into(),
            effect,
        }
    }
}

/// Execute one command-line string against the buffer.
pub fn execute(input: &str, buf: &mut ScriptBuffer, cursor: usize) -> CommandResult {
    let trimmed = input.trim();
    debug!(command = trimmed, "execute");

    match trimmed {
        "w" | "wq" | "x" => return CommandResult::new("File saved", CommandEffect::Save),
        "q" | "q!" => {
            return CommandResult::new("Can't quit embedded vim :)", CommandEffect::None)
        }
        "noh" | "nohlsearch" => {
            return CommandResult::new("Search cleared", CommandEffect::ClearSearch)
        }
        "$" => {
            let last = buf.line_count().saturating_sub(1);
            return CommandResult::new(
                format!("Line {}", last + 1),
                CommandEffect::MoveCursor(buf.line_start(last)),
            );
        }
        _ => {}
    }

    if let Ok(n) = trimmed.parse::<usize>() {
        let line = n.clamp(1, buf.line_count());
        return CommandResult::new(
            format!("Line {line}"),
            CommandEffect::MoveCursor(buf.line_start(line - 1)),
        );
    }

    if let Some(result) = try_substitute(trimmed, buf, cursor) {
        return result;
    }

    CommandResult::new(format!("Unknown command: {trimmed}"), CommandEffect::None)
}

/// `s/pat/rep/`, `s/pat/rep/g`, `%s/pat/rep/g`, with optional `i` flag.
/// The replacement is literal text. Without `g`, `%s` replaces the first
/// match on every line; plain `s` replaces the first match on the cursor's
/// line only.
fn try_substitute(trimmed: &str, buf: &mut ScriptBuffer, cursor: usize) -> Option<CommandResult> {
    let grammar = Regex::new(r"^(%)?s/(.+?)/(.*)/([gi]*)$").ok()?;
    let caps = grammar.captures(trimmed)?;
    let whole_file = caps.get(1).is_some();
    let pattern = caps.get(2).map(|m| m.as_str())?;
    let replacement = caps.get(3).map(|m| m.as_str())?;
    let flags = caps.get(4).map(|m| m.as_str()).unwrap_or("");
    let all_on_line = flags.contains('g');

    let re = match RegexBuilder::new(pattern)
        .case_insensitive(flags.contains('i'))
        .build()
    {
        Ok(re) => re,
        Err(_) => return Some(CommandResult::new("Invalid pattern", CommandEffect::None)),
    };

    let mut count = 0usize;
    if whole_file {
        let content = buf.content();
        let new_content = if all_on_line {
            re.replace_all(&content, |_: &regex::Captures<'_>| {
                count += 1;
                replacement.to_string()
            })
            .into_owned()
        } else {
            content
                .split('\n')
                .map(|line| {
                    re.replace(line, |_: &regex::Captures<'_>| {
                        count += 1;
                        replacement.to_string()
                    })
                    .into_owned()
                })
                .collect::<Vec<_>>()
                .join("\n")
        };
        if count == 0 {
            return Some(CommandResult::new("Pattern not found", CommandEffect::None));
        }
        buf.replace_content(&new_content);
    } else {
        let line = buf.line_of(cursor);
        let start = buf.line_start(line);
        let end = buf.line_end(line);
        let text = buf.line_text(line);
        let new_line = if all_on_line {
            re.replace_all(&text, |_: &regex::Captures<'_>| {
                count += 1;
                replacement.to_string()
            })
            .into_owned()
        } else {
            re.replace(&text, |_: &regex::Captures<'_>| {
                count += 1;
                replacement.to_string()
            })
            .into_owned()
        };
        if count == 0 {
            return Some(CommandResult::new("Pattern not found", CommandEffect::None));
        }
        buf.delete_range(start, end);
        buf.insert(start, &new_line);
    }

    Some(CommandResult::new(
        format!("{count} substitution(s)"),
        CommandEffect::Edited,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(cmd: &str, text: &str, cursor: usize) -> (CommandResult, String) {
        let mut buf = ScriptBuffer::new(text);
        let result = execute(cmd, &mut buf, cursor);
        (result, buf.content())
    }

    #[test]
    fn test_save_commands() {
        for cmd in ["w", "wq", "x", "  w  "] {
            let (r, _) = run(cmd, "abc", 0);
            assert_eq!(r.effect, CommandEffect::Save);
            assert_eq!(r.status, "File saved");
        }
    }

    #[test]
    fn test_quit_is_refused() {
        let (r, _) = run("q", "abc", 0);
        assert_eq!(r.effect, CommandEffect::None);
        assert_eq!(r.status, "Can't quit embedded vim :)");
    }

    #[test]
    fn test_line_jump_clamps() {
        let (r, _) = run("2", "a\nb\nc", 0);
        assert_eq!(r.effect, CommandEffect::MoveCursor(2));
        assert_eq!(r.status, "Line 2");
        let (r, _) = run("99", "a\nb\nc", 0);
        assert_eq!(r.effect, CommandEffect::MoveCursor(4));
        assert_eq!(r.status, "Line 3");
        let (r, _) = run("$", "a\nb\nc", 0);
        assert_eq!(r.effect, CommandEffect::MoveCursor(4));
    }

    #[test]
    fn test_substitute_current_line_first_match() {
        let (r, content) = run("s/foo/bar/", "foo foo foo\nfoo", 0);
        assert_eq!(content, "bar foo foo\nfoo");
        assert_eq!(r.status, "1 substitution(s)");
        assert_eq!(r.effect, CommandEffect::Edited);
    }

    #[test]
    fn test_substitute_current_line_all() {
        let (_, content) = run("s/foo/bar/g", "foo foo foo\nfoo", 0);
        assert_eq!(content, "bar bar bar\nfoo");
    }

    #[test]
    fn test_substitute_whole_file_all() {
        let (r, content) = run("%s/foo/bar/g", "foo foo foo\nfoo", 0);
        assert_eq!(content, "bar bar bar\nbar");
        assert_eq!(r.status, "4 substitution(s)");
    }

    #[test]
    fn test_substitute_whole_file_first_per_line() {
        let (r, content) = run("%s/foo/bar/", "foo foo\nfoo foo", 0);
        assert_eq!(content, "bar foo\nbar foo");
        assert_eq!(r.status, "2 substitution(s)");
    }

    #[test]
    fn test_substitute_respects_cursor_line() {
        let (_, content) = run("s/foo/bar/", "foo\nfoo", 4);
        assert_eq!(content, "foo\nbar");
    }

    #[test]
    fn test_substitute_case_insensitive_flag() {
        let (_, content) = run("s/FOO/bar/i", "foo", 0);
        assert_eq!(content, "bar");
    }

    #[test]
    fn test_substitute_no_match() {
        let (r, content) = run("s/zzz/bar/", "foo", 0);
        assert_eq!(content, "foo");
        assert_eq!(r.status, "Pattern not found");
        assert_eq!(r.effect, CommandEffect::None);
    }

    #[test]
    fn test_substitute_invalid_pattern() {
        let (r, _) = run("s/[bad/x/", "foo", 0);
        assert_eq!(r.status, "Invalid pattern");
    }

    #[test]
    fn test_unknown_command() {
        let (r, _) = run("frobnicate", "foo", 0);
        assert_eq!(r.status, "Unknown command: frobnicate");
    }

    #[test]
    fn test_clear_search() {
        let (r, _) = run("noh", "foo", 0);
        assert_eq!(r.effect, CommandEffect::ClearSearch);
        assert_eq!(r.status, "Search cleared");
    }
}
