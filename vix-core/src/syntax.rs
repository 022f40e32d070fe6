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

//! Lua tokenizer for host-side highlighting.
//!
//! Produces an ordered, gap-free span list over the whole input. Purely
//! presentational: the editor never consults token boundaries for motions or
//! text objects. Offsets are char offsets, same as the buffer's.

const KEYWORDS: &[&str] = &[
    "and", "break", "do", "else", "elseif", "end", "false", "for", "function", "goto", "if", "in",
    "local", "nil", "not", "or", "repeat", "return", "then", "true", "until", "while",
];

const BUILTINS: &[&str] = &[
    "print",
    "pairs",
    "ipairs",
    "type",
    "tostring",
    "tonumber",
    "error",
    "assert",
    "pcall",
    "xpcall",
    "require",
    "setmetatable",
    "getmetatable",
    "rawget",
    "rawset",
    "next",
    "select",
    "unpack",
    "table",
    "string",
    "math",
    "io",
    "os",
    "coroutine",
    "debug",
    "_G",
    "_VERSION",
];

// Longest first, so `...` wins over `..` wins over `.`.
const OPERATORS: &[&str] = &[
    "...", "..", "==", "~=", "<=", ">=", "<<", ">>", "//", "::", "+", "-", "*", "/", "%", "^",
    "#", "<", ">", "=", "(", ")", "{", "}", "[", "]", ";", ":", ",", ".", "~",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Keyword,
    String,
    Comment,
    Number,
    Operator,
    Function,
    Builtin,
    Text,
}

/// An end-exclusive classified span.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub start: usize,
    pub end: usize,
}

fn lookahead(chars: &[char], i: usize, pat: &str) -> bool {
    pat.chars()
        .enumerate()
        .all(|(k, c)| chars.get(i + k) == Some(&c))
}

fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Chars that begin some token; everything else is swept into text runs.
fn starts_token(c: char) -> bool {
    c.is_ascii_alphanumeric()
        || matches!(
            c,
            '_' | '"'
                | '\''
                | '-'
                | '['
                | ']'
                | '.'
                | '+'
                | '*'
                | '/'
                | '%'
                | '^'
                | '#'
                | '<'
                | '>'
                | '='
                | '~'
                | '('
                | ')'
                | '{'
                | '}'
                | ';'
                | ':'
                | ','
        )
}

pub fn tokenize(code: &str) -> Vec<Token> {
    let chars: Vec<char> = code.chars().collect();
    let len = chars.len();
    let mut tokens = Vec::new();
    let mut i = 0usize;

    while i < len {
        // --[[ multiline comment ]]
        if lookahead(&chars, i, "--[[") {
            let start = i;
            i += 4;
            while i < len && !lookahead(&chars, i, "]]") {
                i += 1;
            }
            i = (i + 2).min(len);
            tokens.push(Token {
                kind: TokenKind::Comment,
                start,
                end: i,
            });
            continue;
        }

        // -- line comment
        if lookahead(&chars, i, "--") {
            let start = i;
            while i < len && chars[i] != '\n' {
                i += 1;
            }
            tokens.push(Token {
                kind: TokenKind::Comment,
                start,
                end: i,
            });
            continue;
        }

        // [[ multiline string ]]
        if lookahead(&chars, i, "[[") {
            let start = i;
            i += 2;
            while i < len && !lookahead(&chars, i, "]]") {
                i += 1;
            }
            i = (i + 2).min(len);
            tokens.push(Token {
                kind: TokenKind::String,
                start,
                end: i,
            });
            continue;
        }

        // quoted strings, backslash escapes respected
        if chars[i] == '"' || chars[i] == '\'' {
            let quote = chars[i];
            let start = i;
            i += 1;
            while i < len && chars[i] != quote {
                if chars[i] == '\\' {
                    i += 1;
                }
                i += 1;
            }
            i = (i + 1).min(len); // closing quote
            tokens.push(Token {
                kind: TokenKind::String,
                start,
                end: i,
            });
            continue;
        }

        // numbers: decimal, hex, scientific
        if chars[i].is_ascii_digit()
            || (chars[i] == '.' && chars.get(i + 1).is_some_and(|c| c.is_ascii_digit()))
        {
            let start = i;
            if lookahead(&chars, i, "0x") || lookahead(&chars, i, "0X") {
                i += 2;
                while i < len && chars[i].is_ascii_hexdigit() {
                    i += 1;
                }
            } else {
                while i < len && chars[i].is_ascii_digit() {
                    i += 1;
                }
                if i < len && chars[i] == '.' {
                    i += 1;
                    while i < len && chars[i].is_ascii_digit() {
                        i += 1;
                    }
                }
                if i < len && chars[i].eq_ignore_ascii_case(&'e') {
                    i += 1;
                    if i < len && (chars[i] == '+' || chars[i] == '-') {
                        i += 1;
                    }
                    while i < len && chars[i].is_ascii_digit() {
                        i += 1;
                    }
                }
            }
            tokens.push(Token {
                kind: TokenKind::Number,
                start,
                end: i,
            });
            continue;
        }

        // identifiers: keyword / builtin / function call / plain text
        if is_ident_start(chars[i]) {
            let start = i;
            while i < len && is_ident_char(chars[i]) {
                i += 1;
            }
            let word: String = chars[start..i].iter().collect();

            let mut j = i;
            while j < len && chars[j].is_whitespace() {
                j += 1;
            }
            let calls = chars.get(j) == Some(&'(');

            let kind = if KEYWORDS.contains(&word.as_str()) {
                TokenKind::Keyword
            } else if BUILTINS.contains(&word.as_str()) {
                TokenKind::Builtin
            } else if calls {
                TokenKind::Function
            } else {
                TokenKind::Text
            };
            tokens.push(Token {
                kind,
                start,
                end: i,
            });
            continue;
        }

        if let Some(op) = OPERATORS.iter().copied().find(|op| lookahead(&chars, i, op)) {
            let op_len = op.chars().count();
            tokens.push(Token {
                kind: TokenKind::Operator,
                start: i,
                end: i + op_len,
            });
            i += op_len;
            continue;
        }

        // whitespace and anything unrecognized
        let start = i;
        while i < len && !starts_token(chars[i]) {
            i += 1;
        }
        if i == start {
            i += 1;
        }
        tokens.push(Token {
            kind: TokenKind::Text,
            start,
            end: i,
        });
    }

    tokens
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(code: &str) -> Vec<(TokenKind, String)> {
        let chars: Vec<char> = code.chars().collect();
        tokenize(code)
            .into_iter()
            .map(|t| (t.kind, chars[t.start..t.end].iter().collect()))
            .collect()
    }

    #[test]
    fn test_keywords_builtins_functions() {
        let toks = kinds("local x = print(foo())");
        assert!(toks.contains(&(TokenKind::Keyword, "local".into())));
        assert!(toks.contains(&(TokenKind::Builtin, "print".into())));
        assert!(toks.contains(&(TokenKind::Function, "foo".into())));
        assert!(toks.contains(&(TokenKind::Text, "x".into())));
    }

    #[test]
    fn test_function_detection_skips_whitespace() {
        let toks = kinds("foo  ()");
        assert_eq!(toks[0], (TokenKind::Function, "foo".into()));
    }

    #[test]
    fn test_strings_and_escapes() {
        let toks = kinds(r#"x = "he said \"hi\"" .. 'y'"#);
        assert!(toks.contains(&(TokenKind::String, r#""he said \"hi\"""#.into())));
        assert!(toks.contains(&(TokenKind::String, "'y'".into())));
        assert!(toks.contains(&(TokenKind::Operator, "..".into())));
    }

    #[test]
    fn test_multiline_string_and_comments() {
        let toks = kinds("[[raw\ntext]] --[[ block ]] -- line\nx");
        assert_eq!(toks[0], (TokenKind::String, "[[raw\ntext]]".into()));
        assert!(toks.contains(&(TokenKind::Comment, "--[[ block ]]".into())));
        assert!(toks.contains(&(TokenKind::Comment, "-- line".into())));
    }

    #[test]
    fn test_numbers() {
        let toks = kinds("a = 42 + 0xFF + 3.14 + 1e-5 + .5");
        let numbers: Vec<_> = toks
            .iter()
            .filter(|(k, _)| *k == TokenKind::Number)
            .map(|(_, v)| v.as_str())
            .collect();
        assert_eq!(numbers, vec!["42", "0xFF", "3.14", "1e-5", ".5"]);
    }

    #[test]
    fn test_operator_longest_match() {
        let toks = kinds("a ... b .. c");
        assert!(toks.contains(&(TokenKind::Operator, "...".into())));
        assert!(toks.contains(&(TokenKind::Operator, "..".into())));
    }

    #[test]
    fn test_tokens_are_ordered_and_gap_free() {
        let code = "local function f(x)\n  return x + 1 -- done\nend\n";
        let toks = tokenize(code);
        let mut pos = 0;
        for t in &toks {
            assert_eq!(t.start, pos);
            assert!(t.end > t.start);
            pos = t.end;
        }
        assert_eq!(pos, code.chars().count());
    }

    #[test]
    fn test_unterminated_string_clamps() {
        let toks = tokenize("\"open");
        assert_eq!(toks.len(), 1);
        assert_eq!(toks[0].end, 5);
    }
}
