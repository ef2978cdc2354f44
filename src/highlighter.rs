// ABOUTME: Syntax highlighter for REPL with color support
// Implements rustyline's Highlighter trait to provide ANSI color codes
// for Lisp syntax elements while preserving display width

use rustyline::Helper;
use rustyline::completion::Completer;
use rustyline::highlight::{Highlighter, CmdKind};
use rustyline::hint::Hinter;
use rustyline::validate::Validator;
use std::borrow::Cow;
use std::collections::HashSet;

// ANSI color codes (using 3-bit/4-bit colors for maximum terminal compatibility)
const COLOR_RESET: &str = "\x1b[0m";
const COLOR_PARENS: &str = "\x1b[1;34m"; // Bold blue
const COLOR_SPECIAL_FORM: &str = "\x1b[1;35m"; // Bold magenta
const COLOR_BUILTIN: &str = "\x1b[36m"; // Cyan
const COLOR_NUMBER: &str = "\x1b[33m"; // Yellow
const COLOR_STRING: &str = "\x1b[32m"; // Green
const COLOR_COMMENT: &str = "\x1b[90m"; // Bright black (gray)
const COLOR_QUOTE: &str = "\x1b[1;33m"; // Bold yellow

/// Main highlighter helper for Lisp REPL
/// Provides syntax-aware color highlighting for Lisp syntax
pub struct LispHelper;

impl LispHelper {
    pub fn new() -> Self {
        LispHelper
    }
}

impl Default for LispHelper {
    fn default() -> Self {
        Self::new()
    }
}

// Implement the required rustyline traits
impl Helper for LispHelper {}

impl Completer for LispHelper {
    type Candidate = String;
}

impl Hinter for LispHelper {
    type Hint = String;
}

impl Validator for LispHelper {}

impl Highlighter for LispHelper {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        // Build the special forms and built-in sets
        let special_forms = get_special_forms();
        let builtins = get_builtins();

        // Tokenize and colorize
        let highlighted = highlight_line(line, &special_forms, &builtins);

        if highlighted == line {
            Cow::Borrowed(line)
        } else {
            Cow::Owned(highlighted)
        }
    }

    fn highlight_char(&self, _line: &str, _pos: usize, _kind: CmdKind) -> bool {
        true  // Always trigger re-highlighting on character input or cursor movement
    }
}

/// Tokenize a line and apply syntax highlighting
fn highlight_line(
    line: &str,
    special_forms: &HashSet<&'static str>,
    builtins: &HashSet<&'static str>,
) -> String {
    let mut result = String::new();
    let chars: Vec<char> = line.chars().collect();
    let mut i = 0;

    while i < chars.len() {
        match chars[i] {
            // Comments: everything from ; to end of line
            ';' => {
                result.push_str(COLOR_COMMENT);
                while i < chars.len() && chars[i] != '\n' {
                    result.push(chars[i]);
                    i += 1;
                }
                result.push_str(COLOR_RESET);
            }

            // Strings: preserve exact content but colorize
            '"' => {
                result.push_str(COLOR_STRING);
                result.push('"');
                i += 1;

                // Read string content with escape handling
                let mut found_close = false;
                while i < chars.len() {
                    if chars[i] == '\\' && i + 1 < chars.len() {
                        result.push(chars[i]);
                        result.push(chars[i + 1]);
                        i += 2;
                    } else if chars[i] == '"' {
                        result.push('"');
                        i += 1;
                        found_close = true;
                        break;
                    } else {
                        result.push(chars[i]);
                        i += 1;
                    }
                }

                result.push_str(COLOR_RESET);
                if !found_close && i > 0 {
                    // Unclosed string - let it still be colored to end of line
                    while i < chars.len() && chars[i] != '\n' {
                        result.push(chars[i]);
                        i += 1;
                    }
                }
            }

            // Numbers: handle all numeric formats
            '0'..='9' | '.' => {
                let old_i = i;
                if chars[i] == '.' && i + 1 < chars.len() && chars[i + 1].is_ascii_digit() {
                    // .5 style number
                    i += 1;
                    while i < chars.len() && chars[i].is_ascii_digit() {
                        i += 1;
                    }
                } else if chars[i].is_ascii_digit() {
                    // Regular number
                    while i < chars.len() && chars[i].is_ascii_digit() {
                        i += 1;
                    }
                    if i < chars.len() && chars[i] == '.' && i + 1 < chars.len() {
                        if chars[i + 1].is_ascii_digit() {
                            i += 1;
                            while i < chars.len() && chars[i].is_ascii_digit() {
                                i += 1;
                            }
                        }
                    }
                } else {
                    // Just a dot, which might be part of a symbol
                    result.push(chars[i]);
                    i += 1;
                    continue;
                }

                let num_str: String = chars[old_i..i].iter().collect();
                result.push_str(COLOR_NUMBER);
                result.push_str(&num_str);
                result.push_str(COLOR_RESET);
            }

            // Signed numbers or symbols starting with +/-
            '+' | '-' => {
                // Only treat as number start if immediately followed by digit or dot+digit
                if i + 1 < chars.len()
                    && (chars[i + 1].is_ascii_digit()
                        || (chars[i + 1] == '.'
                            && i + 2 < chars.len()
                            && chars[i + 2].is_ascii_digit()))
                {
                    let old_i = i;
                    i += 1;

                    if chars[old_i + 1] == '.' {
                        // -.5 or +.5
                        i += 1;
                        while i < chars.len() && chars[i].is_ascii_digit() {
                            i += 1;
                        }
                    } else {
                        // -123 or +456
                        while i < chars.len() && chars[i].is_ascii_digit() {
                            i += 1;
                        }
                        if i < chars.len() && chars[i] == '.' && i + 1 < chars.len() {
                            if chars[i + 1].is_ascii_digit() {
                                i += 1;
                                while i < chars.len() && chars[i].is_ascii_digit() {
                                    i += 1;
                                }
                            }
                        }
                    }

                    let num_str: String = chars[old_i..i].iter().collect();
                    result.push_str(COLOR_NUMBER);
                    result.push_str(&num_str);
                    result.push_str(COLOR_RESET);
                } else {
                    // Just a symbol (+, -, or symbol starting with them)
                    let start = i;
                    while i < chars.len()
                        && !chars[i].is_whitespace()
                        && chars[i] != '('
                        && chars[i] != ')'
                        && chars[i] != '"'
                        && chars[i] != ';'
                        && chars[i] != '\''
                    {
                        i += 1;
                    }

                    let symbol: String = chars[start..i].iter().collect();
                    let builtins = get_builtins();

                    if builtins.contains(symbol.as_str()) {
                        result.push_str(COLOR_BUILTIN);
                        result.push_str(&symbol);
                        result.push_str(COLOR_RESET);
                    } else {
                        result.push_str(&symbol);
                    }
                }
            }

            // Quote prefix: 'x desugars to (quote x) (§6.1)
            '\'' => {
                result.push_str(COLOR_QUOTE);
                result.push(chars[i]);
                i += 1;
                result.push_str(COLOR_RESET);
            }

            // Parentheses
            '(' | ')' => {
                result.push_str(COLOR_PARENS);
                result.push(chars[i]);
                i += 1;
                result.push_str(COLOR_RESET);
            }

            // Whitespace
            ' ' | '\t' | '\n' | '\r' => {
                result.push(chars[i]);
                i += 1;
            }

            // Symbols (variables, function names, etc.)
            _ => {
                let start = i;
                while i < chars.len()
                    && !chars[i].is_whitespace()
                    && chars[i] != '('
                    && chars[i] != ')'
                    && chars[i] != '"'
                    && chars[i] != ';'
                    && chars[i] != '\''
                {
                    i += 1;
                }

                let symbol: String = chars[start..i].iter().collect();

                // Classify the symbol
                if special_forms.contains(symbol.as_str()) {
                    result.push_str(COLOR_SPECIAL_FORM);
                    result.push_str(&symbol);
                    result.push_str(COLOR_RESET);
                } else if builtins.contains(symbol.as_str()) {
                    result.push_str(COLOR_BUILTIN);
                    result.push_str(&symbol);
                    result.push_str(COLOR_RESET);
                } else {
                    // Regular symbol
                    result.push_str(&symbol);
                }
            }
        }
    }

    result
}

/// Operators with their own evaluation rule rather than plain call semantics
/// (§4.4, "Binding and scoping" / "Functions and macros" / "Sequencing and
/// control").
fn get_special_forms() -> HashSet<&'static str> {
    [
        "let", "letrec", "define!", "fun", "macro", "quote", "if", "begin",
    ]
    .iter()
    .copied()
    .collect()
}

/// Every other seeded primitive and constant (§4.4).
fn get_builtins() -> HashSet<&'static str> {
    [
        "+", "-", "*", "mod", "/", "=", "<", "<=", ">", ">=", "randint!", "list", "cons", "head",
        "tail", "int?", "str?", "list?", "alloc!", "get!", "set!", "str", "str2int", "print!",
        "readline!", "require!", "help!", "true", "false", "nil",
    ]
    .iter()
    .copied()
    .collect()
}
