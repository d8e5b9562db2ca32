//! Shell line wrapping for long commands.

use serde::{Deserialize, Serialize};

/// How a one-line command is wrapped for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WrapStyle {
    /// Maximum line width, including the continuation marker.
    pub width: usize,
    /// Indentation for continuation lines.
    pub indent: usize,
    /// Start a new line before each option flag after the first one.
    pub break_at_options: bool,
}

impl Default for WrapStyle {
    fn default() -> Self {
        Self {
            width: 80,
            indent: 4,
            break_at_options: true,
        }
    }
}

impl WrapStyle {
    /// Style with the given width and default indentation.
    pub fn with_width(width: usize) -> Self {
        Self {
            width,
            ..Self::default()
        }
    }
}

/// Wrap a command into continuation lines ending in ` \`.
///
/// Quoted spans are never split, and a token wider than the line gets a
/// line to itself. Continuation backslashes are aligned to one column.
pub fn add_line_wrappers(command: &str, style: &WrapStyle) -> String {
    let tokens = split_tokens(command);
    if tokens.is_empty() {
        return String::new();
    }

    // room for " \"
    let limit = style.width.saturating_sub(2);
    let pad = " ".repeat(style.indent);

    let mut lines: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut line_has_option = false;

    for token in tokens {
        let is_option = is_option_flag(&token);
        if current.is_empty() {
            current = token;
            line_has_option = is_option;
            continue;
        }

        let fits = text_width(&current) + 1 + text_width(&token) <= limit;
        // the program name keeps its first option on the same line
        let first_line_open = lines.is_empty() && !line_has_option;
        let option_break = style.break_at_options && is_option && !first_line_open;
        if fits && !option_break {
            current.push(' ');
            current.push_str(&token);
            line_has_option |= is_option;
        } else {
            lines.push(std::mem::take(&mut current));
            current = format!("{}{}", pad, token);
            line_has_option = is_option;
        }
    }
    lines.push(current);

    let last = lines.len() - 1;
    let column = lines[..last].iter().map(|l| text_width(l)).max().unwrap_or(0);

    lines
        .iter()
        .enumerate()
        .map(|(i, line)| {
            if i < last {
                format!("{:<width$} \\", line, width = column)
            } else {
                line.clone()
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Split on whitespace, keeping quoted spans inside their token.
fn split_tokens(command: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut quote: Option<char> = None;

    for c in command.chars() {
        match quote {
            Some(q) => {
                current.push(c);
                if c == q {
                    quote = None;
                }
            }
            None if c == '\'' || c == '"' => {
                current.push(c);
                quote = Some(c);
            }
            None if c.is_whitespace() => {
                if !current.is_empty() {
                    tokens.push(std::mem::take(&mut current));
                }
            }
            None => current.push(c),
        }
    }
    if !current.is_empty() {
        tokens.push(current);
    }
    tokens
}

/// `-x...` where x is a letter; `-1` is a value, not a flag.
fn is_option_flag(token: &str) -> bool {
    let mut chars = token.chars();
    chars.next() == Some('-') && chars.next().map_or(false, |c| c.is_ascii_alphabetic())
}

fn text_width(s: &str) -> usize {
    s.chars().count()
}
