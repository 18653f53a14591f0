//! Reader and writer for `.properties`-style key/value documents.
//!
//! The supported subset covers what message catalogues use in practice:
//!
//! - `#` and `!` start comment lines; blank lines are ignored.
//! - The key ends at the first unescaped `=`, `:` or whitespace. Whitespace
//!   around the separator is skipped, so `key value` and `key = value` read
//!   alike. Trailing whitespace belongs to the value.
//! - A line ending in an odd number of backslashes continues on the next
//!   line, whose leading whitespace is dropped.
//! - `\n`, `\t`, `\r`, `\\`, `\uXXXX` and escaped separators are decoded.
//!
//! Rendering sorts keys so written files diff cleanly.

use super::MessageMap;
use crate::ResourceError;

/// Parses `text` into a message mapping.
///
/// # Errors
///
/// Returns [`ResourceError::Parse`] for a line without a separator, an empty
/// key, or a malformed `\u` escape.
pub fn parse(resource: &str, text: &str) -> Result<MessageMap, ResourceError> {
    let mut messages = MessageMap::new();
    let mut lines = text.lines().enumerate();
    while let Some((index, raw)) = lines.next() {
        let line_number = index + 1;
        let trimmed = raw.trim_start();
        if trimmed.is_empty() || trimmed.starts_with(['#', '!']) {
            continue;
        }

        let mut logical = trimmed.to_owned();
        while ends_with_continuation(&logical) {
            logical.pop();
            match lines.next() {
                Some((_, next)) => logical.push_str(next.trim_start()),
                None => break,
            }
        }

        let (key, value) = split_entry(&logical).ok_or_else(|| ResourceError::Parse {
            resource: resource.to_owned(),
            line: line_number,
            message: "expected `key = value`".to_owned(),
        })?;
        let decoded_key = unescape(key).map_err(|message| ResourceError::Parse {
            resource: resource.to_owned(),
            line: line_number,
            message,
        })?;
        if decoded_key.is_empty() {
            return Err(ResourceError::Parse {
                resource: resource.to_owned(),
                line: line_number,
                message: "empty key".to_owned(),
            });
        }
        let decoded_value = unescape(value).map_err(|message| ResourceError::Parse {
            resource: resource.to_owned(),
            line: line_number,
            message,
        })?;
        messages.insert(decoded_key, decoded_value);
    }
    Ok(messages)
}

/// Renders `messages` as a document accepted by [`parse`].
#[must_use]
pub fn render(messages: &MessageMap) -> String {
    let mut entries: Vec<(&String, &String)> = messages.iter().collect();
    entries.sort_unstable_by(|left, right| left.0.cmp(right.0));

    let mut out = String::new();
    for (key, value) in entries {
        out.push_str(&escape(key, true));
        out.push_str(" = ");
        out.push_str(&escape(value, false));
        out.push('\n');
    }
    out
}

fn ends_with_continuation(line: &str) -> bool {
    let trailing = line.chars().rev().take_while(|ch| *ch == '\\').count();
    !trailing.is_multiple_of(2)
}

/// Splits a logical line into its raw key and raw value.
///
/// `line` starts with the key; the value keeps its trailing whitespace.
fn split_entry(line: &str) -> Option<(&str, &str)> {
    let mut escaped = false;
    for (offset, ch) in line.char_indices() {
        match ch {
            '\\' if !escaped => escaped = true,
            '=' | ':' if !escaped => {
                let (key, rest) = line.split_at(offset);
                return Some((key, rest.get(1..).unwrap_or_default().trim_start()));
            }
            blank if blank.is_whitespace() && !escaped => {
                let (key, rest) = line.split_at(offset);
                let after = rest.trim_start();
                let value = after
                    .strip_prefix(['=', ':'])
                    .map_or(after, str::trim_start);
                return Some((key, value));
            }
            _ => escaped = false,
        }
    }
    None
}

fn unescape(text: &str) -> Result<String, String> {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(ch) = chars.next() {
        if ch != '\\' {
            out.push(ch);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some('u') => {
                let digits: String = chars.by_ref().take(4).collect();
                let decoded = u32::from_str_radix(&digits, 16)
                    .ok()
                    .filter(|_| digits.len() == 4)
                    .and_then(char::from_u32)
                    .ok_or_else(|| format!("invalid unicode escape `\\u{digits}`"))?;
                out.push(decoded);
            }
            Some(other) => out.push(other),
            None => {}
        }
    }
    Ok(out)
}

fn escape(text: &str, is_key: bool) -> String {
    let mut out = String::with_capacity(text.len());
    for (position, ch) in text.chars().enumerate() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            '=' | ':' if is_key => {
                out.push('\\');
                out.push(ch);
            }
            '#' | '!' if is_key && position == 0 => {
                out.push('\\');
                out.push(ch);
            }
            ' ' if is_key || position == 0 => out.push_str("\\ "),
            control if control.is_control() => {
                out.push_str(&format!("\\u{:04x}", u32::from(control)));
            }
            other => out.push(other),
        }
    }
    out
}
