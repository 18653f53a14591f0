//! Positional placeholder substitution for message templates.
//!
//! Templates use `{}` for the next argument and `{N}` for the argument at
//! index `N`. Doubled braces (`{{`, `}}`) produce literal braces. A
//! placeholder without a matching argument is kept verbatim so a missing
//! argument stays visible in the output.

use std::borrow::Cow;

use crate::MessageArgs;

/// Substitutes `args` into `template`.
///
/// Borrowed output is returned when the template needs no rewriting.
///
/// # Examples
///
/// ```
/// use message_source::{MessageArgs, format_message};
///
/// let args = MessageArgs::new().with("Ada");
/// assert_eq!(format_message("Hello, {}!", &args), "Hello, Ada!");
/// assert_eq!(format_message("{0} and {0}", &args), "Ada and Ada");
/// assert_eq!(format_message("{1}", &args), "{1}");
/// ```
#[must_use]
pub fn format_message<'a>(template: &'a str, args: &MessageArgs) -> Cow<'a, str> {
    if !template.contains(['{', '}']) {
        return Cow::Borrowed(template);
    }

    let mut out = String::with_capacity(template.len());
    let mut chars = template.chars().peekable();
    let mut next_positional = 0_usize;
    while let Some(ch) = chars.next() {
        match ch {
            '{' if chars.peek() == Some(&'{') => {
                chars.next();
                out.push('{');
            }
            '}' if chars.peek() == Some(&'}') => {
                chars.next();
                out.push('}');
            }
            '{' => {
                let mut inner = String::new();
                let mut closed = false;
                for inner_ch in chars.by_ref() {
                    if inner_ch == '}' {
                        closed = true;
                        break;
                    }
                    inner.push(inner_ch);
                }
                if !closed {
                    out.push('{');
                    out.push_str(&inner);
                    continue;
                }
                let position = if inner.is_empty() {
                    let current = next_positional;
                    next_positional += 1;
                    Some(current)
                } else {
                    inner.trim().parse::<usize>().ok()
                };
                match position.and_then(|index| args.get(index)) {
                    Some(value) => out.push_str(value),
                    None => {
                        out.push('{');
                        out.push_str(&inner);
                        out.push('}');
                    }
                }
            }
            other => out.push(other),
        }
    }
    Cow::Owned(out)
}
