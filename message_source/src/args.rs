//! Positional arguments supplied with a message query.

use std::fmt::Display;

/// Ordered positional arguments substituted into a message template.
///
/// Arguments are rendered to text when they are added, which keeps the type
/// hashable so it can take part in the resolver's cache key.
///
/// # Examples
///
/// ```
/// use message_source::MessageArgs;
///
/// let args = MessageArgs::new().with("Ada").with(3);
/// assert_eq!(args.as_slice(), ["Ada", "3"]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct MessageArgs(Vec<String>);

impl MessageArgs {
    /// Creates an empty argument list.
    #[must_use]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    /// Appends `value`, returning the extended list.
    #[must_use]
    pub fn with(mut self, value: impl Display) -> Self {
        self.push(value);
        self
    }

    /// Appends `value` in place.
    pub fn push(&mut self, value: impl Display) {
        self.0.push(value.to_string());
    }

    /// Returns the argument at `position`.
    #[must_use]
    pub fn get(&self, position: usize) -> Option<&str> {
        self.0.get(position).map(String::as_str)
    }

    /// Returns the rendered arguments in order.
    #[must_use]
    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    /// Number of arguments.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether no arguments were supplied.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<T: Display> FromIterator<T> for MessageArgs {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self(iter.into_iter().map(|value| value.to_string()).collect())
    }
}

impl<'a> IntoIterator for &'a MessageArgs {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
