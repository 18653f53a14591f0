//! Aggregation container for several [`I18nError`] values.

use std::{error::Error, fmt};

use super::I18nError;

/// Collection of [`I18nError`]s produced by a single operation.
///
/// Reinitializing every resource of a provider, or initializing every
/// provider of a resolver, keeps going after the first failure and gathers
/// the failures here.
///
/// # Examples
///
/// ```
/// use message_source::I18nError;
///
/// let err = I18nError::aggregate(vec![
///     I18nError::UnknownProvider { provider: "app".into() },
///     I18nError::CoordinatorClosed,
/// ]);
/// if let Some(I18nError::Aggregate(agg)) = err {
///     assert_eq!(agg.len(), 2);
/// }
/// ```
#[derive(Debug, Default)]
pub struct AggregatedErrors(Vec<I18nError>);

impl AggregatedErrors {
    /// Create a new aggregation from a vector of errors.
    #[must_use]
    pub const fn new(errors: Vec<I18nError>) -> Self {
        Self(errors)
    }

    /// Iterate over the contained errors.
    #[must_use = "iterators should be consumed to inspect errors"]
    pub fn iter(&self) -> std::slice::Iter<'_, I18nError> {
        self.0.iter()
    }

    /// Number of errors in the aggregation.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the aggregation holds no errors.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for AggregatedErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (position, err) in self.0.iter().enumerate() {
            if position > 0 {
                writeln!(f)?;
            }
            write!(f, "{}: {err}", position + 1)?;
        }
        Ok(())
    }
}

impl Error for AggregatedErrors {}

impl<'a> IntoIterator for &'a AggregatedErrors {
    type Item = &'a I18nError;
    type IntoIter = std::slice::Iter<'a, I18nError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl IntoIterator for AggregatedErrors {
    type Item = I18nError;
    type IntoIter = std::vec::IntoIter<I18nError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}
