//! Constructors and aggregation helpers for `I18nError`.

use camino::Utf8Path;
use unic_langid::LanguageIdentifier;

use super::{AggregatedErrors, I18nError, ResourceError};

impl I18nError {
    /// Builds a single error from a list of failures.
    ///
    /// Returns `None` for an empty list, the error itself when exactly one is
    /// supplied, and [`Self::Aggregate`] otherwise.
    #[must_use]
    pub fn aggregate<I>(errors: I) -> Option<Self>
    where
        I: IntoIterator<Item = Self>,
    {
        let mut collected: Vec<Self> = errors.into_iter().collect();
        match collected.len() {
            0 => None,
            1 => collected.pop(),
            _ => Some(Self::Aggregate(Box::new(AggregatedErrors::new(collected)))),
        }
    }

    /// Shorthand for a [`Self::Configuration`] error.
    #[must_use]
    pub fn configuration(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Configuration {
            provider: provider.into(),
            message: message.into(),
        }
    }

    /// Parses `value` as a locale, mapping failures to [`Self::InvalidLocale`].
    ///
    /// # Errors
    ///
    /// Returns [`Self::InvalidLocale`] when `value` is not a valid language
    /// identifier.
    pub fn parse_locale(value: &str) -> Result<LanguageIdentifier, Self> {
        value
            .parse::<LanguageIdentifier>()
            .map_err(|cause| Self::InvalidLocale {
                value: value.to_owned(),
                cause,
            })
    }
}

impl From<figment::Error> for I18nError {
    fn from(err: figment::Error) -> Self {
        Self::Settings(Box::new(err))
    }
}

impl ResourceError {
    /// Wraps an I/O failure at `path`, mapping `NotFound` to
    /// [`Self::NotFound`].
    #[must_use]
    pub fn io(path: &Utf8Path, cause: std::io::Error) -> Self {
        if cause.kind() == std::io::ErrorKind::NotFound {
            Self::NotFound {
                resource: path.to_string(),
            }
        } else {
            Self::Io {
                path: path.to_owned(),
                cause,
            }
        }
    }
}
