//! Sources of the "current locale" used when a query names no locale.
//!
//! The resolver never owns ambient locale state. Callers inject a
//! [`LocaleContext`] at build time and the resolver asks it for the current
//! locale on each query that omits one.

use std::env;
use std::fmt;

use unic_langid::LanguageIdentifier;

/// Supplies the locale of the calling context.
///
/// Implementations might read a request-scoped value, a thread-local set by
/// middleware, or the process environment. Returning `None` makes the
/// resolver fall back to its own default locale.
pub trait LocaleContext: Send + Sync {
    /// Returns the locale of the current caller, if one is known.
    fn current_locale(&self) -> Option<LanguageIdentifier>;
}

/// Context that never reports a locale.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoLocaleContext;

impl LocaleContext for NoLocaleContext {
    fn current_locale(&self) -> Option<LanguageIdentifier> {
        None
    }
}

/// Context that always reports the same locale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixedLocale(LanguageIdentifier);

impl FixedLocale {
    /// Wraps `locale`.
    #[must_use]
    pub const fn new(locale: LanguageIdentifier) -> Self {
        Self(locale)
    }
}

impl LocaleContext for FixedLocale {
    fn current_locale(&self) -> Option<LanguageIdentifier> {
        Some(self.0.clone())
    }
}

/// Context reading the POSIX locale variables of the process.
///
/// `LC_ALL` wins over `LC_MESSAGES`, which wins over `LANG`. The variables
/// are read on every call so changes made at runtime are observed.
#[derive(Default, Clone, Copy)]
pub struct EnvLocaleContext;

const LOCALE_VARIABLES: [&str; 3] = ["LC_ALL", "LC_MESSAGES", "LANG"];

impl LocaleContext for EnvLocaleContext {
    fn current_locale(&self) -> Option<LanguageIdentifier> {
        LOCALE_VARIABLES.iter().find_map(|name| {
            env::var(name)
                .ok()
                .filter(|value| !value.trim().is_empty())
                .and_then(|value| parse_posix_locale(&value))
        })
    }
}

impl fmt::Debug for EnvLocaleContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EnvLocaleContext")
            .field("variables", &LOCALE_VARIABLES)
            .finish()
    }
}

/// Parses a POSIX locale string such as `zh_CN.UTF-8` or `de_DE@euro`.
///
/// The codeset and modifier are discarded. `C` and `POSIX` name no language
/// and yield `None`, as does any text `unic-langid` rejects.
///
/// # Examples
///
/// ```
/// use message_source::{langid, parse_posix_locale};
///
/// assert_eq!(parse_posix_locale("zh_CN.UTF-8"), Some(langid!("zh-CN")));
/// assert_eq!(parse_posix_locale("C"), None);
/// ```
#[must_use]
pub fn parse_posix_locale(value: &str) -> Option<LanguageIdentifier> {
    let without_modifier = value.split('@').next().unwrap_or_default();
    let language_part = without_modifier
        .split('.')
        .next()
        .unwrap_or_default()
        .trim();
    if language_part.is_empty() || matches!(language_part, "C" | "POSIX") {
        return None;
    }
    language_part.parse().ok()
}
