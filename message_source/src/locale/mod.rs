//! Locale fallback chains and the current-locale collaborator.
//!
//! A fallback chain starts at the requested locale and narrows it one subtag
//! at a time: variants first, then the region, then the script. The
//! provider's default locale closes the chain unless it already appeared.
//! Resolution is a pure function so providers can compute chains on every
//! lookup without coordination.

mod context;

pub use context::{EnvLocaleContext, FixedLocale, LocaleContext, NoLocaleContext, parse_posix_locale};

use unic_langid::LanguageIdentifier;

/// Returns the ordered fallback chain for `requested`, ending at `default`.
///
/// The first element is always `requested`. Each following element is
/// strictly less specific, and `default` is appended when it is not already
/// part of the chain. No locale appears twice.
///
/// # Examples
///
/// ```
/// use message_source::{fallback_chain, langid};
///
/// let chain = fallback_chain(&langid!("zh-CN"), &langid!("en"));
/// assert_eq!(chain, vec![langid!("zh-CN"), langid!("zh"), langid!("en")]);
/// ```
#[must_use]
pub fn fallback_chain(
    requested: &LanguageIdentifier,
    default: &LanguageIdentifier,
) -> Vec<LanguageIdentifier> {
    let mut chain = Vec::with_capacity(5);
    chain.push(requested.clone());

    let mut narrowed = requested.clone();
    if narrowed.variants().next().is_some() {
        narrowed.clear_variants();
        push_unique(&mut chain, narrowed.clone());
    }
    if narrowed.region.take().is_some() {
        push_unique(&mut chain, narrowed.clone());
    }
    if narrowed.script.take().is_some() {
        push_unique(&mut chain, narrowed);
    }

    push_unique(&mut chain, default.clone());
    chain
}

fn push_unique(chain: &mut Vec<LanguageIdentifier>, locale: LanguageIdentifier) {
    if !chain.contains(&locale) {
        chain.push(locale);
    }
}

#[cfg(test)]
mod tests;
