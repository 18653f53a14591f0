//! Registration phase of the composite resolver.

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::AtomicBool;

use arc_swap::ArcSwap;
use parking_lot::Mutex;
use unic_langid::{LanguageIdentifier, langid};

use super::cache::MessageCache;
use super::snapshot::Snapshot;
use super::stats::StatsCounters;
use super::{
    CompositeMessageSource, DEFAULT_CACHE_CAPACITY, DEFAULT_COMPOSITE_SOURCE, MissingMessagePolicy,
    Registration,
};
use crate::{I18nError, LocaleContext, MessageProvider, NoLocaleContext, ProviderState};

/// Collects providers and options for a [`CompositeMessageSource`].
///
/// Registration is single-threaded and ends with [`Self::try_build`], which
/// loads every uninitialized resource-backed provider before the resolver
/// answers its first query.
pub struct CompositeBuilder {
    source: String,
    default_locale: Option<LanguageIdentifier>,
    cache_capacity: usize,
    locale_context: Arc<dyn LocaleContext>,
    missing_message: MissingMessagePolicy,
    registrations: Vec<Registration>,
}

impl CompositeBuilder {
    pub(crate) fn new() -> Self {
        Self {
            source: DEFAULT_COMPOSITE_SOURCE.to_owned(),
            default_locale: None,
            cache_capacity: DEFAULT_CACHE_CAPACITY,
            locale_context: Arc::new(NoLocaleContext),
            missing_message: MissingMessagePolicy::default(),
            registrations: Vec::new(),
        }
    }

    /// Registers `provider` with priority `0`.
    #[must_use]
    pub fn with_provider(self, provider: impl MessageProvider + 'static) -> Self {
        self.with_shared_provider(0, Arc::new(provider))
    }

    /// Registers `provider` with an explicit priority.
    ///
    /// Lower values are consulted first; equal priorities keep registration
    /// order.
    #[must_use]
    pub fn with_ranked_provider(
        self,
        priority: i32,
        provider: impl MessageProvider + 'static,
    ) -> Self {
        self.with_shared_provider(priority, Arc::new(provider))
    }

    /// Registers a provider that is also held elsewhere.
    #[must_use]
    pub fn with_shared_provider(
        mut self,
        priority: i32,
        provider: Arc<dyn MessageProvider>,
    ) -> Self {
        self.registrations.push(Registration { priority, provider });
        self
    }

    /// Names the resolver. Defaults to `composite`.
    #[must_use]
    pub fn source(mut self, source: impl Into<String>) -> Self {
        self.source = source.into();
        self
    }

    /// Sets the locale used when a query names none and the locale context
    /// reports none.
    ///
    /// Defaults to the default locale of the highest-priority provider, or
    /// `en` when no provider is registered.
    #[must_use]
    pub fn default_locale(mut self, locale: LanguageIdentifier) -> Self {
        self.default_locale = Some(locale);
        self
    }

    /// Bounds the number of cached resolutions. Zero disables caching.
    #[must_use]
    pub const fn cache_capacity(mut self, capacity: usize) -> Self {
        self.cache_capacity = capacity;
        self
    }

    /// Supplies the current locale for queries that omit one.
    #[must_use]
    pub fn locale_context(mut self, context: Arc<dyn LocaleContext>) -> Self {
        self.locale_context = context;
        self
    }

    /// Chooses what a query returns for an unknown code.
    #[must_use]
    pub const fn missing_message_policy(mut self, policy: MissingMessagePolicy) -> Self {
        self.missing_message = policy;
        self
    }

    /// Validates the registrations and initializes resource-backed
    /// providers.
    ///
    /// # Errors
    ///
    /// Returns [`I18nError::Configuration`] for an empty resolver name or two
    /// providers sharing a source name, and the aggregated load failures of
    /// any provider that could not be initialized.
    pub fn try_build(self) -> Result<CompositeMessageSource, I18nError> {
        if self.source.trim().is_empty() {
            return Err(I18nError::configuration(
                self.source,
                "source name must not be empty",
            ));
        }

        let mut registrations = self.registrations;
        registrations.sort_by_key(|registration| registration.priority);

        let mut seen = HashSet::with_capacity(registrations.len());
        for registration in &registrations {
            let name = registration.provider.source();
            if !seen.insert(name) {
                return Err(I18nError::configuration(
                    name,
                    "more than one provider is registered under this source name",
                ));
            }
        }

        let failures: Vec<I18nError> = registrations
            .iter()
            .filter_map(|registration| registration.provider.as_resource_backed())
            .filter(|backed| backed.state() == ProviderState::Uninitialized)
            .filter_map(|backed| backed.initialize().err())
            .collect();
        if let Some(err) = I18nError::aggregate(failures) {
            return Err(err);
        }

        let default_locale = self
            .default_locale
            .or_else(|| {
                registrations
                    .first()
                    .map(|registration| registration.provider.default_locale().clone())
            })
            .unwrap_or_else(|| langid!("en"));
        let snapshot = Snapshot::build(&registrations);

        tracing::debug!(
            source = %self.source,
            providers = registrations.len(),
            resources = snapshot.resources.len(),
            default_locale = %default_locale,
            "built composite message source"
        );

        Ok(CompositeMessageSource {
            source: self.source,
            default_locale,
            registrations,
            locale_context: self.locale_context,
            missing_message: self.missing_message,
            cache: MessageCache::new(self.cache_capacity),
            snapshot: ArcSwap::from_pointee(snapshot),
            stats: StatsCounters::default(),
            write_lock: Mutex::new(()),
            destroyed: AtomicBool::new(false),
        })
    }
}

impl fmt::Debug for CompositeBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompositeBuilder")
            .field("source", &self.source)
            .field("default_locale", &self.default_locale)
            .field("cache_capacity", &self.cache_capacity)
            .field("missing_message", &self.missing_message)
            .field("providers", &self.registrations.len())
            .finish_non_exhaustive()
    }
}
