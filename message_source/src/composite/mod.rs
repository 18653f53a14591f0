//! The composite resolver: many providers answering as one message source.
//!
//! Providers are consulted in priority order and the first one that knows a
//! code wins. Within a provider the whole locale fallback chain is exhausted
//! before the next provider is asked, so a lower-priority provider never
//! shadows a fallback translation of a higher-priority one.
//!
//! Results are cached per `(code, locale, args)`. Any reload that commits new
//! data invalidates the entire cache.

mod builder;
mod cache;
mod inspect;
mod policy;
mod snapshot;
mod stats;

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use arc_swap::ArcSwap;
use parking_lot::Mutex;
use unic_langid::LanguageIdentifier;

pub use builder::CompositeBuilder;
pub use inspect::MessageDiagnostic;
pub use policy::MissingMessagePolicy;
pub use stats::ResolverStats;

use self::cache::{CacheKey, Lookup, MessageCache};
use self::snapshot::Snapshot;
use self::stats::StatsCounters;
use crate::reload::{ReloadPlan, ReloadReport, ReloadTarget};
use crate::{I18nError, LocaleContext, MessageArgs, MessageProvider};

/// Source name used when none is configured.
pub const DEFAULT_COMPOSITE_SOURCE: &str = "composite";

/// Cache capacity used when none is configured.
pub const DEFAULT_CACHE_CAPACITY: usize = 1024;

pub(crate) struct Registration {
    pub(crate) priority: i32,
    pub(crate) provider: Arc<dyn MessageProvider>,
}

/// Ordered set of message providers resolved as a single source.
///
/// Build one with [`CompositeMessageSource::builder`]. Every query method
/// takes `&self` and is safe to call from any number of threads; reloads may
/// run concurrently with queries.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use message_source::{
///     CompositeMessageSource, MemoryResourceStore, MessageArgs, ResourceMessageProvider, langid,
/// };
///
/// let store = Arc::new(
///     MemoryResourceStore::new()
///         .with_resource("common_en", [("a.greeting", "Hi")])
///         .with_resource("common_zh_CN", [("a.greeting", "你好")]),
/// );
/// let common = ResourceMessageProvider::builder("common", store)
///     .default_locale(langid!("en"))
///     .resource(langid!("en"), "common_en")
///     .resource(langid!("zh-CN"), "common_zh_CN")
///     .build()?;
/// let messages = CompositeMessageSource::builder()
///     .with_provider(common)
///     .try_build()?;
///
/// let args = MessageArgs::new();
/// assert_eq!(messages.message("a.greeting", Some(&langid!("zh-CN")), &args), "你好");
/// assert_eq!(messages.message("a.greeting", Some(&langid!("fr")), &args), "Hi");
/// assert_eq!(messages.message("a.unknown", None, &args), "");
/// # Ok::<(), message_source::I18nError>(())
/// ```
pub struct CompositeMessageSource {
    source: String,
    default_locale: LanguageIdentifier,
    registrations: Vec<Registration>,
    locale_context: Arc<dyn LocaleContext>,
    missing_message: MissingMessagePolicy,
    cache: MessageCache,
    snapshot: ArcSwap<Snapshot>,
    stats: StatsCounters,
    write_lock: Mutex<()>,
    destroyed: AtomicBool,
}

impl CompositeMessageSource {
    /// Starts configuring a resolver.
    #[must_use]
    pub fn builder() -> CompositeBuilder {
        CompositeBuilder::new()
    }

    /// Resolves `code` for `locale`, or for the current locale when `locale`
    /// is `None`.
    ///
    /// Never fails: when no provider knows the code the configured
    /// [`MissingMessagePolicy`] decides the result.
    #[must_use]
    pub fn message(
        &self,
        code: &str,
        locale: Option<&LanguageIdentifier>,
        args: &MessageArgs,
    ) -> String {
        self.stats.record_lookup();
        if self.is_destroyed() {
            return self.missing_message.render(code);
        }

        let key = CacheKey {
            code: code.to_owned(),
            locale: self.resolve_locale(locale),
            args: args.clone(),
        };
        let generation = match self.cache.lookup(&key) {
            Lookup::Hit(value) => {
                self.stats.record_cache_hit();
                return value;
            }
            Lookup::Miss { generation } => generation,
        };

        match self.find_message(code, &key.locale, args) {
            Some(value) => {
                self.cache.insert(key, value.clone(), generation);
                value
            }
            None => self.missing_message.render(code),
        }
    }

    /// Walks the providers in priority order without touching the cache.
    ///
    /// Returns `None` when no provider resolves `code` for `locale`.
    #[must_use]
    pub fn find_message(
        &self,
        code: &str,
        locale: &LanguageIdentifier,
        args: &MessageArgs,
    ) -> Option<String> {
        self.stats.record_traversal();
        self.registrations.iter().find_map(|registration| {
            let found = registration.provider.message(code, locale, args)?;
            tracing::trace!(
                code,
                locale = %locale,
                source = %registration.provider.source(),
                "resolved message"
            );
            Some(found)
        })
    }

    /// Union of every provider's supported locales, in priority order.
    #[must_use]
    pub fn supported_locales(&self) -> Vec<LanguageIdentifier> {
        self.snapshot.load().supported_locales.clone()
    }

    /// Locale used when neither the query nor the locale context names one.
    #[must_use]
    pub const fn default_locale(&self) -> &LanguageIdentifier {
        &self.default_locale
    }

    /// Locale a query without an explicit locale resolves against.
    #[must_use]
    pub fn current_locale(&self) -> LanguageIdentifier {
        self.resolve_locale(None)
    }

    /// Source name of the resolver itself.
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Registered providers in priority order.
    pub fn providers(&self) -> impl Iterator<Item = &dyn MessageProvider> + '_ {
        self.registrations
            .iter()
            .map(|registration| registration.provider.as_ref())
    }

    /// The provider registered as `source`.
    #[must_use]
    pub fn provider(&self, source: &str) -> Option<&dyn MessageProvider> {
        self.providers()
            .find(|provider| provider.source() == source)
    }

    /// Every resource identifier owned by a resource-backed provider.
    #[must_use]
    pub fn resources(&self) -> Vec<String> {
        self.snapshot.load().resources.keys().cloned().collect()
    }

    /// Whether any of `resources` is owned by a resource-backed provider.
    #[must_use]
    pub fn can_reload<I, S>(&self, resources: I) -> bool
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let snapshot = self.snapshot.load();
        resources
            .into_iter()
            .any(|resource| !snapshot.owners(resource.as_ref()).is_empty())
    }

    /// Reinitializes the providers owning `resources`, then invalidates the
    /// cache.
    ///
    /// Never fails: per-resource failures are logged and listed in the
    /// returned report while the affected providers keep their previous
    /// mappings. Identifiers no provider owns are reported as ignored.
    /// Overlapping reloads and edits of one resource commit in the order
    /// they observed the store. After [`destroy`](Self::destroy) every identifier is reported as an
    /// [`I18nError::ProviderDestroyed`] failure.
    pub fn reload<I, S>(&self, resources: I) -> ReloadReport
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        if self.is_destroyed() {
            return self.destroyed_report(resources);
        }
        let plan = self.plan_reload(resources);
        let mut report = ReloadReport::new(plan.ignored);
        for target in plan.targets {
            for provider in &target.providers {
                let Some(backed) = provider.as_resource_backed() else {
                    continue;
                };
                match backed.reinitialize_resource(&target.resource) {
                    Ok(()) => report.record_success(&target.resource),
                    Err(err) => report.record_failure(&target.resource, provider.source(), err),
                }
            }
        }
        self.finish_reload(&report);
        report
    }

    /// Drops every cached resolution.
    pub fn invalidate_cache(&self) {
        let generation = self.cache.invalidate();
        tracing::debug!(source = %self.source, generation, "invalidated message cache");
    }

    /// Number of cached resolutions.
    #[must_use]
    pub fn cached_entries(&self) -> usize {
        self.cache.len()
    }

    /// Tears down every provider and clears the cache.
    ///
    /// Idempotent. Afterwards every query returns the missing-message
    /// fallback and reloads fail.
    pub fn destroy(&self) {
        let guard = self.write_lock.lock();
        if self.destroyed.swap(true, Ordering::AcqRel) {
            return;
        }
        for registration in &self.registrations {
            registration.provider.destroy();
        }
        self.cache.invalidate();
        self.snapshot.store(Arc::new(Snapshot::default()));
        drop(guard);
        tracing::debug!(source = %self.source, "destroyed composite message source");
    }

    /// Whether [`destroy`](Self::destroy) has run.
    #[must_use]
    pub fn is_destroyed(&self) -> bool {
        self.destroyed.load(Ordering::Acquire)
    }

    /// Current activity counters.
    #[must_use]
    pub fn stats(&self) -> ResolverStats {
        self.stats.snapshot()
    }

    fn resolve_locale(&self, locale: Option<&LanguageIdentifier>) -> LanguageIdentifier {
        locale
            .cloned()
            .or_else(|| self.locale_context.current_locale())
            .unwrap_or_else(|| self.default_locale.clone())
    }

    /// Maps resource identifiers to their owning providers, preserving the
    /// first-seen order and dropping duplicates.
    pub(crate) fn plan_reload<I, S>(&self, resources: I) -> ReloadPlan
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let snapshot = self.snapshot.load();
        let mut plan = ReloadPlan::default();
        for resource in resources {
            let id = resource.as_ref();
            if plan.contains(id) {
                continue;
            }
            let providers: Vec<Arc<dyn MessageProvider>> = snapshot
                .owners(id)
                .iter()
                .filter_map(|index| self.registrations.get(*index))
                .map(|registration| Arc::clone(&registration.provider))
                .collect();
            if providers.is_empty() {
                plan.ignored.push(id.to_owned());
            } else {
                plan.targets.push(ReloadTarget {
                    resource: id.to_owned(),
                    providers,
                });
            }
        }
        plan
    }

    /// Reports every identifier of a pass as failing against a destroyed
    /// resolver.
    pub(crate) fn destroyed_report<I, S>(&self, resources: I) -> ReloadReport
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut report = ReloadReport::new(Vec::new());
        let mut seen: Vec<String> = Vec::new();
        for resource in resources {
            let id = resource.as_ref();
            if seen.iter().any(|known| known == id) {
                continue;
            }
            seen.push(id.to_owned());
            report.record_failure(
                id,
                &self.source,
                I18nError::ProviderDestroyed {
                    provider: self.source.clone(),
                },
            );
        }
        self.finish_reload(&report);
        report
    }

    /// Publishes the effects of a reload pass.
    ///
    /// The cache is invalidated only after every commit of the pass, and only
    /// when something was committed.
    pub(crate) fn finish_reload(&self, report: &ReloadReport) {
        for failure in report.failures() {
            tracing::warn!(
                resource = %failure.resource,
                source = %failure.provider,
                error = %failure.error,
                "failed to reload message resource"
            );
        }
        if report.reloaded().is_empty() {
            return;
        }
        let guard = self.write_lock.lock();
        if self.is_destroyed() {
            return;
        }
        self.cache.invalidate();
        self.snapshot
            .store(Arc::new(Snapshot::build(&self.registrations)));
        drop(guard);
        self.stats.record_reload();
        tracing::debug!(
            source = %self.source,
            reloaded = ?report.reloaded(),
            "reloaded message resources"
        );
    }
}

impl fmt::Debug for CompositeMessageSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompositeMessageSource")
            .field("source", &self.source)
            .field("default_locale", &self.default_locale)
            .field(
                "providers",
                &self
                    .providers()
                    .map(|provider| provider.source())
                    .collect::<Vec<_>>(),
            )
            .field("missing_message", &self.missing_message)
            .field("destroyed", &self.is_destroyed())
            .finish_non_exhaustive()
    }
}
