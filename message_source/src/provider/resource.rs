//! Provider backed by reloadable key/value resources.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use arc_swap::ArcSwap;
use indexmap::IndexMap;
use parking_lot::Mutex;
use unic_langid::LanguageIdentifier;

use super::{MessageProvider, ProviderState, ResourceBacked, StagedResource};
use crate::{I18nError, MessageArgs, MessageMap, ResourceStore, fallback_chain, format_message};

type Catalogues = HashMap<LanguageIdentifier, Arc<MessageMap>>;

/// Lifecycle state plus the newest revision committed per resource.
struct Lifecycle {
    state: ProviderState,
    committed: HashMap<String, u64>,
}

/// Message provider whose locales are each backed by one resource.
///
/// Every locale's mapping is an immutable [`MessageMap`] behind an `Arc`.
/// The table of mappings lives in an [`ArcSwap`], so readers take a snapshot
/// with a single atomic load and a reload publishes a new table without ever
/// mutating one a reader may hold. A reader therefore sees a locale either
/// entirely before or entirely after a reload.
///
/// Every read or write of a resource is stamped with a revision taken while
/// the store is being accessed, so revisions follow the order in which the
/// store was observed. A commit whose revision is older than the last one
/// committed for its resource is discarded; overlapping reloads therefore
/// never roll a resource back to data read before a newer reload.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use message_source::{
///     MemoryResourceStore, MessageArgs, MessageProvider, ResourceBacked,
///     ResourceMessageProvider, langid,
/// };
///
/// let store = Arc::new(
///     MemoryResourceStore::new()
///         .with_resource("common_en", [("a.greeting", "Hi")])
///         .with_resource("common_zh_CN", [("a.greeting", "你好")]),
/// );
/// let provider = ResourceMessageProvider::builder("common", store)
///     .default_locale(langid!("en"))
///     .resource(langid!("en"), "common_en")
///     .resource(langid!("zh-CN"), "common_zh_CN")
///     .build()
///     .expect("valid declaration");
/// provider.initialize().expect("resources load");
///
/// let args = MessageArgs::new();
/// assert_eq!(provider.message("a.greeting", &langid!("fr"), &args).as_deref(), Some("Hi"));
/// ```
pub struct ResourceMessageProvider {
    source: String,
    default_locale: LanguageIdentifier,
    supported_locales: Vec<LanguageIdentifier>,
    resources: IndexMap<LanguageIdentifier, String>,
    store: Arc<dyn ResourceStore>,
    catalogues: ArcSwap<Catalogues>,
    revision: Mutex<u64>,
    lifecycle: Mutex<Lifecycle>,
}

/// Declares a [`ResourceMessageProvider`].
pub struct ResourceMessageProviderBuilder {
    source: String,
    store: Arc<dyn ResourceStore>,
    default_locale: Option<LanguageIdentifier>,
    resources: Vec<(LanguageIdentifier, String)>,
}

impl ResourceMessageProvider {
    /// Starts declaring a provider named `source` reading from `store`.
    #[must_use]
    pub fn builder(
        source: impl Into<String>,
        store: Arc<dyn ResourceStore>,
    ) -> ResourceMessageProviderBuilder {
        ResourceMessageProviderBuilder {
            source: source.into(),
            store,
            default_locale: None,
            resources: Vec::new(),
        }
    }

    fn destroyed(&self) -> I18nError {
        I18nError::ProviderDestroyed {
            provider: self.source.clone(),
        }
    }

    fn locales_for(&self, resource: &str) -> Vec<LanguageIdentifier> {
        self.resources
            .iter()
            .filter(|(_, candidate)| candidate.as_str() == resource)
            .map(|(locale, _)| locale.clone())
            .collect()
    }

    /// Runs `access` against the store under a fresh revision.
    fn with_revision<T>(&self, access: impl FnOnce() -> T) -> (u64, T) {
        let mut last = self.revision.lock();
        *last += 1;
        let revision = *last;
        let outcome = access();
        drop(last);
        (revision, outcome)
    }

    fn unknown_resource(&self, resource: &str) -> I18nError {
        I18nError::UnknownResource {
            provider: self.source.clone(),
            resource: resource.to_owned(),
        }
    }

    fn publish(&self, locales: &[LanguageIdentifier], messages: &Arc<MessageMap>) {
        self.catalogues.rcu(|current| {
            let mut next = Catalogues::clone(current);
            for locale in locales {
                next.insert(locale.clone(), Arc::clone(messages));
            }
            next
        });
    }
}

impl ResourceMessageProviderBuilder {
    /// Sets the locale closing every fallback chain.
    ///
    /// Defaults to the first declared resource locale.
    #[must_use]
    pub fn default_locale(mut self, locale: LanguageIdentifier) -> Self {
        self.default_locale = Some(locale);
        self
    }

    /// Binds `locale` to the resource identified by `resource`.
    #[must_use]
    pub fn resource(mut self, locale: LanguageIdentifier, resource: impl Into<String>) -> Self {
        self.resources.push((locale, resource.into()));
        self
    }

    /// Validates the declaration.
    ///
    /// The provider starts [`ProviderState::Uninitialized`]; call
    /// [`ResourceBacked::initialize`] or register it with a resolver
    /// builder, which initializes it.
    ///
    /// # Errors
    ///
    /// Returns [`I18nError::Configuration`] for an empty source name, an
    /// empty resource identifier, a locale bound twice, or a provider with
    /// neither resources nor a default locale.
    pub fn build(self) -> Result<ResourceMessageProvider, I18nError> {
        if self.source.trim().is_empty() {
            return Err(I18nError::configuration(
                self.source,
                "source name must not be empty",
            ));
        }

        let mut resources = IndexMap::with_capacity(self.resources.len());
        for (locale, resource) in self.resources {
            if resource.trim().is_empty() {
                return Err(I18nError::configuration(
                    self.source,
                    format!("resource for {locale} must not be empty"),
                ));
            }
            if resources.contains_key(&locale) {
                return Err(I18nError::configuration(
                    self.source,
                    format!("locale {locale} is bound to more than one resource"),
                ));
            }
            resources.insert(locale, resource);
        }

        let default_locale = match self.default_locale {
            Some(locale) => locale,
            None => resources.keys().next().cloned().ok_or_else(|| {
                I18nError::configuration(
                    self.source.clone(),
                    "a default locale or at least one resource is required",
                )
            })?,
        };

        Ok(ResourceMessageProvider {
            supported_locales: resources.keys().cloned().collect(),
            source: self.source,
            default_locale,
            resources,
            store: self.store,
            catalogues: ArcSwap::from_pointee(Catalogues::new()),
            revision: Mutex::new(0),
            lifecycle: Mutex::new(Lifecycle {
                state: ProviderState::Uninitialized,
                committed: HashMap::new(),
            }),
        })
    }
}

impl MessageProvider for ResourceMessageProvider {
    fn message(
        &self,
        code: &str,
        locale: &LanguageIdentifier,
        args: &MessageArgs,
    ) -> Option<String> {
        let catalogues = self.catalogues.load();
        fallback_chain(locale, &self.default_locale)
            .iter()
            .find_map(|candidate| catalogues.get(candidate)?.get(code))
            .map(|template| format_message(template, args).into_owned())
    }

    fn supported_locales(&self) -> &[LanguageIdentifier] {
        &self.supported_locales
    }

    fn default_locale(&self) -> &LanguageIdentifier {
        &self.default_locale
    }

    fn source(&self) -> &str {
        &self.source
    }

    fn as_resource_backed(&self) -> Option<&dyn ResourceBacked> {
        Some(self)
    }

    fn destroy(&self) {
        let mut lifecycle = self.lifecycle.lock();
        if lifecycle.state == ProviderState::Destroyed {
            return;
        }
        lifecycle.state = ProviderState::Destroyed;
        self.catalogues.store(Arc::new(Catalogues::new()));
        drop(lifecycle);
        tracing::debug!(source = %self.source, "destroyed message provider");
    }
}

impl ResourceBacked for ResourceMessageProvider {
    fn state(&self) -> ProviderState {
        self.lifecycle.lock().state
    }

    fn resource(&self, locale: &LanguageIdentifier) -> Option<&str> {
        self.resources.get(locale).map(String::as_str)
    }

    fn resources(&self) -> Vec<&str> {
        let mut seen: Vec<&str> = Vec::with_capacity(self.resources.len());
        for resource in self.resources.values() {
            if !seen.contains(&resource.as_str()) {
                seen.push(resource);
            }
        }
        seen
    }

    fn owns_resource(&self, resource: &str) -> bool {
        self.resources.values().any(|candidate| candidate == resource)
    }

    fn store(&self) -> &dyn ResourceStore {
        self.store.as_ref()
    }

    fn initialize(&self) -> Result<(), I18nError> {
        let outcome = self.reinitialize_all_resources();
        let mut lifecycle = self.lifecycle.lock();
        if lifecycle.state == ProviderState::Destroyed {
            return Err(self.destroyed());
        }
        lifecycle.state = ProviderState::Initialized;
        drop(lifecycle);
        tracing::debug!(source = %self.source, "initialized message provider");
        outcome
    }

    fn stage_resource(&self, resource: &str) -> Result<StagedResource, I18nError> {
        if self.state() == ProviderState::Destroyed {
            return Err(self.destroyed());
        }
        let locales = self.locales_for(resource);
        if locales.is_empty() {
            return Err(self.unknown_resource(resource));
        }
        let (revision, loaded) = self.with_revision(|| self.store.load(resource));
        let messages = loaded.map_err(|cause| I18nError::ResourceLoad {
            resource: resource.to_owned(),
            cause,
        })?;
        Ok(StagedResource {
            resource: resource.to_owned(),
            locales,
            messages: Arc::new(messages),
            revision,
        })
    }

    fn write_resource(
        &self,
        resource: &str,
        messages: MessageMap,
    ) -> Result<StagedResource, I18nError> {
        if self.state() == ProviderState::Destroyed {
            return Err(self.destroyed());
        }
        let locales = self.locales_for(resource);
        if locales.is_empty() {
            return Err(self.unknown_resource(resource));
        }
        let (revision, written) = self.with_revision(|| self.store.write(resource, &messages));
        written.map_err(|cause| I18nError::ResourceWrite {
            resource: resource.to_owned(),
            cause,
        })?;
        Ok(StagedResource {
            resource: resource.to_owned(),
            locales,
            messages: Arc::new(messages),
            revision,
        })
    }

    fn commit_resource(&self, staged: StagedResource) -> Result<(), I18nError> {
        if !self.owns_resource(&staged.resource) {
            return Err(self.unknown_resource(&staged.resource));
        }
        let mut lifecycle = self.lifecycle.lock();
        if lifecycle.state == ProviderState::Destroyed {
            return Err(self.destroyed());
        }
        let newest = lifecycle.committed.get(&staged.resource).copied();
        if newest.is_some_and(|committed| committed > staged.revision) {
            drop(lifecycle);
            tracing::debug!(
                source = %self.source,
                resource = %staged.resource,
                revision = staged.revision,
                "discarded resource superseded by a newer commit"
            );
            return Ok(());
        }
        self.publish(&staged.locales, &staged.messages);
        lifecycle
            .committed
            .insert(staged.resource.clone(), staged.revision);
        drop(lifecycle);
        tracing::debug!(
            source = %self.source,
            resource = %staged.resource,
            entries = staged.messages.len(),
            "reinitialized message resource"
        );
        Ok(())
    }

    fn messages(&self, locale: &LanguageIdentifier) -> Option<Arc<MessageMap>> {
        self.catalogues.load().get(locale).cloned()
    }

    fn replace_messages(
        &self,
        locale: &LanguageIdentifier,
        messages: MessageMap,
    ) -> Result<(), I18nError> {
        let resource = self
            .resources
            .get(locale)
            .ok_or_else(|| I18nError::UnsupportedLocale {
                provider: self.source.clone(),
                locale: locale.clone(),
            })?;
        let revision = self.with_revision(|| ()).0;
        self.commit_resource(StagedResource {
            resource: resource.clone(),
            locales: self.locales_for(resource),
            messages: Arc::new(messages),
            revision,
        })
    }
}

impl fmt::Debug for ResourceMessageProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResourceMessageProvider")
            .field("source", &self.source)
            .field("default_locale", &self.default_locale)
            .field("resources", &self.resources)
            .field("state", &self.state())
            .finish_non_exhaustive()
    }
}
