//! Message providers: independent origins of localized messages.
//!
//! [`MessageProvider`] is the capability every origin offers. Providers whose
//! data comes from reloadable resources additionally expose
//! [`ResourceBacked`], which callers discover through
//! [`MessageProvider::as_resource_backed`] instead of downcasting.

mod fluent;
mod resource;

use std::fmt;
use std::sync::Arc;

use unic_langid::LanguageIdentifier;

pub use fluent::{
    FluentMessageProvider, FluentMessageProviderBuilder, FormattingIssue, FormattingIssueReporter,
};
pub use resource::{ResourceMessageProvider, ResourceMessageProviderBuilder};

use crate::{I18nError, MessageArgs, MessageMap, ResourceStore};

/// One origin of localized messages.
///
/// Implementations must be safe for unbounded concurrent reads. A provider
/// answers only from its own data and walks its own locale fallback chain;
/// it never consults other providers.
pub trait MessageProvider: Send + Sync {
    /// Resolves `code` for `locale`, substituting `args`.
    ///
    /// Returns `None` when the code is absent for every locale in the
    /// provider's fallback chain for `locale`.
    fn message(&self, code: &str, locale: &LanguageIdentifier, args: &MessageArgs)
    -> Option<String>;

    /// Locales this provider holds messages for, in declaration order.
    fn supported_locales(&self) -> &[LanguageIdentifier];

    /// Locale closing every fallback chain of this provider.
    fn default_locale(&self) -> &LanguageIdentifier;

    /// Stable identifier used for routing writes and diagnostics.
    fn source(&self) -> &str;

    /// Returns the resource-aware capability set, when supported.
    fn as_resource_backed(&self) -> Option<&dyn ResourceBacked> {
        None
    }

    /// Releases whatever the provider holds. Called once on resolver teardown.
    fn destroy(&self) {}
}

impl fmt::Debug for dyn MessageProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MessageProvider")
            .field("source", &self.source())
            .field("default_locale", &self.default_locale().to_string())
            .field("resource_backed", &self.as_resource_backed().is_some())
            .finish()
    }
}

/// Lifecycle of a resource-backed provider's data.
///
/// `Uninitialized → Initialized → Initialized (reinitialize) → Destroyed`.
/// No other transitions exist; reinitializing a destroyed provider fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderState {
    /// No resource has been loaded yet.
    Uninitialized,
    /// Resources were loaded at least once.
    Initialized,
    /// The provider was torn down and serves nothing.
    Destroyed,
}

/// Data read from a resource, ready to be swapped into a provider.
///
/// Staging performs the I/O without touching provider state. Only
/// [`ResourceBacked::commit_resource`] publishes the data, so dropping a
/// staged resource (for example after a timeout) leaves the provider as it
/// was. Each stage carries the revision at which the store was read; a
/// commit older than the last one committed for the resource is dropped.
#[derive(Debug, Clone)]
pub struct StagedResource {
    pub(crate) resource: String,
    pub(crate) locales: Vec<LanguageIdentifier>,
    pub(crate) messages: Arc<MessageMap>,
    pub(crate) revision: u64,
}

impl StagedResource {
    /// Resource identifier the data was read from.
    #[must_use]
    pub fn resource(&self) -> &str {
        &self.resource
    }

    /// Locales the data will replace when committed.
    #[must_use]
    pub fn locales(&self) -> &[LanguageIdentifier] {
        &self.locales
    }

    /// The staged mapping.
    #[must_use]
    pub fn messages(&self) -> &MessageMap {
        &self.messages
    }

    /// Order in which the store was observed for this data.
    #[must_use]
    pub const fn revision(&self) -> u64 {
        self.revision
    }
}

/// Resource-aware operations of a provider backed by external resources.
pub trait ResourceBacked: Send + Sync {
    /// Current lifecycle state.
    fn state(&self) -> ProviderState;

    /// Resource backing `locale`, if any.
    fn resource(&self, locale: &LanguageIdentifier) -> Option<&str>;

    /// Every resource identifier of the provider, in declaration order.
    fn resources(&self) -> Vec<&str>;

    /// Whether `resource` backs any locale of this provider.
    fn owns_resource(&self, resource: &str) -> bool {
        self.resources().contains(&resource)
    }

    /// Store the provider loads from and writes through.
    fn store(&self) -> &dyn ResourceStore;

    /// Loads every resource for the first time.
    ///
    /// Resources that load are published even when others fail, and the
    /// provider moves to [`ProviderState::Initialized`] either way.
    ///
    /// # Errors
    ///
    /// Returns the load failures, aggregated when there are several, or
    /// [`I18nError::ProviderDestroyed`] after teardown.
    fn initialize(&self) -> Result<(), I18nError>;

    /// Reads `resource` without changing provider state.
    ///
    /// # Errors
    ///
    /// Returns [`I18nError::UnknownResource`] when the provider does not own
    /// `resource`, [`I18nError::ProviderDestroyed`] after teardown, or
    /// [`I18nError::ResourceLoad`] when the store fails.
    fn stage_resource(&self, resource: &str) -> Result<StagedResource, I18nError>;

    /// Persists `messages` as the full content of `resource` and stages them.
    ///
    /// The write is ordered with loads, so committing the result cannot be
    /// undone by a reload that read the resource before the write.
    ///
    /// # Errors
    ///
    /// Returns [`I18nError::UnknownResource`] when the provider does not own
    /// `resource`, [`I18nError::ProviderDestroyed`] after teardown, or
    /// [`I18nError::ResourceWrite`] when the store rejects the write.
    fn write_resource(
        &self,
        resource: &str,
        messages: MessageMap,
    ) -> Result<StagedResource, I18nError>;

    /// Atomically replaces the mapping of every locale tied to the staged
    /// resource.
    ///
    /// A stage read before the last commit of the same resource is
    /// discarded and the call still succeeds.
    ///
    /// # Errors
    ///
    /// Returns [`I18nError::ProviderDestroyed`] after teardown.
    fn commit_resource(&self, staged: StagedResource) -> Result<(), I18nError>;

    /// Reloads one resource: stage, then commit.
    ///
    /// A failure leaves the previous mapping in place.
    ///
    /// # Errors
    ///
    /// Propagates the errors of [`Self::stage_resource`] and
    /// [`Self::commit_resource`].
    fn reinitialize_resource(&self, resource: &str) -> Result<(), I18nError> {
        let staged = self.stage_resource(resource)?;
        self.commit_resource(staged)
    }

    /// Reloads every resource, continuing past failures.
    ///
    /// # Errors
    ///
    /// Returns the failures, aggregated when there are several.
    fn reinitialize_all_resources(&self) -> Result<(), I18nError> {
        let failures: Vec<I18nError> = self
            .resources()
            .into_iter()
            .filter_map(|resource| self.reinitialize_resource(resource).err())
            .collect();
        I18nError::aggregate(failures).map_or(Ok(()), Err)
    }

    /// Current mapping for `locale`.
    fn messages(&self, locale: &LanguageIdentifier) -> Option<Arc<MessageMap>>;

    /// Installs `messages` for every locale sharing the resource of `locale`
    /// after an external write completed.
    ///
    /// # Errors
    ///
    /// Returns [`I18nError::UnsupportedLocale`] when no resource backs
    /// `locale`, or [`I18nError::ProviderDestroyed`] after teardown.
    fn replace_messages(
        &self,
        locale: &LanguageIdentifier,
        messages: MessageMap,
    ) -> Result<(), I18nError>;
}
