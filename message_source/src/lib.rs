//! Composite resolution of localized messages.
//!
//! A [`CompositeMessageSource`] aggregates independent [`MessageProvider`]s
//! into a single logical source. Queries try the providers in priority order
//! and, within each provider, the locale [fallback chain](fallback_chain) of
//! the requested locale; the first provider that knows the code wins.
//! Results are cached, and providers backed by external resources can be
//! reloaded while queries keep running.
//!
//! ```
//! use std::sync::Arc;
//! use message_source::{
//!     CompositeMessageSource, MemoryResourceStore, MessageArgs, ResourceMessageProvider, langid,
//! };
//!
//! let store = Arc::new(
//!     MemoryResourceStore::new()
//!         .with_resource("common_en", [("greeting", "Hello, {}")])
//!         .with_resource("common_fr", [("greeting", "Bonjour, {}")]),
//! );
//! let common = ResourceMessageProvider::builder("common", store.clone())
//!     .default_locale(langid!("en"))
//!     .resource(langid!("en"), "common_en")
//!     .resource(langid!("fr"), "common_fr")
//!     .build()?;
//! let messages = CompositeMessageSource::builder().with_provider(common).try_build()?;
//!
//! let args = MessageArgs::new().with("Ada");
//! assert_eq!(messages.message("greeting", Some(&langid!("fr-CA")), &args), "Bonjour, Ada");
//!
//! store.insert("common_fr", [("greeting", "Salut, {}")]);
//! let report = messages.reload(["common_fr"]);
//! assert!(report.is_success());
//! assert_eq!(messages.message("greeting", Some(&langid!("fr")), &args), "Salut, Ada");
//! # Ok::<(), message_source::I18nError>(())
//! ```

mod args;
mod composite;
mod error;
mod locale;
mod placeholder;
mod provider;
mod reload;
mod settings;
mod store;

pub use args::MessageArgs;
pub use composite::{
    CompositeBuilder, CompositeMessageSource, DEFAULT_CACHE_CAPACITY, DEFAULT_COMPOSITE_SOURCE,
    MessageDiagnostic, MissingMessagePolicy, ResolverStats,
};
pub use error::{AggregatedErrors, I18nError, ResourceError};
pub use locale::{
    EnvLocaleContext, FixedLocale, LocaleContext, NoLocaleContext, fallback_chain,
    parse_posix_locale,
};
pub use placeholder::format_message;
pub use provider::{
    FluentMessageProvider, FluentMessageProviderBuilder, FormattingIssue, FormattingIssueReporter,
    MessageProvider, ProviderState, ResourceBacked, ResourceMessageProvider,
    ResourceMessageProviderBuilder, StagedResource,
};
pub use reload::{ReloadCoordinator, ReloadFailure, ReloadHandle, ReloadReport, ReloadSettings};
pub use settings::{ENV_PREFIX, I18nSettings, ProviderSettings};
pub use store::{DirResourceStore, MemoryResourceStore, MessageMap, ResourceStore, properties};
pub use unic_langid::{LanguageIdentifier, langid};
