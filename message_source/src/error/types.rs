//! Primary error enums for message resolution, resource I/O and reloads.

use std::time::Duration;

use camino::Utf8PathBuf;
use figment::Error as FigmentError;
use fluent_bundle::FluentError;
use fluent_syntax::parser::ParserError;
use thiserror::Error;
use unic_langid::{LanguageIdentifier, LanguageIdentifierError};

use super::aggregate::AggregatedErrors;

/// Errors surfaced by the composite resolver and its providers.
///
/// The query path never produces these: a missing message resolves to the
/// configured missing-message policy instead. They appear while building the
/// resolver, reloading resources or writing messages back.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum I18nError {
    /// A provider or resolver declaration is malformed.
    #[error("invalid configuration for '{provider}': {message}")]
    Configuration {
        /// Source name of the offending provider (or the resolver itself).
        provider: String,
        /// Human-readable explanation of the problem.
        message: String,
    },

    /// A locale string could not be parsed.
    #[error("invalid locale '{value}': {cause}")]
    InvalidLocale {
        /// Raw locale text supplied by the caller.
        value: String,
        /// Parser failure reported by `unic-langid`.
        #[source]
        cause: LanguageIdentifierError,
    },

    /// No provider is registered under the requested source name.
    #[error("no message provider is registered as '{provider}'")]
    UnknownProvider {
        /// Requested source name.
        provider: String,
    },

    /// The provider exists but cannot be reloaded or written through.
    #[error("message provider '{provider}' is not backed by resources")]
    NotResourceBacked {
        /// Source name of the provider.
        provider: String,
    },

    /// The provider has no resource bound to the requested locale.
    #[error("message provider '{provider}' does not support locale {locale}")]
    UnsupportedLocale {
        /// Source name of the provider.
        provider: String,
        /// Locale requested by the caller.
        locale: LanguageIdentifier,
    },

    /// The provider does not own the requested resource.
    #[error("message provider '{provider}' does not own resource '{resource}'")]
    UnknownResource {
        /// Source name of the provider.
        provider: String,
        /// Resource identifier requested by the caller.
        resource: String,
    },

    /// Reading a resource failed; the previous mapping was retained.
    #[error("failed to load resource '{resource}': {cause}")]
    ResourceLoad {
        /// Resource identifier being loaded.
        resource: String,
        /// Underlying store failure.
        #[source]
        cause: ResourceError,
    },

    /// Writing a resource failed; in-memory state is unchanged.
    #[error("failed to write resource '{resource}': {cause}")]
    ResourceWrite {
        /// Resource identifier being written.
        resource: String,
        /// Underlying store failure.
        #[source]
        cause: ResourceError,
    },

    /// The provider was torn down and can no longer be reinitialized.
    #[error("message provider '{provider}' has been destroyed")]
    ProviderDestroyed {
        /// Source name of the provider.
        provider: String,
    },

    /// Loading a resource exceeded the caller-supplied time limit.
    #[error("loading resource '{resource}' timed out after {after:?}")]
    Timeout {
        /// Resource identifier being loaded.
        resource: String,
        /// Time limit that elapsed.
        after: Duration,
    },

    /// The background load task for a resource did not complete.
    #[error("reload task for resource '{resource}' failed: {message}")]
    ReloadTask {
        /// Resource identifier being loaded.
        resource: String,
        /// Description of the task failure.
        message: String,
    },

    /// The reload coordinator is no longer accepting notifications.
    #[error("the reload coordinator has shut down")]
    CoordinatorClosed,

    /// Fluent rejected the text of a resource.
    #[error("failed to parse Fluent resources of '{provider}' for {locale}")]
    FluentParse {
        /// Source name of the provider.
        provider: String,
        /// Locale associated with the resource.
        locale: LanguageIdentifier,
        /// Parser errors emitted by Fluent.
        errors: Vec<ParserError>,
    },

    /// Fluent rejected a parsed resource while registering it.
    #[error("failed to register Fluent resources of '{provider}' for {locale}")]
    FluentRegistration {
        /// Source name of the provider.
        provider: String,
        /// Locale associated with the resource.
        locale: LanguageIdentifier,
        /// Errors returned by Fluent during registration.
        errors: Vec<FluentError>,
    },

    /// Settings could not be gathered or deserialized.
    #[error("failed to load i18n settings: {0}")]
    Settings(#[from] Box<FigmentError>),

    /// Several independent failures occurred in one operation.
    #[error("multiple i18n errors:\n{0}")]
    Aggregate(Box<AggregatedErrors>),
}

/// Failures reported by a [`ResourceStore`](crate::ResourceStore).
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ResourceError {
    /// The resource does not exist.
    #[error("resource '{resource}' was not found")]
    NotFound {
        /// Resource identifier requested.
        resource: String,
    },

    /// Reading or writing the backing file failed.
    #[error("I/O error at {path}: {cause}")]
    Io {
        /// Path relative to the store root.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        cause: std::io::Error,
    },

    /// The resource text is not a valid key/value document.
    #[error("malformed resource '{resource}' at line {line}: {message}")]
    Parse {
        /// Resource identifier being parsed.
        resource: String,
        /// One-based line number of the failure.
        line: usize,
        /// Description of the problem.
        message: String,
    },

    /// The store does not accept writes.
    #[error("resource '{resource}' is read-only")]
    ReadOnly {
        /// Resource identifier targeted by the write.
        resource: String,
    },

    /// Store-specific failure described by free text.
    #[error("{0}")]
    Message(String),
}
