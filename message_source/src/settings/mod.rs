//! Declarative resolver settings gathered with `figment`.
//!
//! Layers, lowest precedence first:
//!
//! 1. built-in defaults,
//! 2. an optional TOML file,
//! 3. `MSGSOURCE_*` environment variables, where `__` separates nested keys
//!    (`MSGSOURCE_RELOAD__TIMEOUT_MS=100`).
//!
//! Provider declarations usually live in the file:
//!
//! ```toml
//! default_locale = "en"
//! missing_message = "code"
//!
//! [[providers]]
//! source = "common"
//! priority = 0
//! resources = { en = "common/messages_en.properties", zh-CN = "common/messages_zh_CN.properties" }
//! ```

use std::sync::Arc;

use camino::Utf8Path;
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use unic_langid::LanguageIdentifier;

use crate::{
    CompositeMessageSource, DEFAULT_CACHE_CAPACITY, DEFAULT_COMPOSITE_SOURCE, I18nError,
    LocaleContext, MissingMessagePolicy, ReloadSettings, ResourceMessageProvider, ResourceStore,
};

/// Prefix of the environment variables read by [`I18nSettings::figment`].
pub const ENV_PREFIX: &str = "MSGSOURCE_";

/// Settings of a resolver and its resource-backed providers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct I18nSettings {
    /// Source name of the resolver.
    pub source: String,
    /// Locale used when a query names none and the context reports none.
    pub default_locale: Option<String>,
    /// Maximum number of cached resolutions; `0` disables the cache.
    pub cache_capacity: usize,
    /// Result returned for unknown codes.
    pub missing_message: MissingMessagePolicy,
    /// Reload coordinator timing.
    pub reload: ReloadSettings,
    /// Resource-backed providers, in any order.
    pub providers: Vec<ProviderSettings>,
}

/// Declaration of one resource-backed provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderSettings {
    /// Source name of the provider.
    pub source: String,
    /// Resolution priority; lower values are consulted first.
    #[serde(default)]
    pub priority: i32,
    /// Locale closing the provider's fallback chains.
    #[serde(default)]
    pub default_locale: Option<String>,
    /// Locale → resource identifier.
    #[serde(default)]
    pub resources: IndexMap<String, String>,
}

impl Default for I18nSettings {
    fn default() -> Self {
        Self {
            source: DEFAULT_COMPOSITE_SOURCE.to_owned(),
            default_locale: None,
            cache_capacity: DEFAULT_CACHE_CAPACITY,
            missing_message: MissingMessagePolicy::default(),
            reload: ReloadSettings::default(),
            providers: Vec::new(),
        }
    }
}

impl I18nSettings {
    /// Layers defaults, the TOML file at `path` and the environment.
    ///
    /// A missing file contributes nothing.
    #[must_use]
    pub fn figment(path: Option<&Utf8Path>) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));
        if let Some(file) = path {
            figment = figment.merge(Toml::file_exact(file.as_std_path()));
        }
        figment.merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// Gathers and deserializes the settings.
    ///
    /// # Errors
    ///
    /// Returns [`I18nError::Settings`] when a layer cannot be read or the
    /// merged values do not deserialize.
    pub fn load(path: Option<&Utf8Path>) -> Result<Self, I18nError> {
        Ok(Self::figment(path).extract()?)
    }

    /// Builds and initializes a resolver from these settings.
    ///
    /// Every provider reads from `store`; `context` supplies the current
    /// locale.
    ///
    /// # Errors
    ///
    /// Returns [`I18nError::Configuration`] for malformed locales or provider
    /// declarations, and the load failures of providers that cannot be
    /// initialized.
    pub fn build_composite(
        &self,
        store: &Arc<dyn ResourceStore>,
        context: Arc<dyn LocaleContext>,
    ) -> Result<CompositeMessageSource, I18nError> {
        let mut builder = CompositeMessageSource::builder()
            .source(self.source.clone())
            .cache_capacity(self.cache_capacity)
            .missing_message_policy(self.missing_message)
            .locale_context(context);
        if let Some(locale) = &self.default_locale {
            builder = builder.default_locale(configured_locale(&self.source, locale)?);
        }
        for declaration in &self.providers {
            let provider = declaration.build(Arc::clone(store))?;
            builder = builder.with_ranked_provider(declaration.priority, provider);
        }
        builder.try_build()
    }
}

impl ProviderSettings {
    /// Declares the provider over `store` without loading it.
    ///
    /// # Errors
    ///
    /// Returns [`I18nError::Configuration`] for malformed locales or an
    /// invalid declaration.
    pub fn build(
        &self,
        store: Arc<dyn ResourceStore>,
    ) -> Result<ResourceMessageProvider, I18nError> {
        let mut builder = ResourceMessageProvider::builder(self.source.clone(), store);
        if let Some(locale) = &self.default_locale {
            builder = builder.default_locale(configured_locale(&self.source, locale)?);
        }
        for (locale, resource) in &self.resources {
            builder = builder.resource(configured_locale(&self.source, locale)?, resource.clone());
        }
        builder.build()
    }
}

fn configured_locale(owner: &str, value: &str) -> Result<LanguageIdentifier, I18nError> {
    I18nError::parse_locale(value)
        .map_err(|err| I18nError::configuration(owner, err.to_string()))
}

#[cfg(test)]
mod tests;
