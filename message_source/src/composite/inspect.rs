//! Introspection and runtime editing of the messages behind the resolver.

use std::sync::Arc;

use indexmap::IndexMap;
use unic_langid::LanguageIdentifier;

use super::CompositeMessageSource;
use crate::{I18nError, MessageArgs, MessageMap, MessageProvider, ResourceBacked};

/// How one provider answers one code for one locale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageDiagnostic {
    /// Code that was looked up.
    pub code: String,
    /// Source name of the provider.
    pub source: String,
    /// Resource backing the locale in this provider, if any.
    pub resource: Option<String>,
    /// Resolved text, present only when the provider knows the code.
    pub message: Option<String>,
    /// Locale the lookup was made for, present only alongside `message`.
    pub locale: Option<LanguageIdentifier>,
}

impl CompositeMessageSource {
    /// Current mapping of every loaded resource, keyed by resource id.
    ///
    /// Providers are visited in priority order. When two providers share a
    /// resource, a later non-empty mapping replaces an earlier one, but an
    /// empty mapping never replaces a non-empty one.
    #[must_use]
    pub fn localized_resource_messages(&self) -> IndexMap<String, Arc<MessageMap>> {
        let mut collected: IndexMap<String, Arc<MessageMap>> = IndexMap::new();
        for provider in self.providers() {
            let Some(backed) = provider.as_resource_backed() else {
                continue;
            };
            for resource in backed.resources() {
                let Some(messages) = loaded_messages(provider, backed, resource) else {
                    continue;
                };
                let keeps_existing = messages.is_empty()
                    && collected
                        .get(resource)
                        .is_some_and(|existing| !existing.is_empty());
                if !keeps_existing {
                    collected.insert(resource.to_owned(), messages);
                }
            }
        }
        collected
    }

    /// Resource identifiers whose data is currently loaded.
    #[must_use]
    pub fn initialized_resources(&self) -> Vec<String> {
        let mut resources: Vec<String> = Vec::new();
        for provider in self.providers() {
            let Some(backed) = provider.as_resource_backed() else {
                continue;
            };
            for resource in backed.resources() {
                let loaded = loaded_messages(provider, backed, resource).is_some();
                if loaded && !resources.iter().any(|known| known == resource) {
                    resources.push(resource.to_owned());
                }
            }
        }
        resources
    }

    /// Reports how every provider answers `code`.
    ///
    /// With a `locale`, one record is produced per provider. Without one,
    /// every provider is asked for every supported locale of the resolver.
    /// Records come in provider priority order.
    #[must_use]
    pub fn diagnose(
        &self,
        code: &str,
        locale: Option<&LanguageIdentifier>,
    ) -> Vec<MessageDiagnostic> {
        let locales = locale.map_or_else(|| self.supported_locales(), |one| vec![one.clone()]);
        let args = MessageArgs::new();
        let mut records = Vec::with_capacity(locales.len());
        for provider in self.providers() {
            let backed = provider.as_resource_backed();
            for candidate in &locales {
                let message = provider.message(code, candidate, &args);
                records.push(MessageDiagnostic {
                    code: code.to_owned(),
                    source: provider.source().to_owned(),
                    resource: backed
                        .and_then(|inner| inner.resource(candidate))
                        .map(str::to_owned),
                    locale: message.as_ref().map(|_| candidate.clone()),
                    message,
                });
            }
        }
        records
    }

    /// Current mapping held by provider `source` for `locale`.
    ///
    /// # Errors
    ///
    /// Returns [`I18nError::UnknownProvider`] or
    /// [`I18nError::NotResourceBacked`] when `source` does not name a
    /// resource-backed provider.
    pub fn messages_for(
        &self,
        source: &str,
        locale: &LanguageIdentifier,
    ) -> Result<Option<Arc<MessageMap>>, I18nError> {
        let (_, backed) = self.resource_backed(source)?;
        Ok(backed.messages(locale))
    }

    /// Installs `messages` for every locale of provider `source` that shares
    /// the resource of `locale`, after an external write, then invalidates
    /// the cache.
    ///
    /// # Errors
    ///
    /// Returns [`I18nError::UnknownProvider`],
    /// [`I18nError::NotResourceBacked`] or the provider's own rejection.
    pub fn replace_messages(
        &self,
        source: &str,
        locale: &LanguageIdentifier,
        messages: MessageMap,
    ) -> Result<(), I18nError> {
        let _guard = self.write_lock.lock();
        let (_, backed) = self.resource_backed(source)?;
        backed.replace_messages(locale, messages)?;
        self.invalidate_cache();
        Ok(())
    }

    /// Adds or edits one message and persists it.
    ///
    /// The full mapping of the resource backing `locale` is written through
    /// the provider's store first. Only after the write succeeds is the new
    /// mapping installed for every locale tied to that resource and the
    /// cache invalidated, so a failed write changes nothing in memory.
    ///
    /// # Errors
    ///
    /// Returns [`I18nError::UnknownProvider`],
    /// [`I18nError::NotResourceBacked`],
    /// [`I18nError::UnsupportedLocale`] when no resource backs `locale`, or
    /// [`I18nError::ResourceWrite`] when the store rejects the write.
    pub fn put_message(
        &self,
        source: &str,
        locale: &LanguageIdentifier,
        code: &str,
        message: &str,
    ) -> Result<(), I18nError> {
        let _guard = self.write_lock.lock();
        let (_, backed) = self.resource_backed(source)?;
        let resource = backed
            .resource(locale)
            .ok_or_else(|| I18nError::UnsupportedLocale {
                provider: source.to_owned(),
                locale: locale.clone(),
            })?;

        let mut messages = backed
            .messages(locale)
            .map(|current| MessageMap::clone(&current))
            .unwrap_or_default();
        messages.insert(code.to_owned(), message.to_owned());

        let staged = backed.write_resource(resource, messages)?;
        backed.commit_resource(staged)?;
        self.invalidate_cache();
        tracing::debug!(source, resource, code, locale = %locale, "stored message");
        Ok(())
    }

    fn resource_backed(
        &self,
        source: &str,
    ) -> Result<(&dyn MessageProvider, &dyn ResourceBacked), I18nError> {
        let provider = self
            .provider(source)
            .ok_or_else(|| I18nError::UnknownProvider {
                provider: source.to_owned(),
            })?;
        let backed = provider
            .as_resource_backed()
            .ok_or_else(|| I18nError::NotResourceBacked {
                provider: source.to_owned(),
            })?;
        Ok((provider, backed))
    }
}

fn loaded_messages(
    provider: &dyn MessageProvider,
    backed: &dyn ResourceBacked,
    resource: &str,
) -> Option<Arc<MessageMap>> {
    provider
        .supported_locales()
        .iter()
        .filter(|locale| backed.resource(locale) == Some(resource))
        .find_map(|locale| backed.messages(locale))
}
