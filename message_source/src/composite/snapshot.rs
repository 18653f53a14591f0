//! Precomputed bulk views over the registered providers.

use indexmap::IndexMap;
use unic_langid::LanguageIdentifier;

use super::Registration;

/// Immutable aggregate of provider metadata, rebuilt and swapped whole.
#[derive(Debug, Default)]
pub(crate) struct Snapshot {
    /// Union of supported locales in provider priority order, first seen
    /// wins.
    pub(crate) supported_locales: Vec<LanguageIdentifier>,
    /// Resource identifier → indices of the providers owning it.
    pub(crate) resources: IndexMap<String, Vec<usize>>,
}

impl Snapshot {
    pub(crate) fn build(registrations: &[Registration]) -> Self {
        let mut supported_locales: Vec<LanguageIdentifier> = Vec::new();
        let mut resources: IndexMap<String, Vec<usize>> = IndexMap::new();
        for (index, registration) in registrations.iter().enumerate() {
            let provider = registration.provider.as_ref();
            for locale in provider.supported_locales() {
                if !supported_locales.contains(locale) {
                    supported_locales.push(locale.clone());
                }
            }
            let Some(backed) = provider.as_resource_backed() else {
                continue;
            };
            for resource in backed.resources() {
                resources.entry(resource.to_owned()).or_default().push(index);
            }
        }
        Self {
            supported_locales,
            resources,
        }
    }

    pub(crate) fn owners(&self, resource: &str) -> &[usize] {
        self.resources
            .get(resource)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }
}
