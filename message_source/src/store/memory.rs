//! In-memory resource store.

use std::collections::HashMap;

use parking_lot::RwLock;

use super::{MessageMap, ResourceStore};
use crate::ResourceError;

/// Resource store holding every resource in memory.
///
/// Useful for embedding catalogues compiled into a binary and for tests that
/// need to change resource contents between reloads.
///
/// # Examples
///
/// ```
/// use message_source::{MemoryResourceStore, ResourceStore};
///
/// let store = MemoryResourceStore::new()
///     .with_resource("app_en", [("greeting", "Hello")]);
/// let messages = store.load("app_en").expect("resource exists");
/// assert_eq!(messages.get("greeting").map(String::as_str), Some("Hello"));
/// ```
#[derive(Debug, Default)]
pub struct MemoryResourceStore {
    resources: RwLock<HashMap<String, MessageMap>>,
}

impl MemoryResourceStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a resource built from `entries`, returning the store.
    #[must_use]
    pub fn with_resource<I, K, V>(self, resource: impl Into<String>, entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.insert(resource, entries);
        self
    }

    /// Replaces the contents of `resource` with `entries`.
    pub fn insert<I, K, V>(&self, resource: impl Into<String>, entries: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let messages = entries
            .into_iter()
            .map(|(code, message)| (code.into(), message.into()))
            .collect();
        self.resources.write().insert(resource.into(), messages);
    }

    /// Removes `resource`; later loads report it as missing.
    pub fn remove(&self, resource: &str) -> Option<MessageMap> {
        self.resources.write().remove(resource)
    }

    /// Returns a copy of the stored mapping for `resource`.
    #[must_use]
    pub fn get(&self, resource: &str) -> Option<MessageMap> {
        self.resources.read().get(resource).cloned()
    }
}

impl ResourceStore for MemoryResourceStore {
    fn load(&self, resource: &str) -> Result<MessageMap, ResourceError> {
        self.get(resource).ok_or_else(|| ResourceError::NotFound {
            resource: resource.to_owned(),
        })
    }

    fn write(&self, resource: &str, messages: &MessageMap) -> Result<(), ResourceError> {
        self.resources
            .write()
            .insert(resource.to_owned(), messages.clone());
        Ok(())
    }
}
