//! Resource stores: the outbound collaborator that loads and writes the
//! key/value documents backing resource-backed providers.
//!
//! The resolver treats resources as opaque. A store only has to map a stable
//! resource identifier to a code → template mapping and, optionally, accept
//! a replacement mapping when a message is edited at runtime.

mod dir;
mod memory;
pub mod properties;

use std::collections::HashMap;
use std::sync::Arc;

pub use dir::DirResourceStore;
pub use memory::MemoryResourceStore;

use crate::ResourceError;

/// Code → message template mapping for one locale of one provider.
pub type MessageMap = HashMap<String, String>;

/// Loads (and optionally writes) the resources behind a provider.
///
/// `load` may block on I/O; the reload coordinator runs it on the blocking
/// pool and bounds it with a timeout. Implementations must not cache stale
/// data between calls: each `load` reflects the current resource contents.
pub trait ResourceStore: Send + Sync {
    /// Reads the mapping stored under `resource`.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError`] when the resource is missing, unreadable or
    /// malformed.
    fn load(&self, resource: &str) -> Result<MessageMap, ResourceError>;

    /// Replaces the mapping stored under `resource`.
    ///
    /// The default implementation rejects writes.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::ReadOnly`] unless the store supports writes,
    /// or the store's own failure when the write does not complete.
    fn write(&self, resource: &str, messages: &MessageMap) -> Result<(), ResourceError> {
        let _ = messages;
        Err(ResourceError::ReadOnly {
            resource: resource.to_owned(),
        })
    }
}

impl<T: ResourceStore + ?Sized> ResourceStore for Arc<T> {
    fn load(&self, resource: &str) -> Result<MessageMap, ResourceError> {
        (**self).load(resource)
    }

    fn write(&self, resource: &str, messages: &MessageMap) -> Result<(), ResourceError> {
        (**self).write(resource, messages)
    }
}
