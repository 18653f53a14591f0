//! Generation-checked read-through cache for resolved messages.
//!
//! Every invalidation bumps a generation counter. A reader records the
//! generation it observed on a miss and may only publish its result while
//! that generation is still current, so a value computed from data read
//! before a reload can never land in the cache after the reload's
//! invalidation.

use std::num::NonZeroUsize;

use lru::LruCache;
use parking_lot::Mutex;
use unic_langid::LanguageIdentifier;

use crate::MessageArgs;

/// Key of one cached resolution.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(crate) struct CacheKey {
    pub(crate) code: String,
    pub(crate) locale: LanguageIdentifier,
    pub(crate) args: MessageArgs,
}

/// Outcome of a cache lookup.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum Lookup {
    Hit(String),
    Miss { generation: u64 },
}

#[derive(Debug)]
struct CacheState {
    entries: Option<LruCache<CacheKey, String>>,
    generation: u64,
}

#[derive(Debug)]
pub(crate) struct MessageCache {
    state: Mutex<CacheState>,
}

impl MessageCache {
    /// A capacity of zero disables caching; every lookup misses.
    pub(crate) fn new(capacity: usize) -> Self {
        Self {
            state: Mutex::new(CacheState {
                entries: NonZeroUsize::new(capacity).map(LruCache::new),
                generation: 0,
            }),
        }
    }

    pub(crate) fn lookup(&self, key: &CacheKey) -> Lookup {
        let mut state = self.state.lock();
        let generation = state.generation;
        match state.entries.as_mut().and_then(|entries| entries.get(key)) {
            Some(value) => Lookup::Hit(value.clone()),
            None => Lookup::Miss { generation },
        }
    }

    /// Stores `value` unless the cache was invalidated since `generation`.
    pub(crate) fn insert(&self, key: CacheKey, value: String, generation: u64) -> bool {
        let mut state = self.state.lock();
        if state.generation != generation {
            return false;
        }
        let Some(entries) = state.entries.as_mut() else {
            return false;
        };
        entries.put(key, value);
        true
    }

    /// Drops every entry and starts a new generation.
    pub(crate) fn invalidate(&self) -> u64 {
        let mut state = self.state.lock();
        state.generation = state.generation.wrapping_add(1);
        if let Some(entries) = state.entries.as_mut() {
            entries.clear();
        }
        state.generation
    }

    pub(crate) fn len(&self) -> usize {
        self.state
            .lock()
            .entries
            .as_ref()
            .map_or(0, LruCache::len)
    }
}
