//! Lightweight counters describing resolver activity.

use std::sync::atomic::{AtomicU64, Ordering};

/// Point-in-time copy of the resolver's activity counters.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ResolverStats {
    /// Queries answered through [`message`](super::CompositeMessageSource::message).
    pub lookups: u64,
    /// Queries answered from the cache.
    pub cache_hits: u64,
    /// Queries that walked the provider list.
    pub provider_traversals: u64,
    /// Reload passes that committed at least one resource.
    pub reloads: u64,
}

#[derive(Debug, Default)]
pub(crate) struct StatsCounters {
    lookups: AtomicU64,
    cache_hits: AtomicU64,
    provider_traversals: AtomicU64,
    reloads: AtomicU64,
}

impl StatsCounters {
    pub(crate) fn record_lookup(&self) {
        self.lookups.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_cache_hit(&self) {
        self.cache_hits.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_traversal(&self) {
        self.provider_traversals.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_reload(&self) {
        self.reloads.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn snapshot(&self) -> ResolverStats {
        ResolverStats {
            lookups: self.lookups.load(Ordering::Relaxed),
            cache_hits: self.cache_hits.load(Ordering::Relaxed),
            provider_traversals: self.provider_traversals.load(Ordering::Relaxed),
            reloads: self.reloads.load(Ordering::Relaxed),
        }
    }
}
