//! Listing Cache
//!
//! Time-boxed in-memory cache of the last fetched listing per context. Entries
//! are never evicted on expiry; a read past the TTL reports the entry as stale
//! so it can still back an optimistic render.

use crate::clock::Clock;
use crate::types::{Item, ListingContext};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::trace;

/// Default freshness window (30 seconds).
pub const DEFAULT_TTL_MS: u64 = 30_000;

/// A cached listing and the time it was fetched.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub fetched_at_ms: u64,
    pub items: Vec<Item>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Freshness {
    Fresh,
    Stale,
}

/// Result of a cache read.
#[derive(Debug, Clone)]
pub struct CachedListing {
    pub items: Vec<Item>,
    pub freshness: Freshness,
    pub age_ms: u64,
}

impl CachedListing {
    pub fn is_fresh(&self) -> bool {
        self.freshness == Freshness::Fresh
    }
}

/// Cache counters
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub fresh_hits: usize,
    pub stale_hits: usize,
    pub misses: usize,
    pub writes: usize,
    pub invalidations: usize,
}

pub struct ListingCache {
    entries: RwLock<HashMap<ListingContext, CacheEntry>>,
    stats: RwLock<CacheStats>,
    ttl_ms: u64,
    clock: Arc<dyn Clock>,
}

impl ListingCache {
    pub fn new(ttl_ms: u64, clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            stats: RwLock::new(CacheStats::default()),
            ttl_ms,
            clock,
        }
    }

    pub fn ttl_ms(&self) -> u64 {
        self.ttl_ms
    }

    /// An entry is fresh iff `now - fetched_at < ttl`.
    pub fn freshness_at(&self, fetched_at_ms: u64, now_ms: u64) -> Freshness {
        if now_ms.saturating_sub(fetched_at_ms) < self.ttl_ms {
            Freshness::Fresh
        } else {
            Freshness::Stale
        }
    }

    pub fn get(&self, context: &ListingContext) -> Option<CachedListing> {
        let now = self.clock.now_ms();
        let found = self.entries.read().get(context).map(|entry| CachedListing {
            items: entry.items.clone(),
            freshness: self.freshness_at(entry.fetched_at_ms, now),
            age_ms: now.saturating_sub(entry.fetched_at_ms),
        });

        let mut stats = self.stats.write();
        match &found {
            Some(listing) if listing.is_fresh() => stats.fresh_hits += 1,
            Some(_) => stats.stale_hits += 1,
            None => stats.misses += 1,
        }
        found
    }

    /// Only returns an entry that is still inside the TTL window.
    pub fn get_fresh(&self, context: &ListingContext) -> Option<Vec<Item>> {
        self.get(context)
            .filter(CachedListing::is_fresh)
            .map(|listing| listing.items)
    }

    pub fn put(&self, context: ListingContext, items: Vec<Item>) {
        let fetched_at_ms = self.clock.now_ms();
        trace!(context = %context, count = items.len(), "Cache write");
        self.entries.write().insert(
            context,
            CacheEntry {
                fetched_at_ms,
                items,
            },
        );
        self.stats.write().writes += 1;
    }

    /// Remove the entry for `context`. Returns whether one existed.
    pub fn invalidate(&self, context: &ListingContext) -> bool {
        let removed = self.entries.write().remove(context).is_some();
        self.stats.write().invalidations += 1;
        trace!(context = %context, removed, "Cache invalidated");
        removed
    }

    pub fn clear(&self) {
        self.entries.write().clear();
    }

    pub fn contains(&self, context: &ListingContext) -> bool {
        self.entries.read().contains_key(context)
    }

    pub fn stats(&self) -> CacheStats {
        self.stats.read().clone()
    }
}
