//! Response caching with TTL support

use std::time::{Duration, Instant};
use dashmap::DashMap;
use locus_core::types::HttpMethod;
use crate::api::ApiResponse;

/// Cache entry with TTL
#[derive(Debug, Clone)]
pub struct CacheEntry {
    /// Cached response
    pub response: ApiResponse,
    /// When the entry was stored
    pub stored_at: Instant,
}

impl CacheEntry {
    /// Create new cache entry stamped now
    pub fn new(response: ApiResponse) -> Self {
        Self {
            response,
            stored_at: Instant::now(),
        }
    }

    /// Check if cache entry is younger than `ttl`
    pub fn is_fresh(&self, ttl: Duration) -> bool {
        self.stored_at.elapsed() < ttl
    }

    /// Get age of cache entry
    pub fn age(&self) -> Duration {
        self.stored_at.elapsed()
    }
}

/// In-memory response cache with a single TTL
#[derive(Debug)]
pub struct ResponseCache {
    /// Cache storage keyed by request identity
    cache: DashMap<String, CacheEntry>,
    /// Time-to-live applied to every entry
    ttl: Duration,
}

impl ResponseCache {
    /// Create new response cache
    pub fn new(ttl: Duration) -> Self {
        Self {
            cache: DashMap::new(),
            ttl,
        }
    }

    /// Configured time-to-live
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Only GET responses with status 200 are stored
    pub fn should_store(method: HttpMethod, status: u16) -> bool {
        method.is_cacheable() && status == 200
    }
}

impl ResponseCache {
    /// Get cached response if fresh, marked as served from cache
    pub fn get(&self, key: &str) -> Option<ApiResponse> {
        let fresh = {
            let entry = self.cache.get(key)?;
            entry.is_fresh(self.ttl).then(|| entry.response.clone())
        };

        match fresh {
            Some(mut response) => {
                response.cached = true;
                Some(response)
            }
            None => {
                // Only drop the entry if it is still stale; a clone may have
                // stored a fresh response since the read above
                self.cache.remove_if(key, |_, entry| !entry.is_fresh(self.ttl));
                None
            }
        }
    }

    /// Store a response
    pub fn insert(&self, key: String, response: ApiResponse) {
        self.cache.insert(key, CacheEntry::new(response));
    }

    /// Check if key is cached and fresh
    pub fn contains_fresh(&self, key: &str) -> bool {
        self.cache
            .get(key)
            .map(|entry| entry.is_fresh(self.ttl))
            .unwrap_or(false)
    }

    /// Get cache statistics
    pub fn stats(&self) -> CacheStats {
        let mut fresh_count = 0;
        let mut stale_count = 0;

        for entry in self.cache.iter() {
            if entry.is_fresh(self.ttl) {
                fresh_count += 1;
            } else {
                stale_count += 1;
            }
        }

        CacheStats {
            total_entries: self.cache.len(),
            fresh_entries: fresh_count,
            stale_entries: stale_count,
        }
    }

    /// Number of stored entries, fresh or not
    pub fn len(&self) -> usize {
        self.cache.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }

    /// Clear all cached entries
    pub fn clear(&self) {
        self.cache.clear();
    }

    /// Remove stale entries
    pub fn cleanup(&self) -> usize {
        let ttl = self.ttl;
        let mut removed = 0;
        self.cache.retain(|_, entry| {
            if entry.is_fresh(ttl) {
                true
            } else {
                removed += 1;
                false
            }
        });
        removed
    }
}

/// Cache statistics
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheStats {
    /// Total number of entries
    pub total_entries: usize,
    /// Number of fresh entries
    pub fresh_entries: usize,
    /// Number of stale entries
    pub stale_entries: usize,
}
