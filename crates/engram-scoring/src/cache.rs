//! Per-(query, item) score cache.
//!
//! Backed by a TTL + capacity bounded cache so entries age out on their own.
//! The engine invalidates the whole cache whenever weights change through
//! learning, so a hit always reflects current matrix state.

use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicU64, Ordering};

use moka::sync::Cache;

use engram_core::constants::{SCORE_CACHE_CAPACITY, SCORE_CACHE_TTL_SECS};
use engram_core::{MemoryItem, ScoringResult};

/// Hit/miss counters exposed for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub entries: u64,
}

pub struct ScoreCache {
    inner: Cache<String, ScoringResult>,
    hits: AtomicU64,
    misses: AtomicU64,
}

/// Key on query, item id, and a content fingerprint so edited items never
/// serve a stale entry.
fn cache_key(query: &str, item: &MemoryItem) -> String {
    let mut hasher = std::collections::hash_map::DefaultHasher::new();
    item.content.hash(&mut hasher);
    item.title.hash(&mut hasher);
    format!("{query}\u{1f}{}\u{1f}{:016x}", item.id, hasher.finish())
}

impl ScoreCache {
    pub fn new() -> Self {
        Self {
            inner: Cache::builder()
                .max_capacity(SCORE_CACHE_CAPACITY)
                .time_to_live(std::time::Duration::from_secs(SCORE_CACHE_TTL_SECS))
                .build(),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    pub fn get(&self, query: &str, item: &MemoryItem) -> Option<ScoringResult> {
        let result = self.inner.get(&cache_key(query, item));
        match result {
            Some(_) => self.hits.fetch_add(1, Ordering::Relaxed),
            None => self.misses.fetch_add(1, Ordering::Relaxed),
        };
        result
    }

    pub fn insert(&self, query: &str, item: &MemoryItem, result: ScoringResult) {
        self.inner.insert(cache_key(query, item), result);
    }

    /// Drop every entry. Called after any weight mutation.
    pub fn invalidate_all(&self) {
        self.inner.invalidate_all();
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            entries: self.inner.entry_count(),
        }
    }
}

impl Default for ScoreCache {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item() -> MemoryItem {
        MemoryItem::new("m1", "title", "content")
    }

    #[test]
    fn miss_then_hit() {
        let cache = ScoreCache::new();
        assert!(cache.get("q", &item()).is_none());

        cache.insert("q", &item(), ScoringResult::zero("m1", "t"));
        let hit = cache.get("q", &item()).unwrap();
        assert_eq!(hit.memory_id, "m1");

        let stats = cache.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
    }

    #[test]
    fn keys_are_query_scoped() {
        let cache = ScoreCache::new();
        cache.insert("query one", &item(), ScoringResult::zero("m1", "t"));
        assert!(cache.get("query two", &item()).is_none());
    }

    #[test]
    fn edited_content_is_a_miss() {
        let cache = ScoreCache::new();
        cache.insert("q", &item(), ScoringResult::zero("m1", "t"));

        let edited = MemoryItem::new("m1", "title", "content changed");
        assert!(cache.get("q", &edited).is_none());
    }

    #[test]
    fn invalidation_clears_entries() {
        let cache = ScoreCache::new();
        cache.insert("q", &item(), ScoringResult::zero("m1", "t"));
        cache.invalidate_all();
        assert!(cache.get("q", &item()).is_none());
    }
}
