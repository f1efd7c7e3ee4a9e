//! Parallel batch scoring and the shared async handle.
//!
//! Per-item analysis is pure with respect to the matrix, so a batch fans
//! out across a fixed worker pool and the engine commits usage events
//! serially afterward. Results are identical to sequential scoring.

use std::sync::{Arc, Mutex};

use rayon::prelude::*;
use tracing::debug;

use engram_core::constants::BATCH_WORKERS;
use engram_core::{EngramError, EngramResult, MemoryItem, ScoringResult};

use crate::engine::{ScoringEngine, UsageEvent};

static POOL: std::sync::LazyLock<rayon::ThreadPool> = std::sync::LazyLock::new(|| {
    rayon::ThreadPoolBuilder::new()
        .num_threads(BATCH_WORKERS)
        .thread_name(|i| format!("engram-score-{i}"))
        .build()
        .expect("batch scoring pool")
});

impl ScoringEngine {
    /// Score a batch in parallel across a fixed worker pool. Ranking,
    /// session recording, and learning behave exactly as in [`score`].
    ///
    /// [`score`]: ScoringEngine::score
    pub fn score_batch(&mut self, query: &str, items: &[MemoryItem]) -> Vec<ScoringResult> {
        if items.is_empty() {
            return Vec::new();
        }

        let (requirement, weights) = self.prepare(query, items);

        // Fill cache hits into their input-order slots; only misses go to
        // the pool. Slot order keeps ties ranked by input position, exactly
        // as sequential scoring does.
        let mut slots: Vec<Option<ScoringResult>> = vec![None; items.len()];
        let mut to_score: Vec<(usize, &MemoryItem)> = Vec::new();
        for (index, item) in items.iter().enumerate() {
            if self.config().use_cache {
                if let Some(hit) = self.cache_get(query, item) {
                    slots[index] = Some(hit);
                    continue;
                }
            }
            to_score.push((index, item));
        }

        let engine: &ScoringEngine = &*self;
        let scored: Vec<(usize, (ScoringResult, Vec<UsageEvent>))> = POOL.install(|| {
            to_score
                .par_iter()
                .map(|&(index, item)| (index, engine.score_item(item, &weights)))
                .collect()
        });
        debug!(
            batch = items.len(),
            computed = scored.len(),
            "parallel batch scored"
        );

        let mut pending_usage = Vec::new();
        for (index, (result, usage)) in scored {
            if self.config().use_cache {
                self.cache_insert(query, &items[index], result.clone());
            }
            pending_usage.extend(usage);
            slots[index] = Some(result);
        }
        let results: Vec<ScoringResult> = slots.into_iter().flatten().collect();

        self.finish(query, &requirement, weights, results, pending_usage)
    }
}

/// Cloneable, thread-safe handle around one engine.
///
/// All access serializes through the internal lock; `score_async` moves the
/// blocking work off the async runtime.
#[derive(Clone)]
pub struct SharedScoringEngine {
    inner: Arc<Mutex<ScoringEngine>>,
}

impl SharedScoringEngine {
    pub fn new(engine: ScoringEngine) -> Self {
        Self {
            inner: Arc::new(Mutex::new(engine)),
        }
    }

    /// Run a closure against the locked engine.
    pub fn with<R>(&self, f: impl FnOnce(&mut ScoringEngine) -> R) -> R {
        let mut guard = self.inner.lock().unwrap_or_else(|poison| poison.into_inner());
        f(&mut guard)
    }

    pub fn score(&self, query: &str, items: &[MemoryItem]) -> Vec<ScoringResult> {
        self.with(|engine| engine.score(query, items))
    }

    pub fn score_batch(&self, query: &str, items: &[MemoryItem]) -> Vec<ScoringResult> {
        self.with(|engine| engine.score_batch(query, items))
    }

    /// Score on a blocking worker thread so async callers never hold the
    /// runtime hostage during a large batch.
    pub async fn score_async(
        &self,
        query: String,
        items: Vec<MemoryItem>,
    ) -> EngramResult<Vec<ScoringResult>> {
        let shared = self.clone();
        tokio::task::spawn_blocking(move || shared.score_batch(&query, &items))
            .await
            .map_err(|e| EngramError::Concurrency {
                reason: e.to_string(),
            })
    }
}
