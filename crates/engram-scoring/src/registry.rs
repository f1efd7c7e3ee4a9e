//! Engine registry.
//!
//! Engines are plain values with no global state; the registry gives
//! multi-tenant callers a keyed home for them so isolated matrices can
//! coexist in one process.

use std::collections::HashMap;
use std::sync::RwLock;

use crate::batch::SharedScoringEngine;
use crate::engine::ScoringEngine;

/// Keyed collection of independent shared engines.
#[derive(Default)]
pub struct EngineRegistry {
    engines: RwLock<HashMap<String, SharedScoringEngine>>,
}

impl EngineRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<SharedScoringEngine> {
        let engines = self
            .engines
            .read()
            .unwrap_or_else(|poison| poison.into_inner());
        engines.get(key).cloned()
    }

    /// Fetch the engine under `key`, building it with `init` on first use.
    pub fn get_or_create(
        &self,
        key: &str,
        init: impl FnOnce() -> ScoringEngine,
    ) -> SharedScoringEngine {
        if let Some(existing) = self.get(key) {
            return existing;
        }
        let mut engines = self
            .engines
            .write()
            .unwrap_or_else(|poison| poison.into_inner());
        engines
            .entry(key.to_string())
            .or_insert_with(|| SharedScoringEngine::new(init()))
            .clone()
    }

    /// Drop the engine under `key`. Outstanding handles keep working; the
    /// registry just stops handing it out.
    pub fn remove(&self, key: &str) -> bool {
        let mut engines = self
            .engines
            .write()
            .unwrap_or_else(|poison| poison.into_inner());
        engines.remove(key).is_some()
    }

    pub fn keys(&self) -> Vec<String> {
        let engines = self
            .engines
            .read()
            .unwrap_or_else(|poison| poison.into_inner());
        let mut keys: Vec<String> = engines.keys().cloned().collect();
        keys.sort();
        keys
    }
}
