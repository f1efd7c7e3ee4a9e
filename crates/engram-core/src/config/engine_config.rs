use serde::{Deserialize, Serialize};

/// Scoring engine behavior toggles.
///
/// Disabling discovery and stabilization makes `score` side-effect free on
/// weights (usage statistics are still recorded), which callers needing
/// reproducible comparisons rely on.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Learn from user feedback automatically.
    pub auto_learning: bool,
    /// Run keyword discovery over query + corpus before scoring.
    pub keyword_discovery: bool,
    /// Run a stabilization pass after scoring once the matrix has matured.
    pub stabilization: bool,
    /// Record per-keyword usage statistics while scoring.
    pub record_usage: bool,
    /// Consult and populate the score cache.
    pub use_cache: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            auto_learning: true,
            keyword_discovery: true,
            stabilization: true,
            record_usage: true,
            use_cache: true,
        }
    }
}

impl EngineConfig {
    /// Configuration for reproducible scoring: no discovery, no
    /// stabilization, no usage recording, no cache.
    pub fn frozen() -> Self {
        Self {
            auto_learning: false,
            keyword_discovery: false,
            stabilization: false,
            record_usage: false,
            use_cache: false,
        }
    }
}
