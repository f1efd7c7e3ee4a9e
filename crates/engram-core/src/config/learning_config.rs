use serde::{Deserialize, Serialize};

use crate::constants;

/// Learning subsystem configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LearningConfig {
    /// Step size for feedback nudges and the stability factor.
    pub learning_rate: f64,
    /// Usage count after which a keyword is considered mature.
    pub stabilization_threshold: u64,
    /// Minimum confidence for admitting a discovered keyword.
    pub discovery_threshold: f64,
    /// Global multiplicative decay applied during stabilization.
    pub weight_decay: f64,
}

impl Default for LearningConfig {
    fn default() -> Self {
        Self {
            learning_rate: constants::DEFAULT_LEARNING_RATE,
            stabilization_threshold: constants::DEFAULT_STABILIZATION_THRESHOLD,
            discovery_threshold: constants::DEFAULT_DISCOVERY_THRESHOLD,
            weight_decay: constants::DEFAULT_WEIGHT_DECAY,
        }
    }
}
