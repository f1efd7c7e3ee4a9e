use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Per-dimension breakdown of a single item's score.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DimensionScore {
    /// Additive raw score, capped at `max_score`.
    pub raw_score: f64,
    /// Configured cap for this dimension.
    pub max_score: f64,
    /// Weight percentage this dimension carried for the query.
    pub weight: f64,
    /// `(raw_score / max_score) * weight`.
    pub weighted_score: f64,
    /// Keywords that matched in this dimension.
    pub matched_keywords: Vec<String>,
}

/// Ranked scoring result for one memory item.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoringResult {
    pub memory_id: String,
    pub title: String,
    /// Sum of weighted dimension scores. Always >= 0.
    pub total_score: f64,
    /// Trust measure in [0, 100].
    pub confidence: f64,
    /// Breakdown keyed by dimension name.
    pub score_breakdown: HashMap<String, DimensionScore>,
    /// Dimensions where the item scored near its weight budget.
    pub key_strengths: Vec<String>,
    /// All matched keywords across dimensions, deduplicated.
    pub matched_keywords: Vec<String>,
}

impl ScoringResult {
    /// Empty result for an item nothing matched.
    pub fn zero(memory_id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            memory_id: memory_id.into(),
            title: title.into(),
            total_score: 0.0,
            confidence: 0.0,
            score_breakdown: HashMap::new(),
            key_strengths: Vec::new(),
            matched_keywords: Vec::new(),
        }
    }
}
