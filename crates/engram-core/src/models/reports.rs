//! Reporting models consumed by the learning-statistics surface.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Aggregate learning statistics for one engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LearningStatistics {
    pub total_scoring_sessions: usize,
    pub total_keyword_usage: u64,
    pub discovered_keywords: u64,
    /// Keywords with stability_score >= 0.8.
    pub stable_keywords: usize,
    pub total_keywords: usize,
    /// Mean absolute weight drift across keywords with history.
    pub average_weight_change: f64,
    pub feedback_count: usize,
    pub matrix_version: String,
    pub learning_enabled: bool,
    pub discovery_enabled: bool,
    pub stabilization_enabled: bool,
}

/// One keyword's summary line in an evolution report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeywordSummary {
    pub keyword: String,
    pub dimension: String,
    pub avg_contribution: f64,
    pub stability_score: f64,
    pub usage_count: u64,
}

/// Per-dimension roll-up of keyword evolution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DimensionEvolution {
    pub average_stability: f64,
    pub average_usage: f64,
    pub average_contribution: f64,
    pub keyword_count: usize,
}

/// Snapshot of how the keyword population is evolving.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeywordEvolutionReport {
    pub top_performing_keywords: Vec<KeywordSummary>,
    pub newly_discovered_keywords: Vec<KeywordSummary>,
    pub most_stable_keywords: Vec<KeywordSummary>,
    pub weight_evolution_summary: HashMap<String, DimensionEvolution>,
}
