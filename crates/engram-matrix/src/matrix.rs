//! The self-adjusting keyword weight matrix.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use engram_core::constants::{MAX_KEYWORD_WEIGHT, MIN_EFFECTIVE_WEIGHT};
use engram_core::models::{ChangeSource, ChangeType, KeywordStats, MatrixChange};
use engram_core::LearningConfig;

use crate::dimensions::DimensionSet;

/// One keyword admitted through automatic discovery.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscoveryRecord {
    pub timestamp: DateTime<Utc>,
    pub dimension: String,
    pub keyword: String,
    pub initial_weight: f64,
    pub confidence: f64,
}

/// Dimension → keyword → weight table plus per-keyword usage statistics.
///
/// Constructed once (seeded or loaded from a snapshot), mutated for the
/// engine's lifetime, persisted only on explicit save. Unknown dimensions and
/// keywords never error: lookups return zero and mutators auto-vivify.
pub struct KeywordWeightMatrix {
    version: String,
    created_at: DateTime<Utc>,
    weights: HashMap<String, HashMap<String, f64>>,
    max_scores: HashMap<String, f64>,
    stats: HashMap<String, KeywordStats>,
    changes: Vec<MatrixChange>,
    discovery_log: Vec<DiscoveryRecord>,
    total_usage_count: u64,
    learning: LearningConfig,
}

fn stats_key(dimension: &str, keyword: &str) -> String {
    format!("{dimension}::{keyword}")
}

impl KeywordWeightMatrix {
    /// Seed a matrix from a dimension set.
    pub fn seeded(set: &DimensionSet, learning: LearningConfig) -> Self {
        let mut weights: HashMap<String, HashMap<String, f64>> = HashMap::new();
        let mut max_scores = HashMap::new();
        let mut stats = HashMap::new();

        for spec in set.specs() {
            let entry = weights.entry(spec.name.clone()).or_default();
            for (keyword, weight) in &spec.seed_keywords {
                entry.insert(keyword.clone(), weight.clamp(0.0, MAX_KEYWORD_WEIGHT));
                stats.insert(
                    stats_key(&spec.name, keyword),
                    KeywordStats::seeded(&spec.name, keyword, *weight),
                );
            }
            max_scores.insert(spec.name.clone(), spec.max_score);
        }

        Self {
            version: engram_core::constants::SNAPSHOT_SCHEMA_VERSION.to_string(),
            created_at: Utc::now(),
            weights,
            max_scores,
            stats,
            changes: Vec::new(),
            discovery_log: Vec::new(),
            total_usage_count: 0,
            learning,
        }
    }

    /// Reassemble a matrix from snapshot parts. Used by the snapshot loader.
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn from_parts(
        version: String,
        created_at: DateTime<Utc>,
        weights: HashMap<String, HashMap<String, f64>>,
        max_scores: HashMap<String, f64>,
        stats: HashMap<String, KeywordStats>,
        discovery_log: Vec<DiscoveryRecord>,
        total_usage_count: u64,
        learning: LearningConfig,
    ) -> Self {
        Self {
            version,
            created_at,
            weights,
            max_scores,
            stats,
            changes: Vec::new(),
            discovery_log,
            total_usage_count,
            learning,
        }
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn learning(&self) -> &LearningConfig {
        &self.learning
    }

    /// Dimension names currently in the taxonomy.
    pub fn dimensions(&self) -> Vec<String> {
        let mut names: Vec<String> = self.weights.keys().cloned().collect();
        names.sort();
        names
    }

    /// Keywords registered under a dimension. Unknown dimension → empty.
    pub fn keywords(&self, dimension: &str) -> Vec<String> {
        self.weights
            .get(dimension)
            .map(|kws| kws.keys().cloned().collect())
            .unwrap_or_default()
    }

    /// Raw stored weight. Unknown dimension/keyword → 0.
    pub fn base_weight(&self, dimension: &str, keyword: &str) -> f64 {
        self.weights
            .get(dimension)
            .and_then(|kws| kws.get(keyword))
            .copied()
            .unwrap_or(0.0)
    }

    /// Score cap for a dimension. Unknown dimension → 25.
    pub fn max_score(&self, dimension: &str) -> f64 {
        self.max_scores.get(dimension).copied().unwrap_or(25.0)
    }

    /// Stored weight adjusted by the stability and performance factors,
    /// clamped to [0.1, 10]. Unknown dimension/keyword → 0, never an error.
    ///
    /// The factors stack multiplicatively before the clamp; the pre-clamp
    /// product can transiently exceed the nominal band and that is intended.
    pub fn effective_weight(&self, dimension: &str, keyword: &str) -> f64 {
        let Some(base) = self.weights.get(dimension).and_then(|k| k.get(keyword)) else {
            return 0.0;
        };

        let adjusted = match self.stats.get(&stats_key(dimension, keyword)) {
            Some(stats) => base * self.stability_factor(stats) * self.performance_factor(stats),
            None => *base,
        };
        adjusted.clamp(MIN_EFFECTIVE_WEIGHT, MAX_KEYWORD_WEIGHT)
    }

    /// Inflates weight while a keyword is still accumulating usage,
    /// proportionally to progress toward the stabilization threshold, then
    /// settles to a small fixed residual.
    fn stability_factor(&self, stats: &KeywordStats) -> f64 {
        let rate = self.learning.learning_rate;
        if stats.usage_count < self.learning.stabilization_threshold {
            let progress = stats.usage_count as f64 / self.learning.stabilization_threshold as f64;
            1.0 + rate * progress
        } else {
            1.0 + rate * 0.1
        }
    }

    fn performance_factor(&self, stats: &KeywordStats) -> f64 {
        if stats.match_count == 0 {
            return 1.0;
        }
        if stats.avg_score_contribution > 0.8 {
            1.1
        } else if stats.avg_score_contribution < 0.3 {
            0.9
        } else {
            1.0
        }
    }

    /// Set a keyword's stored weight, clamping to [0, 10]. Auto-vivifies the
    /// dimension and stats entry. Emits exactly one change record.
    pub fn update_weight(
        &mut self,
        dimension: &str,
        keyword: &str,
        weight: f64,
        reason: &str,
        source: ChangeSource,
    ) {
        let old = self
            .weights
            .get(dimension)
            .and_then(|k| k.get(keyword))
            .copied();
        let new_weight = weight.clamp(0.0, MAX_KEYWORD_WEIGHT);

        self.weights
            .entry(dimension.to_string())
            .or_default()
            .insert(keyword.to_string(), new_weight);

        let stats = self
            .stats
            .entry(stats_key(dimension, keyword))
            .or_insert_with(|| KeywordStats::new(dimension, keyword));
        stats.push_weight(new_weight);

        let change_type = if old.is_some() {
            ChangeType::UpdateWeight
        } else {
            ChangeType::AddKeyword
        };
        self.changes.push(MatrixChange::new(
            change_type,
            dimension,
            keyword,
            old,
            Some(new_weight),
            reason,
            source,
        ));
    }

    /// Admit a keyword found by automatic discovery. Candidates below the
    /// discovery confidence threshold are rejected (returns false); a
    /// candidate at exactly the threshold is accepted.
    pub fn add_discovered_keyword(
        &mut self,
        dimension: &str,
        keyword: &str,
        initial_weight: f64,
        confidence: f64,
    ) -> bool {
        if confidence < self.learning.discovery_threshold {
            debug!(
                dimension,
                keyword, confidence, "discovery candidate below threshold, dropped"
            );
            return false;
        }

        let weight = initial_weight.clamp(0.0, MAX_KEYWORD_WEIGHT);
        self.weights
            .entry(dimension.to_string())
            .or_default()
            .insert(keyword.to_string(), weight);

        let mut stats = KeywordStats::new(dimension, keyword);
        stats.confidence = confidence;
        stats.push_weight(weight);
        self.stats.insert(stats_key(dimension, keyword), stats);

        self.discovery_log.push(DiscoveryRecord {
            timestamp: Utc::now(),
            dimension: dimension.to_string(),
            keyword: keyword.to_string(),
            initial_weight: weight,
            confidence,
        });
        self.changes.push(
            MatrixChange::new(
                ChangeType::AutoDiscovery,
                dimension,
                keyword,
                None,
                Some(weight),
                "keyword discovery",
                ChangeSource::KeywordDiscovery,
            )
            .with_confidence(confidence),
        );

        debug!(dimension, keyword, weight, confidence, "keyword admitted");
        true
    }

    /// Record that a keyword matched during scoring, with the score it
    /// contributed. Silently ignores unknown keywords.
    pub fn record_usage(&mut self, dimension: &str, keyword: &str, score_contribution: f64) {
        if let Some(stats) = self.stats.get_mut(&stats_key(dimension, keyword)) {
            stats.record_match(score_contribution, self.learning.stabilization_threshold);
        }
        self.total_usage_count += 1;
    }

    /// Locate the dimension that owns a keyword, if any.
    pub fn dimension_of(&self, keyword: &str) -> Option<String> {
        self.weights
            .iter()
            .find(|(_, kws)| kws.contains_key(keyword))
            .map(|(dim, _)| dim.clone())
    }

    pub fn stats_for(&self, dimension: &str, keyword: &str) -> Option<&KeywordStats> {
        self.stats.get(&stats_key(dimension, keyword))
    }

    pub fn all_stats(&self) -> impl Iterator<Item = &KeywordStats> {
        self.stats.values()
    }

    pub fn total_usage(&self) -> u64 {
        self.total_usage_count
    }

    pub fn total_keywords(&self) -> usize {
        self.weights.values().map(|kws| kws.len()).sum()
    }

    pub fn discovered_count(&self) -> u64 {
        self.discovery_log.len() as u64
    }

    pub fn discovery_log(&self) -> &[DiscoveryRecord] {
        &self.discovery_log
    }

    /// Changes accumulated since construction (or the last snapshot load).
    pub fn changes(&self) -> &[MatrixChange] {
        &self.changes
    }

    /// Apply a change record's end state without emitting a new record.
    /// Replaying a change stream over the originating snapshot reproduces
    /// the matrix weights.
    pub fn apply_change(&mut self, change: &MatrixChange) {
        match change.new_value {
            Some(value) => {
                self.weights
                    .entry(change.dimension.clone())
                    .or_default()
                    .insert(change.keyword.clone(), value.clamp(0.0, MAX_KEYWORD_WEIGHT));
            }
            None => {
                if let Some(kws) = self.weights.get_mut(&change.dimension) {
                    kws.remove(&change.keyword);
                }
            }
        }
    }

    pub(crate) fn weights_table(&self) -> &HashMap<String, HashMap<String, f64>> {
        &self.weights
    }

    pub(crate) fn max_scores_table(&self) -> &HashMap<String, f64> {
        &self.max_scores
    }

    pub(crate) fn stats_table(&self) -> &HashMap<String, KeywordStats> {
        &self.stats
    }
}

impl Default for KeywordWeightMatrix {
    fn default() -> Self {
        Self::seeded(&DimensionSet::standard(), LearningConfig::default())
    }
}
