//! Feedback-driven weight learning.
//!
//! Two paths: an immediate per-feedback nudge (rating drives matched
//! keyword weights up or down by half a learning-rate step) and a batch
//! aggregator that turns >= 5 samples per keyword into a momentum-smoothed
//! gradient step, rejecting sub-noise deltas.

use std::collections::HashMap;

use tracing::debug;

use engram_core::constants::{MAX_KEYWORD_WEIGHT, MIN_EFFECTIVE_WEIGHT};
use engram_core::models::ChangeSource;
use engram_core::UserFeedback;
use engram_matrix::KeywordWeightMatrix;

/// Ratings at or above this nudge weights up.
const POSITIVE_RATING: u8 = 4;
/// Ratings at or below this nudge weights down.
const NEGATIVE_RATING: u8 = 2;

/// Applies immediate weight nudges from single feedback entries and keeps
/// the feedback history.
#[derive(Debug, Default)]
pub struct FeedbackLearner {
    history: Vec<UserFeedback>,
}

impl FeedbackLearner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn history(&self) -> &[UserFeedback] {
        &self.history
    }

    /// Record feedback and, when `learn` is set, nudge each matched
    /// keyword's weight by ±0.5·learning_rate. Keywords the matrix does not
    /// know are skipped silently.
    pub fn add_feedback(
        &mut self,
        matrix: &mut KeywordWeightMatrix,
        feedback: UserFeedback,
        learn: bool,
    ) {
        if learn {
            self.apply_nudges(matrix, &feedback);
        }
        self.history.push(feedback);
    }

    fn apply_nudges(&self, matrix: &mut KeywordWeightMatrix, feedback: &UserFeedback) {
        let adjustment = matrix.learning().learning_rate * 0.5;

        for keyword in &feedback.matched_keywords {
            let Some(dimension) = matrix.dimension_of(keyword) else {
                continue;
            };
            let current = matrix.effective_weight(&dimension, keyword);

            let new_weight = if feedback.rating >= POSITIVE_RATING {
                (current + adjustment).min(MAX_KEYWORD_WEIGHT)
            } else if feedback.rating <= NEGATIVE_RATING {
                (current - adjustment).max(MIN_EFFECTIVE_WEIGHT)
            } else {
                continue;
            };

            matrix.update_weight(
                &dimension,
                keyword,
                new_weight,
                &format!("user feedback: rating={}", feedback.rating),
                ChangeSource::UserFeedback,
            );
        }
    }
}

/// Aggregated per-keyword performance over a batch of feedback.
#[derive(Debug, Clone, Default)]
struct KeywordPerformance {
    total_matches: u64,
    positive_matches: u64,
    avg_rating: f64,
    sample_count: u64,
}

/// Batch learner: momentum-smoothed gradient steps toward each keyword's
/// observed performance.
#[derive(Debug)]
pub struct BatchFeedbackLearner {
    learning_rate: f64,
    momentum: f64,
    /// Minimum samples per keyword before a batch update is considered.
    min_samples: u64,
    /// Deltas at or below this are treated as noise and rejected.
    noise_threshold: f64,
    momentum_cache: HashMap<String, f64>,
}

impl Default for BatchFeedbackLearner {
    fn default() -> Self {
        Self {
            learning_rate: 0.1,
            momentum: 0.9,
            min_samples: 5,
            noise_threshold: 0.5,
            momentum_cache: HashMap::new(),
        }
    }
}

impl BatchFeedbackLearner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply batch updates from a feedback window. Returns the number of
    /// weights changed.
    pub fn apply(&mut self, matrix: &mut KeywordWeightMatrix, window: &[UserFeedback]) -> usize {
        let performance = Self::aggregate(window);
        let mut applied = 0;

        for (keyword, stats) in performance {
            if stats.sample_count < self.min_samples {
                continue;
            }
            let Some(dimension) = matrix.dimension_of(&keyword) else {
                continue;
            };

            let current = matrix.effective_weight(&dimension, &keyword);
            let positive_ratio = stats.positive_matches as f64 / stats.total_matches as f64;
            let performance_score = (stats.avg_rating / 5.0) * 0.6 + positive_ratio * 0.4;

            // Gradient toward the 0.6 target performance, momentum-smoothed.
            let mut gradient = (performance_score - 0.6) * 2.0;
            let cache_key = format!("{dimension}::{keyword}");
            if let Some(prev) = self.momentum_cache.get(&cache_key) {
                gradient = self.momentum * prev + (1.0 - self.momentum) * gradient;
            }
            self.momentum_cache.insert(cache_key, gradient);

            let new_weight =
                (current + self.learning_rate * gradient).clamp(1.0, MAX_KEYWORD_WEIGHT);
            if (new_weight - current).abs() <= self.noise_threshold {
                continue;
            }

            matrix.update_weight(
                &dimension,
                &keyword,
                new_weight,
                &format!(
                    "batch feedback: samples={} avg_rating={:.2} positive_ratio={:.2}",
                    stats.sample_count, stats.avg_rating, positive_ratio
                ),
                ChangeSource::AutoLearning,
            );
            applied += 1;
        }

        debug!(applied, window = window.len(), "batch feedback pass complete");
        applied
    }

    fn aggregate(window: &[UserFeedback]) -> HashMap<String, KeywordPerformance> {
        let mut performance: HashMap<String, KeywordPerformance> = HashMap::new();

        for feedback in window {
            for keyword in &feedback.matched_keywords {
                let stats = performance.entry(keyword.clone()).or_default();
                stats.total_matches += 1;
                stats.sample_count += 1;
                if feedback.rating >= POSITIVE_RATING {
                    stats.positive_matches += 1;
                }
                stats.avg_rating = (stats.avg_rating * (stats.sample_count - 1) as f64
                    + feedback.rating as f64)
                    / stats.sample_count as f64;
            }
        }

        performance
    }
}
