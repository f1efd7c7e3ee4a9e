use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::{WEIGHT_HISTORY_CAP, WEIGHT_HISTORY_KEEP};

/// Usage statistics tracked per (dimension, keyword) pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeywordStats {
    pub keyword: String,
    pub dimension: String,
    /// Times this keyword was consulted during scoring. Monotonic.
    pub usage_count: u64,
    /// Times this keyword matched content.
    pub match_count: u64,
    pub total_score_contribution: f64,
    /// Running average of score contribution per match.
    pub avg_score_contribution: f64,
    pub first_seen: DateTime<Utc>,
    pub last_seen: DateTime<Utc>,
    /// Bounded (timestamp, weight) history of stored weights.
    pub weight_history: Vec<(DateTime<Utc>, f64)>,
    /// Discovery confidence for auto-admitted keywords, 0 for seeded ones.
    pub confidence: f64,
    /// Saturates at 1.0 once usage_count reaches the stabilization threshold.
    pub stability_score: f64,
}

impl KeywordStats {
    pub fn new(dimension: impl Into<String>, keyword: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            keyword: keyword.into(),
            dimension: dimension.into(),
            usage_count: 0,
            match_count: 0,
            total_score_contribution: 0.0,
            avg_score_contribution: 0.0,
            first_seen: now,
            last_seen: now,
            weight_history: Vec::new(),
            confidence: 0.0,
            stability_score: 0.0,
        }
    }

    pub fn seeded(dimension: impl Into<String>, keyword: impl Into<String>, weight: f64) -> Self {
        let mut stats = Self::new(dimension, keyword);
        stats.weight_history.push((Utc::now(), weight));
        stats
    }

    /// Record a scoring match and refresh the running average.
    pub fn record_match(&mut self, score_contribution: f64, stabilization_threshold: u64) {
        self.usage_count += 1;
        self.match_count += 1;
        self.total_score_contribution += score_contribution;
        self.avg_score_contribution = self.total_score_contribution / self.match_count as f64;
        self.last_seen = Utc::now();
        self.stability_score =
            (self.usage_count as f64 / stabilization_threshold as f64).min(1.0);
    }

    /// Append a weight to the history, truncating once it exceeds the cap.
    pub fn push_weight(&mut self, weight: f64) {
        self.weight_history.push((Utc::now(), weight));
        self.last_seen = Utc::now();
        if self.weight_history.len() > WEIGHT_HISTORY_CAP {
            let start = self.weight_history.len() - WEIGHT_HISTORY_KEEP;
            self.weight_history.drain(..start);
        }
    }

    /// Absolute drift between the first and latest recorded weight.
    pub fn weight_drift(&self) -> f64 {
        match (self.weight_history.first(), self.weight_history.last()) {
            (Some((_, first)), Some((_, last))) if self.weight_history.len() > 1 => {
                (last - first).abs()
            }
            _ => 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_match_updates_running_average() {
        let mut stats = KeywordStats::new("validation", "validate");
        stats.record_match(4.0, 50);
        stats.record_match(2.0, 50);
        assert_eq!(stats.usage_count, 2);
        assert_eq!(stats.match_count, 2);
        assert!((stats.avg_score_contribution - 3.0).abs() < f64::EPSILON);
    }

    #[test]
    fn stability_saturates_at_one() {
        let mut stats = KeywordStats::new("validation", "validate");
        for _ in 0..120 {
            stats.record_match(1.0, 50);
        }
        assert_eq!(stats.stability_score, 1.0);
    }

    #[test]
    fn weight_history_is_bounded() {
        let mut stats = KeywordStats::new("validation", "validate");
        for i in 0..150 {
            stats.push_weight(i as f64 / 100.0);
        }
        assert!(stats.weight_history.len() <= WEIGHT_HISTORY_CAP);
    }
}
