//! Score confidence estimation.

use std::collections::HashMap;

use engram_core::models::DimensionScore;

const CONFIDENCE_CAP: f64 = 95.0;

/// How much content supports a 100% confidence length signal.
const FULL_LENGTH_CHARS: f64 = 1000.0;
/// Matched keywords that saturate the keyword signal.
const FULL_KEYWORD_COUNT: f64 = 10.0;
/// Matrix usage that saturates the maturity signal.
const FULL_MATURITY_USAGE: f64 = 100.0;

/// Estimates how much a score should be trusted, on a 0-100 scale.
///
/// Four signals: dimension coverage (40%), content length (20%), matched
/// keyword count (20%), and matrix maturity (20%). Capped at 95 so no score
/// ever presents as certain.
#[derive(Debug, Default)]
pub struct ConfidenceEstimator;

impl ConfidenceEstimator {
    pub fn new() -> Self {
        Self
    }

    pub fn estimate(
        &self,
        breakdown: &HashMap<String, DimensionScore>,
        content_len: usize,
        matched_count: usize,
        matrix_usage: u64,
    ) -> f64 {
        let coverage = if breakdown.is_empty() {
            0.0
        } else {
            let scored = breakdown.values().filter(|d| d.raw_score > 0.0).count();
            scored as f64 / breakdown.len() as f64
        };
        let length = (content_len as f64 / FULL_LENGTH_CHARS).min(1.0);
        let keywords = (matched_count as f64 / FULL_KEYWORD_COUNT).min(1.0);
        let maturity = (matrix_usage as f64 / FULL_MATURITY_USAGE).min(1.0);

        let confidence =
            (coverage * 0.4 + length * 0.2 + keywords * 0.2 + maturity * 0.2) * 100.0;
        confidence.min(CONFIDENCE_CAP)
    }
}
