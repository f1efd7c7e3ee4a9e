//! Periodic weight stabilization.
//!
//! Once the matrix as a whole has seen enough usage, each mature keyword's
//! weight is revisited: good performers drift up 5%, poor performers drift
//! down 5%, and a global decay counters runaway growth.

use tracing::debug;

use engram_core::models::ChangeSource;
use engram_matrix::KeywordWeightMatrix;

/// Settles weights of keywords whose usage has matured.
#[derive(Debug, Default)]
pub struct Stabilizer;

impl Stabilizer {
    pub fn new() -> Self {
        Self
    }

    /// Run one stabilization pass. No-op until total usage exceeds the
    /// stabilization threshold. Returns the number of weights touched.
    pub fn run(&self, matrix: &mut KeywordWeightMatrix) -> usize {
        let threshold = matrix.learning().stabilization_threshold;
        if matrix.total_usage() <= threshold {
            return 0;
        }
        let decay = matrix.learning().weight_decay;

        // Collect first: updates below mutate the stats table.
        let mature: Vec<(String, String, f64)> = matrix
            .all_stats()
            .filter(|stats| stats.usage_count >= threshold)
            .map(|stats| {
                (
                    stats.dimension.clone(),
                    stats.keyword.clone(),
                    stats.avg_score_contribution,
                )
            })
            .collect();

        let mut touched = 0;
        for (dimension, keyword, avg_contribution) in mature {
            let current = matrix.base_weight(&dimension, &keyword);
            if current == 0.0 {
                continue;
            }

            let adjusted = if avg_contribution > 0.7 {
                current * 1.05
            } else if avg_contribution < 0.3 {
                current * 0.95
            } else {
                current
            };
            let stabilized = adjusted * decay;

            matrix.update_weight(
                &dimension,
                &keyword,
                stabilized,
                "automatic stabilization",
                ChangeSource::Stabilization,
            );
            touched += 1;
        }

        if touched > 0 {
            debug!(touched, "stabilization pass complete");
        }
        touched
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_op_below_total_usage_threshold() {
        let mut matrix = KeywordWeightMatrix::default();
        matrix.record_usage("validation", "validate", 1.0);
        assert_eq!(Stabilizer::new().run(&mut matrix), 0);
    }

    #[test]
    fn mature_good_performer_drifts_with_decay() {
        let mut matrix = KeywordWeightMatrix::default();
        let threshold = matrix.learning().stabilization_threshold;
        for _ in 0..=threshold {
            matrix.record_usage("validation", "validate", 0.9);
        }

        let before = matrix.base_weight("validation", "validate");
        let touched = Stabilizer::new().run(&mut matrix);
        let after = matrix.base_weight("validation", "validate");

        assert_eq!(touched, 1);
        let expected = before * 1.05 * matrix.learning().weight_decay;
        assert!((after - expected).abs() < 1e-9);
    }

    #[test]
    fn repeated_passes_converge_for_average_performer() {
        let mut matrix = KeywordWeightMatrix::default();
        let threshold = matrix.learning().stabilization_threshold;
        for _ in 0..=threshold {
            matrix.record_usage("validation", "check", 0.5);
        }

        // Average performers only see the global decay, which converges
        // toward the weight floor geometrically.
        let stabilizer = Stabilizer::new();
        let mut prev = matrix.base_weight("validation", "check");
        for _ in 0..20 {
            stabilizer.run(&mut matrix);
            let current = matrix.base_weight("validation", "check");
            assert!(current <= prev);
            prev = current;
        }
    }
}
