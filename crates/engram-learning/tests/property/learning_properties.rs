use engram_core::UserFeedback;
use engram_learning::{FeedbackLearner, Stabilizer};
use engram_matrix::KeywordWeightMatrix;
use proptest::prelude::*;

fn rating_5(keyword: &str) -> UserFeedback {
    UserFeedback::new("mem-1", "q", 5, vec![keyword.to_string()], "")
}

// ── Monotonic feedback: repeated top ratings never lower a weight ────────

proptest! {
    #[test]
    fn repeated_positive_feedback_is_monotonic(rounds in 1usize..100) {
        let mut matrix = KeywordWeightMatrix::default();
        let mut learner = FeedbackLearner::new();

        let mut prev = matrix.effective_weight("validation", "validate");
        for _ in 0..rounds {
            learner.add_feedback(&mut matrix, rating_5("validate"), true);
            let current = matrix.effective_weight("validation", "validate");
            prop_assert!(current + 1e-12 >= prev, "weight decreased: {} < {}", current, prev);
            prop_assert!(current <= 10.0);
            prev = current;
        }
    }

    // ── Stabilization converges to a fixed weight ────────────────────────

    #[test]
    fn stabilization_converges(contribution in 0.0f64..1.0) {
        let mut matrix = KeywordWeightMatrix::default();
        let threshold = matrix.learning().stabilization_threshold;
        for _ in 0..=threshold {
            matrix.record_usage("validation", "validate", contribution);
        }

        let stabilizer = Stabilizer::new();
        let mut prev = matrix.base_weight("validation", "validate");
        let mut delta = f64::MAX;
        for _ in 0..2500 {
            stabilizer.run(&mut matrix);
            let current = matrix.base_weight("validation", "validate");
            let new_delta = (current - prev).abs();
            prev = current;
            delta = new_delta;
        }
        // After many passes the per-pass movement is negligible: the weight
        // has converged onto a fixed point (0 or the 10.0 cap).
        prop_assert!(delta < 1e-6, "still moving by {} per pass", delta);
    }
}
