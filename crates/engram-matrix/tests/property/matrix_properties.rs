use engram_core::models::ChangeSource;
use engram_matrix::KeywordWeightMatrix;
use proptest::prelude::*;

// ── Effective weight stays in [0.1, 10] for any known keyword ────────────

proptest! {
    #[test]
    fn effective_weight_always_in_band(
        weight in -5.0f64..20.0,
        usages in 0usize..200,
        contribution in 0.0f64..10.0,
    ) {
        let mut matrix = KeywordWeightMatrix::default();
        matrix.update_weight(
            "validation",
            "validate",
            weight,
            "prop",
            ChangeSource::ExpertAnnotation,
        );
        for _ in 0..usages {
            matrix.record_usage("validation", "validate", contribution);
        }

        let w = matrix.effective_weight("validation", "validate");
        prop_assert!((0.1..=10.0).contains(&w), "effective weight {} out of band", w);
    }

    #[test]
    fn every_mutation_emits_one_change(
        updates in 1usize..20,
    ) {
        let mut matrix = KeywordWeightMatrix::default();
        for i in 0..updates {
            matrix.update_weight(
                "validation",
                "validate",
                (i % 10) as f64,
                "prop",
                ChangeSource::UserFeedback,
            );
        }
        prop_assert_eq!(matrix.changes().len(), updates);
    }

    #[test]
    fn usage_count_is_monotonic(batches in proptest::collection::vec(1u64..10, 1..10)) {
        let mut matrix = KeywordWeightMatrix::default();
        let mut prev = 0;
        for batch in batches {
            for _ in 0..batch {
                matrix.record_usage("validation", "validate", 1.0);
            }
            let count = matrix.stats_for("validation", "validate").unwrap().usage_count;
            prop_assert!(count > prev);
            prev = count;
        }
    }
}
