use std::collections::HashMap;

use proptest::prelude::*;

use engram_core::{EngineConfig, MemoryItem};
use engram_scoring::analyzer::RequirementAnalyzer;
use engram_scoring::{DynamicWeightCalculator, ScoringEngine};

fn query_strategy() -> impl Strategy<Value = String> {
    proptest::collection::vec(
        prop_oneof![
            Just("validate"),
            Just("workflow"),
            Just("Solution"),
            Just("API"),
            Just("mixed"),
            Just("create"),
            Just("endpoint"),
            Just("random"),
            Just("notes"),
        ],
        0..8,
    )
    .prop_map(|words| words.join(" "))
}

fn item_strategy() -> impl Strategy<Value = Vec<MemoryItem>> {
    proptest::collection::vec("[a-z ]{0,120}", 1..6).prop_map(|contents| {
        contents
            .into_iter()
            .enumerate()
            .map(|(i, content)| MemoryItem::new(format!("mem-{i}"), format!("item {i}"), content))
            .collect()
    })
}

fn sum(weights: &HashMap<String, f64>) -> f64 {
    weights.values().sum()
}

proptest! {
    // ── Weight distribution always sums to 100 ───────────────────────────

    #[test]
    fn weights_sum_to_one_hundred(query in query_strategy()) {
        let calculator = DynamicWeightCalculator::standard();
        let requirement = RequirementAnalyzer::new().extract(&query);
        let weights = calculator.calculate(&requirement);

        prop_assert!((sum(&weights) - 100.0).abs() < 1e-9);
        for weight in weights.values() {
            prop_assert!(*weight >= 0.0);
        }
    }

    #[test]
    fn extended_weights_sum_to_one_hundred(query in query_strategy()) {
        let calculator = DynamicWeightCalculator::extended();
        let requirement = RequirementAnalyzer::new().extract(&query);
        let weights = calculator.calculate(&requirement);
        prop_assert!((sum(&weights) - 100.0).abs() < 1e-9);
    }

    // ── Scoring output invariants ────────────────────────────────────────

    #[test]
    fn results_sorted_and_bounded(query in query_strategy(), items in item_strategy()) {
        let mut engine = ScoringEngine::standard().with_config(EngineConfig::frozen());
        let results = engine.score(&query, &items);

        prop_assert_eq!(results.len(), items.len());
        for pair in results.windows(2) {
            prop_assert!(pair[0].total_score >= pair[1].total_score);
        }
        for result in &results {
            prop_assert!(result.total_score >= 0.0);
            prop_assert!((0.0..=95.0).contains(&result.confidence));
            for (_, dim) in &result.score_breakdown {
                prop_assert!(dim.raw_score <= dim.max_score + 1e-9);
                prop_assert!(dim.raw_score >= 0.0);
            }
        }
    }

    // ── Frozen scoring is idempotent ─────────────────────────────────────

    #[test]
    fn frozen_scoring_is_idempotent(query in query_strategy(), items in item_strategy()) {
        let mut engine = ScoringEngine::standard().with_config(EngineConfig::frozen());
        let first = engine.score(&query, &items);
        let second = engine.score(&query, &items);

        for (a, b) in first.iter().zip(second.iter()) {
            prop_assert_eq!(&a.memory_id, &b.memory_id);
            prop_assert!((a.total_score - b.total_score).abs() < 1e-12);
        }
    }
}
