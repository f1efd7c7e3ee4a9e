use proptest::prelude::*;

use engram_core::MemoryItem;
use engram_search::{RelevanceSearchIndex, SearchConfig};

fn corpus_strategy() -> impl Strategy<Value = Vec<MemoryItem>> {
    proptest::collection::vec(
        ("[a-z]{2,10}( [a-z]{2,10}){0,12}", 1u8..=5),
        1..8,
    )
    .prop_map(|specs| {
        specs
            .into_iter()
            .enumerate()
            .map(|(i, (content, importance))| {
                MemoryItem::new(format!("mem-{i}"), format!("title {i}"), content)
                    .with_importance(importance)
                    .with_project(if i % 2 == 0 { "alpha" } else { "beta" })
            })
            .collect()
    })
}

fn query_strategy() -> impl Strategy<Value = String> {
    "[a-z]{2,8}( [a-z]{2,8}){0,3}"
}

proptest! {
    #[test]
    fn results_sorted_bounded_and_truncated(
        corpus in corpus_strategy(),
        query in query_strategy(),
        max_results in 1usize..6,
    ) {
        let mut index = RelevanceSearchIndex::new();
        index.index_memories(corpus);

        let config = SearchConfig { max_results, min_relevance: 0.0, ..Default::default() };
        let results = index.search(&query, &config);

        prop_assert!(results.len() <= max_results);
        for pair in results.windows(2) {
            prop_assert!(pair[0].score >= pair[1].score);
        }
        for result in &results {
            prop_assert!(result.score >= 0.0);
        }
    }

    #[test]
    fn min_relevance_is_a_hard_floor(
        corpus in corpus_strategy(),
        query in query_strategy(),
    ) {
        let mut index = RelevanceSearchIndex::new();
        index.index_memories(corpus);

        let config = SearchConfig { min_relevance: 0.5, ..Default::default() };
        for result in index.search(&query, &config) {
            prop_assert!(result.score >= 0.5);
        }
    }

    #[test]
    fn project_filter_is_absolute(
        corpus in corpus_strategy(),
        query in query_strategy(),
    ) {
        let mut index = RelevanceSearchIndex::new();
        index.index_memories(corpus);

        let config = SearchConfig {
            project: Some("alpha".to_string()),
            min_relevance: 0.0,
            ..Default::default()
        };
        for result in index.search(&query, &config) {
            prop_assert_eq!(&result.project, "alpha");
        }
    }

    #[test]
    fn repeated_searches_are_stable(
        corpus in corpus_strategy(),
        query in query_strategy(),
    ) {
        let mut index = RelevanceSearchIndex::new();
        index.index_memories(corpus);

        let config = SearchConfig::default();
        let first = index.search(&query, &config);
        let second = index.search(&query, &config);

        prop_assert_eq!(first.len(), second.len());
        for (a, b) in first.iter().zip(second.iter()) {
            prop_assert_eq!(&a.memory_id, &b.memory_id);
            prop_assert!((a.score - b.score).abs() < 1e-12);
        }
    }
}
