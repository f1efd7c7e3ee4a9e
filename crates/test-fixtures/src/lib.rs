//! Shared memory-item fixtures for workspace tests.

use chrono::{Duration, Utc};

use engram_core::MemoryItem;

/// A small corpus with one clearly workflow-relevant item, one API item,
/// and one unrelated item. Ids are stable so tests can assert on ranking.
pub fn mixed_corpus() -> Vec<MemoryItem> {
    vec![workflow_item(), api_item(), unrelated_item()]
}

/// Dense Solution/workflow/validation content.
pub fn workflow_item() -> MemoryItem {
    MemoryItem::new(
        "mem-workflow",
        "Solution workflow step validation",
        "Each Solution workflow step must validate its dependencies before \
         the service executes it. The workflow validates mixed steps, checks \
         cross-type constraints, and the SolutionService verifies every \
         reference.\n\n- validate step order\n- check dependencies\n- verify \
         Solution references",
    )
    .with_tags(vec!["workflow".into(), "validation".into()])
    .with_project("unified-api")
    .with_importance(4)
}

/// REST/endpoint content with a sequence diagram.
pub fn api_item() -> MemoryItem {
    MemoryItem::new(
        "mem-api",
        "Unified REST endpoint design",
        "The unified API exposes one POST endpoint per entity. The \
         controller routes create and update requests to the right \
         service.\n\n```\nsequenceDiagram\n  client->>controller: POST\n```",
    )
    .with_tags(vec!["api".into(), "rest".into()])
    .with_project("unified-api")
    .with_importance(3)
}

/// Content with no overlap with the seeded taxonomy.
pub fn unrelated_item() -> MemoryItem {
    MemoryItem::new(
        "mem-unrelated",
        "Database partition tuning",
        "Tuning notes for the storage layer: partition sizing, compaction \
         cadence, and write amplification on bulk loads.",
    )
    .with_tags(vec!["storage".into()])
    .with_project("infra")
    .with_importance(2)
}

/// An item created `days` ago, for recency-sensitive tests.
pub fn aged_item(id: &str, title: &str, content: &str, days: i64) -> MemoryItem {
    let mut item = MemoryItem::new(id, title, content);
    item.created_at = Utc::now() - Duration::days(days);
    item
}

/// `n` filler items with low relevance, for batch and cache tests.
pub fn filler_items(n: usize) -> Vec<MemoryItem> {
    (0..n)
        .map(|i| {
            MemoryItem::new(
                format!("mem-filler-{i}"),
                format!("Filler note {i}"),
                "Miscellaneous notes without taxonomy overlap.",
            )
        })
        .collect()
}
