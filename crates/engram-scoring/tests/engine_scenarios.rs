//! End-to-end engine scenarios over a realistic corpus.

use engram_core::EngineConfig;
use engram_matrix::LoadMode;
use engram_scoring::{EngineRegistry, ScoringEngine, SharedScoringEngine};

#[test]
fn workflow_query_ranks_workflow_item_first() {
    let corpus = test_fixtures::mixed_corpus();
    let mut engine = ScoringEngine::standard();

    let results = engine.score(
        "How should Solution workflow steps validate their dependencies?",
        &corpus,
    );

    assert_eq!(results[0].memory_id, "mem-workflow");
    assert!(results[0].total_score > results.last().unwrap().total_score);

    // The defining query terms must surface in the winner's match list.
    let matched = &results[0].matched_keywords;
    assert!(matched.iter().any(|k| k == "Solution"));
    assert!(matched.iter().any(|k| k == "Workflow"));
    assert!(matched.iter().any(|k| k == "validate"));
}

#[test]
fn api_query_prefers_api_item() {
    let corpus = vec![test_fixtures::api_item(), test_fixtures::unrelated_item()];
    let mut engine = ScoringEngine::standard();

    let results = engine.score("design a unified REST API endpoint", &corpus);
    assert_eq!(results[0].memory_id, "mem-api");
    assert!(results[0].total_score > results[1].total_score);
}

#[test]
fn unrelated_item_scores_near_zero() {
    let mut engine = ScoringEngine::standard().with_config(EngineConfig::frozen());
    let results = engine.score(
        "validate Solution workflow steps",
        &[test_fixtures::unrelated_item()],
    );
    assert!(results[0].total_score < 5.0);
    assert!(results[0].key_strengths.is_empty());
}

#[test]
fn feedback_loop_improves_relevant_ranking() {
    let corpus = test_fixtures::mixed_corpus();
    let mut engine = ScoringEngine::standard();

    let query = "validate Solution workflow steps";
    let before = engine.score(query, &corpus);
    let top = before[0].clone();

    for _ in 0..10 {
        engine.add_user_feedback(&top.memory_id, query, 5, top.matched_keywords.clone(), "");
    }

    let after = engine.score(query, &corpus);
    assert_eq!(after[0].memory_id, top.memory_id);
    assert!(after[0].total_score >= top.total_score - 1e-9);
}

#[test]
fn discovery_admits_corpus_terms_over_sessions() {
    let mut engine = ScoringEngine::standard();
    let corpus = vec![test_fixtures::workflow_item(), test_fixtures::api_item()];

    engine.score("validate WorkflowService steps", &corpus);

    // WorkflowService is a confident discovery candidate: technical suffix,
    // CamelCase, and overlapping an existing keyword family.
    assert!(engine.matrix().dimension_of("WorkflowService").is_some());
}

#[test]
fn snapshot_save_and_load_preserves_learning() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("matrix.json");
    let corpus = test_fixtures::mixed_corpus();

    let mut engine = ScoringEngine::standard();
    engine.score("validate Solution workflow steps", &corpus);
    engine.add_user_feedback("mem-workflow", "q", 5, vec!["validate".into()], "good match");
    engine.save_snapshot(&path).unwrap();

    let restored = ScoringEngine::load(&path, LoadMode::Strict).unwrap();
    assert_eq!(
        restored.matrix().base_weight("validation", "validate"),
        engine.matrix().base_weight("validation", "validate")
    );
    assert_eq!(restored.history().len(), engine.history().len());
    assert_eq!(restored.matrix().total_usage(), engine.matrix().total_usage());
}

#[test]
fn corrupt_snapshot_is_lenient_by_default() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("matrix.json");
    std::fs::write(&path, "{ not json").unwrap();

    let engine = ScoringEngine::load(&path, LoadMode::Lenient).unwrap();
    assert!(engine.matrix().total_keywords() > 0);

    assert!(ScoringEngine::load(&path, LoadMode::Strict).is_err());
}

#[test]
fn registry_isolates_tenants() {
    let registry = EngineRegistry::new();
    let corpus = test_fixtures::mixed_corpus();

    let tenant_a = registry.get_or_create("tenant-a", ScoringEngine::standard);
    let tenant_b = registry.get_or_create("tenant-b", ScoringEngine::standard);

    tenant_a.score("validate Solution workflow steps", &corpus);
    tenant_a.with(|engine| {
        engine.add_user_feedback("mem-workflow", "q", 5, vec!["validate".into()], "");
    });

    let a_sessions = tenant_a.with(|e| e.history().len());
    let b_sessions = tenant_b.with(|e| e.history().len());
    assert_eq!(a_sessions, 1);
    assert_eq!(b_sessions, 0);
}

#[tokio::test]
async fn shared_engine_scores_concurrently() {
    let shared = SharedScoringEngine::new(ScoringEngine::standard());
    let corpus = test_fixtures::mixed_corpus();

    let mut handles = Vec::new();
    for _ in 0..4 {
        let shared = shared.clone();
        let corpus = corpus.clone();
        handles.push(tokio::spawn(async move {
            shared
                .score_async("validate Solution workflow steps".to_string(), corpus)
                .await
        }));
    }

    for handle in handles {
        let results = handle.await.unwrap().unwrap();
        assert_eq!(results.len(), 3);
    }
    assert_eq!(shared.with(|e| e.history().len()), 4);
}

#[test]
fn evolution_report_tracks_top_performers() {
    let corpus = test_fixtures::mixed_corpus();
    let mut engine = ScoringEngine::standard();
    for _ in 0..5 {
        engine.score("validate Solution workflow steps", &corpus);
    }

    let report = engine.evolution_report();
    assert!(!report.top_performing_keywords.is_empty());
    assert!(!report.weight_evolution_summary.is_empty());
    for summary in &report.top_performing_keywords {
        assert!(summary.usage_count > 0);
    }
}
