//! # engram-scoring
//!
//! The relevance scoring engine: extracts structured requirements from a
//! query, scores memory items per dimension against the weight matrix,
//! distributes dynamic dimension weights, estimates confidence, caches
//! per-query results, and wires in the learning subsystem. Batch scoring
//! fans item analysis out over a worker pool, and a shared handle exposes
//! the engine to async callers.

pub mod analyzer;
pub mod batch;
pub mod cache;
pub mod confidence;
pub mod engine;
pub mod registry;
pub mod weights;

pub use analyzer::{ConceptCombo, ContentAnalyzer, RequirementAnalyzer, UserRequirement};
pub use batch::SharedScoringEngine;
pub use cache::CacheStats;
pub use confidence::ConfidenceEstimator;
pub use engine::ScoringEngine;
pub use registry::EngineRegistry;
pub use weights::{DynamicWeightCalculator, NudgeRule};
