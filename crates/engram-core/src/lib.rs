//! # engram-core
//!
//! Foundation crate for the Engram memory relevance system.
//! Defines all shared types, models, errors, config, and constants.
//! Every other crate in the workspace depends on this.

pub mod config;
pub mod constants;
pub mod errors;
pub mod memory;
pub mod models;

// Re-export the most commonly used types at the crate root.
pub use config::{EngineConfig, LearningConfig};
pub use errors::{EngramError, EngramResult};
pub use memory::MemoryItem;
pub use models::{
    ChangeSource, ChangeType, DimensionScore, KeywordStats, MatrixChange, ScoringResult,
    UserFeedback,
};
