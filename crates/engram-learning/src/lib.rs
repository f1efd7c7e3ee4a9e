//! # engram-learning
//!
//! Self-learning behaviors layered over the weight matrix: automatic
//! keyword discovery, per-feedback weight nudges, momentum-smoothed batch
//! learning, expert annotations with rollback, and periodic stabilization
//! of mature keywords.

pub mod discovery;
pub mod expert;
pub mod feedback;
pub mod stabilizer;

pub use discovery::{KeywordDiscoveryModule, KeywordRecommendation};
pub use expert::{apply_annotation, rollback_changes};
pub use feedback::{BatchFeedbackLearner, FeedbackLearner};
pub use stabilizer::Stabilizer;
