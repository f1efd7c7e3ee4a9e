//! Shared model structs produced and consumed across the workspace.

mod candidates;
mod feedback;
mod keyword_stats;
mod matrix_change;
mod reports;
mod scoring_result;
mod session;

pub use candidates::DiscoveredCandidates;
pub use feedback::{ExpertAnnotation, UserFeedback};
pub use keyword_stats::KeywordStats;
pub use matrix_change::{ChangeSource, ChangeType, MatrixChange};
pub use reports::{
    DimensionEvolution, KeywordEvolutionReport, KeywordSummary, LearningStatistics,
};
pub use scoring_result::{DimensionScore, ScoringResult};
pub use session::ScoringSession;
