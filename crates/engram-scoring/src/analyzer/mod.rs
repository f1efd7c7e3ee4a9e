//! Query and content analysis.

mod content;
mod requirement;

pub use content::{ConceptCombo, ContentAnalyzer, DimensionAnalysis};
pub use requirement::{RequirementAnalyzer, UserRequirement};
