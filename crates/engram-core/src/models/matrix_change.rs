use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Kind of mutation applied to the keyword weight matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeType {
    AddKeyword,
    UpdateWeight,
    RemoveKeyword,
    AddDimension,
    AutoDiscovery,
}

/// Where a matrix mutation originated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeSource {
    UserFeedback,
    ExpertAnnotation,
    AutoLearning,
    KeywordDiscovery,
    Stabilization,
}

/// Append-only audit record of one matrix mutation.
///
/// The matrix's current state must be reproducible by replaying changes
/// from its initial snapshot, so every mutator emits exactly one of these.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatrixChange {
    pub change_id: String,
    pub timestamp: DateTime<Utc>,
    pub change_type: ChangeType,
    pub dimension: String,
    pub keyword: String,
    pub old_value: Option<f64>,
    pub new_value: Option<f64>,
    pub reason: String,
    pub source: ChangeSource,
    pub confidence: f64,
}

impl MatrixChange {
    pub fn new(
        change_type: ChangeType,
        dimension: impl Into<String>,
        keyword: impl Into<String>,
        old_value: Option<f64>,
        new_value: Option<f64>,
        reason: impl Into<String>,
        source: ChangeSource,
    ) -> Self {
        Self {
            change_id: uuid::Uuid::new_v4().to_string(),
            timestamp: Utc::now(),
            change_type,
            dimension: dimension.into(),
            keyword: keyword.into(),
            old_value,
            new_value,
            reason: reason.into(),
            source,
            confidence: 0.0,
        }
    }

    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = confidence;
        self
    }

    /// The inverse change, used for rollback.
    pub fn inverted(&self, reason: impl Into<String>) -> Self {
        Self {
            change_id: uuid::Uuid::new_v4().to_string(),
            timestamp: Utc::now(),
            change_type: self.change_type,
            dimension: self.dimension.clone(),
            keyword: self.keyword.clone(),
            old_value: self.new_value,
            new_value: self.old_value,
            reason: reason.into(),
            source: self.source,
            confidence: self.confidence,
        }
    }
}
