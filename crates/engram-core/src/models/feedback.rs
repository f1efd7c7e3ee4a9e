use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Explicit user feedback on one ranked result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserFeedback {
    pub feedback_id: String,
    pub memory_id: String,
    pub query: String,
    /// 1 (irrelevant) to 5 (highly relevant).
    pub rating: u8,
    /// Matched keywords snapshot at scoring time.
    pub matched_keywords: Vec<String>,
    pub comment: String,
    pub timestamp: DateTime<Utc>,
}

impl UserFeedback {
    pub fn new(
        memory_id: impl Into<String>,
        query: impl Into<String>,
        rating: u8,
        matched_keywords: Vec<String>,
        comment: impl Into<String>,
    ) -> Self {
        Self {
            feedback_id: uuid::Uuid::new_v4().to_string(),
            memory_id: memory_id.into(),
            query: query.into(),
            rating: rating.clamp(1, 5),
            matched_keywords,
            comment: comment.into(),
            timestamp: Utc::now(),
        }
    }
}

/// A curated weight suggestion from a domain expert.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExpertAnnotation {
    pub dimension: String,
    pub keyword: String,
    pub suggested_weight: f64,
    pub reasoning: String,
    /// Annotations below 0.7 are rejected.
    pub confidence: f64,
}
