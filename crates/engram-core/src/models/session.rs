use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Audit record appended after every scoring call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoringSession {
    pub session_id: String,
    pub timestamp: DateTime<Utc>,
    pub query: String,
    pub api_operations: Vec<String>,
    pub entities: Vec<String>,
    pub functionalities: Vec<String>,
    pub constraints: Vec<String>,
    /// Dimension weight distribution used for this session.
    pub calculated_weights: HashMap<String, f64>,
    pub results_count: usize,
    pub top_score: f64,
    /// Matrix usage counter at session end.
    pub matrix_usage_count: u64,
    pub discovered_keywords_count: u64,
}
