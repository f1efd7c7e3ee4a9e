//! Search request configuration and result types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// How a result matched the query. Each type carries a ranking multiplier
/// reflecting how directly it ties the result to the query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchType {
    /// Direct substring or high word overlap.
    Exact,
    /// TF-IDF cosine similarity over the expanded query.
    Semantic,
    /// Tag overlap.
    Tag,
    /// Shared project context.
    Related,
}

impl MatchType {
    pub fn multiplier(self) -> f64 {
        match self {
            MatchType::Exact => 1.0,
            MatchType::Semantic => 0.8,
            MatchType::Tag => 0.6,
            MatchType::Related => 0.4,
        }
    }
}

/// Search request: query plus filters and limits.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub max_results: usize,
    /// Results below this final score are dropped.
    pub min_relevance: f64,
    /// Restrict to one project; also enables the related-by-project
    /// strategy.
    pub project: Option<String>,
    /// Require at least one of these tags when non-empty.
    pub tags: Vec<String>,
    pub created_after: Option<DateTime<Utc>>,
    pub created_before: Option<DateTime<Utc>>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_results: 10,
            min_relevance: 0.1,
            project: None,
            tags: Vec::new(),
            created_after: None,
            created_before: None,
        }
    }
}

/// One ranked search hit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult {
    pub memory_id: String,
    pub title: String,
    /// Final score after match-type multiplier and ranking boosts.
    pub score: f64,
    pub match_type: MatchType,
    /// Query terms (or tags) that produced the match, deduplicated.
    pub matched_terms: Vec<String>,
    /// Short content excerpt around the first matched term.
    pub context_snippet: String,
    pub project: String,
    pub tags: Vec<String>,
}

/// Index health and shape counters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchStatistics {
    pub memory_count: usize,
    pub vocabulary_size: usize,
    pub indexed_terms: usize,
    pub unique_projects: usize,
    pub unique_tags: usize,
    pub cached_searches: u64,
}
