//! Query requirement extraction.
//!
//! Pulls structured features out of a free-text query: API operations,
//! entity names, functionality verbs, and implied constraints. Also mines
//! arbitrary text for discovery candidates, bucketed by token shape.

use std::collections::BTreeSet;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use engram_core::models::DiscoveredCandidates;

static API_OPERATION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(POST|GET|PUT|DELETE|PATCH|create|update|delete|query|search|fetch|list|retrieve)\b",
    )
    .expect("hardcoded pattern")
});

static ENTITY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(Solution|Rule|Prompt|Workflow|[A-Z][a-z]+(?:[A-Z][a-z0-9]+)+)\b")
        .expect("hardcoded pattern")
});

static FUNCTIONALITY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(validate|verify|check|enhance|optimize|implement|design|support|manage|integrate|unify|route|batch|process)\b",
    )
    .expect("hardcoded pattern")
});

static TOKEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b[A-Za-z][A-Za-z0-9_-]{2,}\b").expect("hardcoded pattern"));

const TECH_SUFFIXES: &[&str] = &["API", "Service", "Controller", "DTO", "Entity", "Model"];

const STOP_WORDS: &[&str] = &[
    "the", "and", "for", "with", "that", "this", "from", "have", "has", "was", "were", "are",
    "will", "would", "should", "could", "can", "may", "not", "but", "all", "any", "each", "also",
    "into", "over", "then", "than", "when", "where", "which", "while", "about", "after", "before",
    "between", "both", "does", "how", "its", "more", "most", "other", "some", "such", "only",
    "out", "very", "use", "used", "using",
];

/// Structured features extracted from one query.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserRequirement {
    pub text: String,
    /// Lowercased HTTP verbs and CRUD terms.
    pub api_operations: Vec<String>,
    /// Entity names and CamelCase types, original casing.
    pub entities: Vec<String>,
    /// Lowercased functionality verbs.
    pub functionalities: Vec<String>,
    /// Implied constraint tags (validation, error_handling, persistence).
    pub constraints: Vec<String>,
}

/// Extracts structured requirements and discovery candidates from text.
#[derive(Debug, Default)]
pub struct RequirementAnalyzer;

fn has_inner_uppercase(token: &str) -> bool {
    token.chars().skip(1).any(|c| c.is_uppercase())
}

impl RequirementAnalyzer {
    pub fn new() -> Self {
        Self
    }

    /// Extract requirements from a query. Empty or feature-free text yields
    /// empty feature lists, never an error.
    pub fn extract(&self, text: &str) -> UserRequirement {
        let api_operations: BTreeSet<String> = API_OPERATION_RE
            .find_iter(text)
            .map(|m| m.as_str().to_lowercase())
            .collect();
        let entities: BTreeSet<String> = ENTITY_RE
            .find_iter(text)
            .map(|m| m.as_str().to_string())
            .collect();
        let functionalities: BTreeSet<String> = FUNCTIONALITY_RE
            .find_iter(text)
            .map(|m| m.as_str().to_lowercase())
            .collect();

        let lower = text.to_lowercase();
        let mut constraints = Vec::new();
        if lower.contains("valid") {
            constraints.push("validation".to_string());
        }
        if lower.contains("error") {
            constraints.push("error_handling".to_string());
        }
        if lower.contains("persist") {
            constraints.push("persistence".to_string());
        }

        UserRequirement {
            text: text.to_string(),
            api_operations: api_operations.into_iter().collect(),
            entities: entities.into_iter().collect(),
            functionalities: functionalities.into_iter().collect(),
            constraints,
        }
    }

    /// Mine text for keyword discovery candidates, bucketed by token shape.
    /// Stop words and short tokens are dropped; each bucket is deduplicated
    /// and sorted.
    pub fn discover_potential_keywords(&self, text: &str) -> DiscoveredCandidates {
        let mut technical_terms = BTreeSet::new();
        let mut compound_words = BTreeSet::new();
        let mut camel_case = BTreeSet::new();
        let mut hyphenated = BTreeSet::new();

        for token in TOKEN_RE.find_iter(text).map(|m| m.as_str()) {
            if STOP_WORDS.contains(&token.to_lowercase().as_str()) {
                continue;
            }
            if token.contains('-') {
                hyphenated.insert(token.to_string());
            } else if TECH_SUFFIXES.iter().any(|s| token.ends_with(s) && token.len() > s.len()) {
                technical_terms.insert(token.to_string());
            } else if has_inner_uppercase(token) {
                camel_case.insert(token.to_string());
            } else if token.contains('_') || token.len() >= 12 {
                compound_words.insert(token.to_string());
            }
        }

        DiscoveredCandidates {
            technical_terms: technical_terms.into_iter().collect(),
            compound_words: compound_words.into_iter().collect(),
            camel_case: camel_case.into_iter().collect(),
            hyphenated: hyphenated.into_iter().collect(),
        }
    }
}
