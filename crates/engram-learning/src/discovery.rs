//! Automatic keyword discovery.
//!
//! Takes candidate tokens bucketed by the requirement analyzer, suggests a
//! home dimension via keyword-family heuristics, derives a starting weight
//! and a confidence, and admits candidates that clear the matrix's
//! discovery threshold.

use serde::{Deserialize, Serialize};
use tracing::debug;

use engram_core::constants::MAX_DISCOVERY_RECOMMENDATIONS;
use engram_core::models::DiscoveredCandidates;
use engram_matrix::KeywordWeightMatrix;

/// A scored suggestion for admitting one keyword.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeywordRecommendation {
    pub keyword: String,
    pub dimension: String,
    pub suggested_weight: f64,
    pub confidence: f64,
    /// Candidate bucket the keyword came from.
    pub category: String,
    pub reason: String,
}

/// Proposes and conditionally admits new keywords found in the corpus.
#[derive(Debug, Default)]
pub struct KeywordDiscoveryModule;

const API_FAMILY: &[&str] = &["api", "endpoint", "controller", "service", "rest"];
const ENTITY_FAMILY: &[&str] = &["entity", "model", "workflow", "solution", "rule"];
const DATA_FAMILY: &[&str] = &["dto", "request", "response", "schema", "structure"];
const VALIDATION_FAMILY: &[&str] = &["valid", "check", "verify", "constraint"];
const MIXED_FAMILY: &[&str] = &["mixed", "multi", "batch", "selector", "routing"];

const IMPORTANT_STEMS: &[&str] = &["unified", "generic", "solution", "workflow"];
const SERVICE_SUFFIXES: &[&str] = &["Service", "Controller", "Manager"];
const MODEL_SUFFIXES: &[&str] = &["DTO", "Entity", "Model"];
const TECH_SUFFIXES: &[&str] = &["Service", "Controller", "DTO", "Entity", "API"];

fn has_inner_uppercase(keyword: &str) -> bool {
    keyword.chars().skip(1).any(|c| c.is_uppercase())
}

impl KeywordDiscoveryModule {
    pub fn new() -> Self {
        Self
    }

    /// Suggest a home dimension for a keyword, or None when no family fits.
    pub fn suggest_dimension(&self, keyword: &str) -> Option<&'static str> {
        let lower = keyword.to_lowercase();
        if API_FAMILY.iter().any(|term| lower.contains(term)) {
            Some("api_enhancement")
        } else if ENTITY_FAMILY.iter().any(|term| lower.contains(term)) {
            Some("entity_support")
        } else if DATA_FAMILY.iter().any(|term| lower.contains(term)) {
            Some("data_model")
        } else if VALIDATION_FAMILY.iter().any(|term| lower.contains(term)) {
            Some("validation")
        } else if MIXED_FAMILY.iter().any(|term| lower.contains(term)) {
            Some("mixed_type")
        } else {
            None
        }
    }

    /// Starting weight for a candidate: base 3.0 with boosts for important
    /// stems, technical suffixes, length, and CamelCase. Capped to [1, 8].
    pub fn suggested_weight(&self, keyword: &str) -> f64 {
        let mut weight: f64 = 3.0;
        let lower = keyword.to_lowercase();

        if IMPORTANT_STEMS.iter().any(|stem| lower.contains(stem)) {
            weight += 2.0;
        }
        if SERVICE_SUFFIXES.iter().any(|s| keyword.ends_with(s)) {
            weight += 1.5;
        }
        if MODEL_SUFFIXES.iter().any(|s| keyword.ends_with(s)) {
            weight += 1.0;
        }
        if keyword.len() > 10 {
            weight += 0.5;
        }
        if has_inner_uppercase(keyword) {
            weight += 0.5;
        }

        weight.clamp(1.0, 8.0)
    }

    /// Admission confidence: base 0.5 plus similarity to an existing keyword
    /// in the target dimension, technical suffix, and CamelCase. Capped 0.95.
    pub fn confidence(
        &self,
        keyword: &str,
        dimension: &str,
        matrix: &KeywordWeightMatrix,
    ) -> f64 {
        let mut confidence: f64 = 0.5;
        let lower = keyword.to_lowercase();

        let similar_exists = matrix.keywords(dimension).iter().any(|existing| {
            let existing_lower = existing.to_lowercase();
            existing_lower.contains(&lower) || lower.contains(&existing_lower)
        });
        if similar_exists {
            confidence += 0.2;
        }
        if TECH_SUFFIXES.iter().any(|s| keyword.ends_with(s)) {
            confidence += 0.2;
        }
        if has_inner_uppercase(keyword) {
            confidence += 0.1;
        }

        confidence.min(0.95)
    }

    /// Build recommendations for candidates with confidence above 0.5,
    /// sorted descending, truncated to the top 10.
    pub fn recommend(
        &self,
        candidates: &DiscoveredCandidates,
        matrix: &KeywordWeightMatrix,
    ) -> Vec<KeywordRecommendation> {
        let mut recommendations = Vec::new();

        for (keyword, category) in candidates.iter_with_category() {
            let Some(dimension) = self.suggest_dimension(keyword) else {
                continue;
            };
            // Already in the matrix, under any dimension: nothing to
            // discover.
            if matrix.dimension_of(keyword).is_some() {
                continue;
            }
            let confidence = self.confidence(keyword, dimension, matrix);
            if confidence <= 0.5 {
                continue;
            }
            recommendations.push(KeywordRecommendation {
                keyword: keyword.to_string(),
                dimension: dimension.to_string(),
                suggested_weight: self.suggested_weight(keyword),
                confidence,
                category: category.to_string(),
                reason: format!("discovered from {category}, suggested for {dimension}"),
            });
        }

        recommendations.sort_by(|a, b| {
            b.confidence
                .partial_cmp(&a.confidence)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        recommendations.truncate(MAX_DISCOVERY_RECOMMENDATIONS);
        recommendations
    }

    /// Recommend and admit qualifying candidates into the matrix. Returns
    /// the recommendations that were actually admitted.
    pub fn discover_and_admit(
        &self,
        candidates: &DiscoveredCandidates,
        matrix: &mut KeywordWeightMatrix,
    ) -> Vec<KeywordRecommendation> {
        let recommendations = self.recommend(candidates, matrix);
        let mut admitted = Vec::new();

        for rec in recommendations {
            if matrix.add_discovered_keyword(
                &rec.dimension,
                &rec.keyword,
                rec.suggested_weight,
                rec.confidence,
            ) {
                admitted.push(rec);
            }
        }

        if !admitted.is_empty() {
            debug!(count = admitted.len(), "admitted discovered keywords");
        }
        admitted
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dimension_suggestions_follow_families() {
        let module = KeywordDiscoveryModule::new();
        assert_eq!(
            module.suggest_dimension("PaymentController"),
            Some("api_enhancement")
        );
        assert_eq!(
            module.suggest_dimension("WorkflowEngine"),
            Some("entity_support")
        );
        assert_eq!(module.suggest_dimension("OrderDTO"), Some("data_model"));
        assert_eq!(module.suggest_dimension("validator"), Some("validation"));
        assert_eq!(module.suggest_dimension("BatchRunner"), Some("mixed_type"));
        assert_eq!(module.suggest_dimension("zzz"), None);
    }

    #[test]
    fn suggested_weight_stays_in_bounds() {
        let module = KeywordDiscoveryModule::new();
        // Stacks every boost: stem, suffix, length, CamelCase.
        let heavy = module.suggested_weight("UnifiedWorkflowSolutionService");
        assert!(heavy <= 8.0);
        let light = module.suggested_weight("xyz");
        assert!(light >= 1.0);
    }

    #[test]
    fn confidence_capped_below_one() {
        let module = KeywordDiscoveryModule::new();
        let matrix = KeywordWeightMatrix::default();
        let c = module.confidence("SolutionService", "entity_support", &matrix);
        assert!(c <= 0.95);
        assert!(c > 0.5);
    }

    #[test]
    fn recommend_skips_existing_keywords() {
        let module = KeywordDiscoveryModule::new();
        let matrix = KeywordWeightMatrix::default();
        let candidates = DiscoveredCandidates {
            camel_case: vec!["SolutionService".to_string()],
            ..Default::default()
        };
        // SolutionService is seeded in entity_support already, even though
        // the family heuristics would suggest api_enhancement for it.
        assert_eq!(
            module.suggest_dimension("SolutionService"),
            Some("api_enhancement")
        );
        let recs = module.recommend(&candidates, &matrix);
        assert!(recs.iter().all(|r| r.keyword != "SolutionService"));
    }

    #[test]
    fn admit_respects_threshold() {
        let module = KeywordDiscoveryModule::new();
        let mut matrix = KeywordWeightMatrix::default();
        let candidates = DiscoveredCandidates {
            camel_case: vec!["WorkflowStepProcessor".to_string()],
            ..Default::default()
        };
        let admitted = module.discover_and_admit(&candidates, &mut matrix);
        for rec in &admitted {
            assert!(rec.confidence >= matrix.learning().discovery_threshold);
        }
    }
}
