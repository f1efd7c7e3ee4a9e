//! Query-conditioned dimension weights.
//!
//! Each taxonomy carries a base weight distribution summing to 100. Nudge
//! rules shift the distribution toward dimensions the query's features
//! emphasize, then the result is floored at zero and renormalized so it
//! always sums to exactly 100.

use std::collections::HashMap;

use engram_matrix::DimensionSet;

use crate::analyzer::UserRequirement;

/// One conditional shift of the weight distribution: when any trigger term
/// appears among the query features, each named dimension moves by its delta.
#[derive(Debug, Clone)]
pub struct NudgeRule {
    pub triggers: Vec<String>,
    pub deltas: Vec<(String, f64)>,
}

impl NudgeRule {
    fn new(triggers: &[&str], deltas: &[(&str, f64)]) -> Self {
        Self {
            triggers: triggers.iter().map(|t| t.to_lowercase()).collect(),
            deltas: deltas.iter().map(|(d, v)| (d.to_string(), *v)).collect(),
        }
    }
}

/// Computes the per-query dimension weight distribution.
#[derive(Debug)]
pub struct DynamicWeightCalculator {
    base_weights: HashMap<String, f64>,
    rules: Vec<NudgeRule>,
}

impl DynamicWeightCalculator {
    pub fn new(set: &DimensionSet, rules: Vec<NudgeRule>) -> Self {
        let base_weights = set
            .specs()
            .iter()
            .map(|spec| (spec.name.clone(), spec.base_weight_pct))
            .collect();
        Self {
            base_weights,
            rules,
        }
    }

    /// Calculator for the standard five-axis taxonomy.
    pub fn standard() -> Self {
        Self::new(
            &DimensionSet::standard(),
            vec![
                NudgeRule::new(
                    &["workflow", "step", "ordered", "flow", "process"],
                    &[
                        ("entity_support", 10.0),
                        ("mixed_type", 5.0),
                        ("api_enhancement", -5.0),
                        ("data_model", -5.0),
                    ],
                ),
                NudgeRule::new(
                    &["solution", "mixed", "heterogeneous", "multi-type"],
                    &[
                        ("entity_support", 10.0),
                        ("mixed_type", 5.0),
                        ("data_model", -5.0),
                        ("api_enhancement", -5.0),
                    ],
                ),
                NudgeRule::new(
                    &["validate", "check", "verify", "validation", "dependency"],
                    &[
                        ("validation", 10.0),
                        ("entity_support", 5.0),
                        ("api_enhancement", -5.0),
                        ("data_model", -5.0),
                    ],
                ),
                NudgeRule::new(
                    &["api", "endpoint", "controller", "rest", "crud"],
                    &[
                        ("api_enhancement", 8.0),
                        ("validation", 2.0),
                        ("data_model", -5.0),
                        ("mixed_type", -5.0),
                    ],
                ),
            ],
        )
    }

    /// Calculator for the extended seven-axis taxonomy.
    pub fn extended() -> Self {
        Self::new(
            &DimensionSet::extended(),
            vec![
                NudgeRule::new(
                    &["workflow", "step", "ordered", "orchestration"],
                    &[
                        ("workflow_integration", 10.0),
                        ("solution_management", 5.0),
                        ("api_enhancement", -5.0),
                        ("entity_support", -5.0),
                        ("system_architecture", -5.0),
                    ],
                ),
                NudgeRule::new(
                    &["solution", "reference", "mixed"],
                    &[
                        ("solution_management", 10.0),
                        ("multi_type_operations", 5.0),
                        ("entity_support", -5.0),
                        ("api_enhancement", -5.0),
                        ("system_architecture", -5.0),
                    ],
                ),
                NudgeRule::new(
                    &["validate", "check", "verify", "dependency"],
                    &[
                        ("validation_patterns", 10.0),
                        ("workflow_integration", 2.0),
                        ("api_enhancement", -6.0),
                        ("entity_support", -3.0),
                        ("system_architecture", -3.0),
                    ],
                ),
                NudgeRule::new(
                    &["api", "endpoint", "controller", "rest", "crud", "unified"],
                    &[
                        ("api_enhancement", 8.0),
                        ("validation_patterns", 2.0),
                        ("entity_support", -5.0),
                        ("multi_type_operations", -5.0),
                    ],
                ),
            ],
        )
    }

    /// Compute the weight distribution for one query. Always sums to 100,
    /// including for a query with no extracted features (the base
    /// distribution passes through unchanged).
    pub fn calculate(&self, requirement: &UserRequirement) -> HashMap<String, f64> {
        let haystack = Self::feature_haystack(requirement);
        let mut weights = self.base_weights.clone();

        for rule in &self.rules {
            if rule.triggers.iter().any(|t| haystack.contains(t.as_str())) {
                for (dimension, delta) in &rule.deltas {
                    *weights.entry(dimension.clone()).or_insert(0.0) += delta;
                }
            }
        }

        for weight in weights.values_mut() {
            if *weight < 0.0 {
                *weight = 0.0;
            }
        }

        let total: f64 = weights.values().sum();
        if total > 0.0 {
            for weight in weights.values_mut() {
                *weight = *weight / total * 100.0;
            }
        } else if !weights.is_empty() {
            let share = 100.0 / weights.len() as f64;
            for weight in weights.values_mut() {
                *weight = share;
            }
        }
        weights
    }

    fn feature_haystack(requirement: &UserRequirement) -> String {
        let mut parts: Vec<String> = vec![requirement.text.to_lowercase()];
        parts.extend(requirement.api_operations.iter().cloned());
        parts.extend(requirement.entities.iter().map(|e| e.to_lowercase()));
        parts.extend(requirement.functionalities.iter().cloned());
        parts.extend(requirement.constraints.iter().cloned());
        parts.join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::RequirementAnalyzer;

    fn sum(weights: &HashMap<String, f64>) -> f64 {
        weights.values().sum()
    }

    #[test]
    fn featureless_query_returns_base_distribution() {
        let calculator = DynamicWeightCalculator::standard();
        let req = RequirementAnalyzer::new().extract("");
        let weights = calculator.calculate(&req);

        assert!((sum(&weights) - 100.0).abs() < 1e-9);
        assert!((weights["api_enhancement"] - 25.0).abs() < 1e-9);
        assert!((weights["validation"] - 15.0).abs() < 1e-9);
    }

    #[test]
    fn validation_query_shifts_weight_toward_validation() {
        let calculator = DynamicWeightCalculator::standard();
        let req = RequirementAnalyzer::new().extract("validate the input rules");
        let weights = calculator.calculate(&req);

        assert!((sum(&weights) - 100.0).abs() < 1e-9);
        assert!(weights["validation"] > 15.0);
        assert!(weights["api_enhancement"] < 25.0);
    }

    #[test]
    fn stacked_rules_still_sum_to_one_hundred() {
        let calculator = DynamicWeightCalculator::standard();
        let req = RequirementAnalyzer::new()
            .extract("create a unified API endpoint to validate mixed Workflow steps");
        let weights = calculator.calculate(&req);
        assert!((sum(&weights) - 100.0).abs() < 1e-9);
        for weight in weights.values() {
            assert!(*weight >= 0.0);
        }
    }

    #[test]
    fn extended_calculator_covers_seven_dimensions() {
        let calculator = DynamicWeightCalculator::extended();
        let req = RequirementAnalyzer::new().extract("orchestration of workflow steps");
        let weights = calculator.calculate(&req);

        assert_eq!(weights.len(), 7);
        assert!((sum(&weights) - 100.0).abs() < 1e-9);
        assert!(weights["workflow_integration"] > 20.0);
    }
}
