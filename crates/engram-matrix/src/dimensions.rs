//! Seeded dimension sets.
//!
//! A dimension is a named relevance axis with its own keyword seed weights,
//! score cap, and base share of the 100-point weight budget. The set is
//! pluggable: the standard five-axis set and the extended seven-axis set
//! cover the two shipped taxonomies, and callers can supply their own.

/// One relevance axis and its seed data.
#[derive(Debug, Clone)]
pub struct DimensionSpec {
    pub name: String,
    /// (keyword, seed weight) pairs. Weights are in [0, 10].
    pub seed_keywords: Vec<(String, f64)>,
    /// Cap on the additive raw score for this axis.
    pub max_score: f64,
    /// Base percentage of the dynamic weight budget.
    pub base_weight_pct: f64,
}

impl DimensionSpec {
    pub fn new(
        name: &str,
        seed_keywords: &[(&str, f64)],
        max_score: f64,
        base_weight_pct: f64,
    ) -> Self {
        Self {
            name: name.to_string(),
            seed_keywords: seed_keywords
                .iter()
                .map(|(k, w)| (k.to_string(), *w))
                .collect(),
            max_score,
            base_weight_pct,
        }
    }
}

/// A full taxonomy of relevance axes.
#[derive(Debug, Clone)]
pub struct DimensionSet {
    specs: Vec<DimensionSpec>,
}

impl DimensionSet {
    pub fn new(specs: Vec<DimensionSpec>) -> Self {
        Self { specs }
    }

    pub fn specs(&self) -> &[DimensionSpec] {
        &self.specs
    }

    /// The standard five-axis taxonomy.
    pub fn standard() -> Self {
        Self::new(vec![
            DimensionSpec::new(
                "api_enhancement",
                &[
                    ("controller", 5.0),
                    ("api", 4.0),
                    ("endpoint", 4.0),
                    ("POST", 3.0),
                    ("GET", 3.0),
                    ("unified", 6.0),
                    ("enhance", 5.0),
                    ("create", 3.0),
                    ("update", 3.0),
                    ("rest", 4.0),
                    ("service", 4.0),
                    ("microservice", 6.0),
                    ("architecture", 5.0),
                ],
                25.0,
                25.0,
            ),
            DimensionSpec::new(
                "entity_support",
                &[
                    ("Solution", 10.0),
                    ("Rule", 6.0),
                    ("Prompt", 4.0),
                    ("Workflow", 6.0),
                    ("SolutionService", 8.0),
                    ("RuleService", 6.0),
                    ("GenericService", 7.0),
                    ("entity", 5.0),
                    ("model", 4.0),
                    ("class", 3.0),
                ],
                25.0,
                25.0,
            ),
            DimensionSpec::new(
                "data_model",
                &[
                    ("DTO", 6.0),
                    ("Entity", 5.0),
                    ("Model", 4.0),
                    ("classDiagram", 8.0),
                    ("UnifiedDTO", 8.0),
                    ("Response", 4.0),
                    ("Request", 4.0),
                    ("schema", 5.0),
                    ("structure", 4.0),
                    ("design", 3.0),
                ],
                20.0,
                20.0,
            ),
            DimensionSpec::new(
                "validation",
                &[
                    ("validate", 8.0),
                    ("check", 5.0),
                    ("verify", 5.0),
                    ("exist", 6.0),
                    ("IdGenerator", 7.0),
                    ("validateFormat", 8.0),
                    ("validation", 6.0),
                    ("constraint", 5.0),
                    ("rule", 4.0),
                ],
                15.0,
                15.0,
            ),
            DimensionSpec::new(
                "mixed_type",
                &[
                    ("mixed", 10.0),
                    ("batch", 6.0),
                    ("multiple", 5.0),
                    ("prefix", 8.0),
                    ("selector", 7.0),
                    ("routing", 6.0),
                    ("polymorphic", 7.0),
                    ("hybrid", 6.0),
                    ("heterogeneous", 5.0),
                ],
                15.0,
                15.0,
            ),
        ])
    }

    /// The extended seven-axis taxonomy with workflow and solution axes
    /// split out from entity support.
    pub fn extended() -> Self {
        Self::new(vec![
            DimensionSpec::new(
                "api_enhancement",
                &[
                    ("controller", 5.0),
                    ("api", 4.0),
                    ("endpoint", 4.0),
                    ("unified", 6.0),
                    ("enhance", 5.0),
                    ("rest", 4.0),
                    ("crud", 5.0),
                    ("service", 4.0),
                ],
                20.0,
                20.0,
            ),
            DimensionSpec::new(
                "entity_support",
                &[
                    ("Solution", 8.0),
                    ("Rule", 6.0),
                    ("Prompt", 4.0),
                    ("entity", 5.0),
                    ("model", 4.0),
                ],
                15.0,
                15.0,
            ),
            DimensionSpec::new(
                "workflow_integration",
                &[
                    ("Workflow", 8.0),
                    ("step", 6.0),
                    ("ordered", 5.0),
                    ("flow", 4.0),
                    ("process", 4.0),
                    ("orchestration", 6.0),
                ],
                20.0,
                20.0,
            ),
            DimensionSpec::new(
                "solution_management",
                &[
                    ("Solution", 10.0),
                    ("SolutionService", 8.0),
                    ("reference", 5.0),
                    ("SolutionValidationService", 8.0),
                ],
                15.0,
                15.0,
            ),
            DimensionSpec::new(
                "validation_patterns",
                &[
                    ("validate", 8.0),
                    ("check", 5.0),
                    ("verify", 5.0),
                    ("validation", 6.0),
                    ("CrossTypeValidator", 8.0),
                    ("dependency", 5.0),
                ],
                15.0,
                15.0,
            ),
            DimensionSpec::new(
                "multi_type_operations",
                &[
                    ("mixed", 10.0),
                    ("batch", 6.0),
                    ("multi-type", 8.0),
                    ("heterogeneous", 5.0),
                    ("batch-processing", 7.0),
                ],
                10.0,
                10.0,
            ),
            DimensionSpec::new(
                "system_architecture",
                &[
                    ("architecture", 5.0),
                    ("microservice", 6.0),
                    ("layered", 4.0),
                    ("design", 3.0),
                ],
                5.0,
                5.0,
            ),
        ])
    }
}

impl Default for DimensionSet {
    fn default() -> Self {
        Self::standard()
    }
}
