//! Per-dimension content scoring.
//!
//! Pure with respect to the matrix: analysis reads effective weights and
//! reports the usage events it would generate, leaving the caller to commit
//! them. That keeps per-item analysis safe to run in parallel.

use std::sync::LazyLock;

use regex::Regex;

use engram_matrix::KeywordWeightMatrix;

/// Repeat occurrences of one keyword counted at most this many times.
const MAX_OCCURRENCES_COUNTED: usize = 3;
const PROXIMITY_BONUS_CAP: f64 = 5.0;
const STRUCTURE_BONUS_CAP: f64 = 4.0;
const COMBO_BONUS_CAP: f64 = 8.0;

static LIST_MARKER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^\s*[-*+]\s").expect("hardcoded pattern"));

/// A concept pair (or triple) that signals deep coverage of a dimension
/// when all parts co-occur in the content.
#[derive(Debug, Clone)]
pub struct ConceptCombo {
    pub dimension: String,
    /// Lowercased concepts that must all be present.
    pub concepts: Vec<String>,
    pub bonus: f64,
}

impl ConceptCombo {
    fn new(dimension: &str, concepts: &[&str], bonus: f64) -> Self {
        Self {
            dimension: dimension.to_string(),
            concepts: concepts.iter().map(|c| c.to_lowercase()).collect(),
            bonus,
        }
    }
}

/// Outcome of analyzing one item's text against one dimension.
#[derive(Debug, Clone, Default)]
pub struct DimensionAnalysis {
    pub raw_score: f64,
    pub max_score: f64,
    pub matched_keywords: Vec<String>,
    /// (keyword, effective weight at match time) pairs the caller should
    /// record as usage.
    pub usage_events: Vec<(String, f64)>,
}

/// Scores content against one dimension of the matrix: exact keyword
/// matches plus proximity, structure, density, and concept-combination
/// bonuses, capped at the dimension's max score.
#[derive(Debug)]
pub struct ContentAnalyzer {
    combos: Vec<ConceptCombo>,
}

impl ContentAnalyzer {
    pub fn with_combos(combos: Vec<ConceptCombo>) -> Self {
        Self { combos }
    }

    /// Combos tuned for the standard five-axis taxonomy.
    pub fn standard() -> Self {
        Self::with_combos(vec![
            ConceptCombo::new("entity_support", &["workflow", "step"], 3.0),
            ConceptCombo::new("entity_support", &["solution", "step"], 3.0),
            ConceptCombo::new("entity_support", &["solution", "service"], 3.0),
            ConceptCombo::new("api_enhancement", &["unified", "api"], 3.0),
            ConceptCombo::new("api_enhancement", &["service", "selector"], 2.0),
            ConceptCombo::new("api_enhancement", &["rest", "api"], 2.0),
            ConceptCombo::new("validation", &["validate", "dependency"], 2.0),
            ConceptCombo::new("validation", &["cross-type", "validation"], 3.0),
            ConceptCombo::new("mixed_type", &["mixed", "step"], 3.0),
            ConceptCombo::new("mixed_type", &["heterogeneous", "type"], 2.0),
        ])
    }

    /// Combos tuned for the extended seven-axis taxonomy.
    pub fn extended() -> Self {
        Self::with_combos(vec![
            ConceptCombo::new("workflow_integration", &["workflow", "step"], 3.0),
            ConceptCombo::new("workflow_integration", &["ordered", "steps"], 2.0),
            ConceptCombo::new("workflow_integration", &["solution", "step"], 3.0),
            ConceptCombo::new("solution_management", &["solution", "service"], 3.0),
            ConceptCombo::new("solution_management", &["solution", "reference"], 2.0),
            ConceptCombo::new("solution_management", &["mixed", "step"], 3.0),
            ConceptCombo::new("api_enhancement", &["unified", "api"], 3.0),
            ConceptCombo::new("api_enhancement", &["crud", "operations"], 2.0),
            ConceptCombo::new("validation_patterns", &["validate", "dependency"], 2.0),
            ConceptCombo::new("validation_patterns", &["cross-type", "validation"], 3.0),
            ConceptCombo::new("multi_type_operations", &["mixed", "batch"], 3.0),
        ])
    }

    /// Analyze `text` against one dimension. Empty text or a dimension with
    /// no matching keywords scores zero with an empty match list.
    pub fn analyze(
        &self,
        text: &str,
        dimension: &str,
        matrix: &KeywordWeightMatrix,
    ) -> DimensionAnalysis {
        let max_score = matrix.max_score(dimension);
        if text.is_empty() {
            return DimensionAnalysis {
                max_score,
                ..Default::default()
            };
        }
        let text_lower = text.to_lowercase();

        let mut exact = 0.0;
        let mut matched_keywords = Vec::new();
        let mut usage_events = Vec::new();
        // (byte position, keyword index), for the proximity pass.
        let mut positions: Vec<(usize, usize)> = Vec::new();
        let mut total_occurrences = 0usize;

        let mut keywords = matrix.keywords(dimension);
        keywords.sort();

        for keyword in keywords {
            let keyword_lower = keyword.to_lowercase();
            let matches: Vec<usize> = text_lower
                .match_indices(&keyword_lower)
                .map(|(pos, _)| pos)
                .collect();
            if matches.is_empty() {
                continue;
            }

            let weight = matrix.effective_weight(dimension, &keyword);
            let counted = matches.len().min(MAX_OCCURRENCES_COUNTED);
            exact += weight * counted as f64;
            total_occurrences += counted;

            let keyword_index = matched_keywords.len();
            for pos in matches {
                positions.push((pos, keyword_index));
            }
            usage_events.push((keyword.clone(), weight));
            matched_keywords.push(keyword);
        }

        if matched_keywords.is_empty() {
            return DimensionAnalysis {
                max_score,
                ..Default::default()
            };
        }

        let raw_score = (exact
            + self.proximity_bonus(&positions)
            + self.structure_bonus(text, dimension)
            + self.density_bonus(total_occurrences, text.len())
            + self.combo_bonus(&text_lower, dimension))
        .min(max_score);

        DimensionAnalysis {
            raw_score,
            max_score,
            matched_keywords,
            usage_events,
        }
    }

    /// Distinct keywords appearing close together reinforce each other:
    /// +2 under 50 chars apart, +1 under 100.
    fn proximity_bonus(&self, positions: &[(usize, usize)]) -> f64 {
        let mut sorted = positions.to_vec();
        sorted.sort_unstable();

        let mut bonus: f64 = 0.0;
        for pair in sorted.windows(2) {
            let ((a_pos, a_kw), (b_pos, b_kw)) = (pair[0], pair[1]);
            if a_kw == b_kw {
                continue;
            }
            let gap = b_pos - a_pos;
            if gap < 50 {
                bonus += 2.0;
            } else if gap < 100 {
                bonus += 1.0;
            }
        }
        bonus.min(PROXIMITY_BONUS_CAP)
    }

    /// Structural markers that correlate with a dimension: diagrams, code
    /// fences, and lists.
    fn structure_bonus(&self, text: &str, dimension: &str) -> f64 {
        let mut bonus: f64 = 0.0;
        if text.contains("classDiagram")
            && (dimension == "data_model" || dimension == "entity_support")
        {
            bonus += 3.0;
        }
        if text.contains("sequenceDiagram")
            && (dimension == "api_enhancement" || dimension == "workflow_integration")
        {
            bonus += 3.0;
        }
        if text.contains("```") {
            bonus += 2.0;
        }
        if LIST_MARKER_RE.is_match(text) {
            bonus += 1.0;
        }
        bonus.min(STRUCTURE_BONUS_CAP)
    }

    /// Match density per 100 characters of content.
    fn density_bonus(&self, occurrences: usize, text_len: usize) -> f64 {
        if text_len == 0 {
            return 0.0;
        }
        let per_100 = occurrences as f64 / (text_len as f64 / 100.0);
        if per_100 > 5.0 {
            3.0
        } else if per_100 > 3.0 {
            2.0
        } else if per_100 > 1.0 {
            1.0
        } else {
            0.0
        }
    }

    fn combo_bonus(&self, text_lower: &str, dimension: &str) -> f64 {
        let mut bonus: f64 = 0.0;
        for combo in self.combos.iter().filter(|c| c.dimension == dimension) {
            if combo.concepts.iter().all(|c| text_lower.contains(c)) {
                bonus += combo.bonus;
            }
        }
        bonus.min(COMBO_BONUS_CAP)
    }
}

impl Default for ContentAnalyzer {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_content_scores_zero() {
        let matrix = KeywordWeightMatrix::default();
        let analysis = ContentAnalyzer::standard().analyze("", "validation", &matrix);
        assert_eq!(analysis.raw_score, 0.0);
        assert!(analysis.matched_keywords.is_empty());
        assert!(analysis.usage_events.is_empty());
    }

    #[test]
    fn unmatched_content_scores_zero() {
        let matrix = KeywordWeightMatrix::default();
        let analysis =
            ContentAnalyzer::standard().analyze("completely unrelated prose", "validation", &matrix);
        assert_eq!(analysis.raw_score, 0.0);
        assert!(analysis.matched_keywords.is_empty());
    }

    #[test]
    fn matching_is_case_insensitive() {
        let matrix = KeywordWeightMatrix::default();
        let analysis =
            ContentAnalyzer::standard().analyze("We must VALIDATE everything", "validation", &matrix);
        assert!(analysis.raw_score > 0.0);
        assert_eq!(analysis.matched_keywords, vec!["validate".to_string()]);
    }

    #[test]
    fn repeated_occurrences_count_at_most_three_times() {
        let matrix = KeywordWeightMatrix::default();
        let analyzer = ContentAnalyzer::standard();
        let padding = "x".repeat(2000);

        let three = format!("validate validate validate {padding}");
        let ten = format!("{} {padding}", "validate ".repeat(10));
        let a3 = analyzer.analyze(&three, "validation", &matrix);
        let a10 = analyzer.analyze(&ten, "validation", &matrix);

        // Exact-match contribution is identical; only proximity between
        // distinct keywords could differ, and there is just one keyword here.
        assert!((a10.raw_score - a3.raw_score).abs() < 1e-9);
    }

    #[test]
    fn raw_score_never_exceeds_dimension_cap() {
        let matrix = KeywordWeightMatrix::default();
        let dense = "validate check verify exist validation constraint rule ".repeat(20);
        let analysis = ContentAnalyzer::standard().analyze(&dense, "validation", &matrix);
        assert!(analysis.raw_score <= matrix.max_score("validation"));
    }

    #[test]
    fn class_diagram_boosts_data_model_only() {
        let matrix = KeywordWeightMatrix::default();
        let analyzer = ContentAnalyzer::standard();
        let with_diagram = "schema design\nclassDiagram";
        let without = "schema design";

        let boosted = analyzer.analyze(with_diagram, "data_model", &matrix);
        let plain = analyzer.analyze(without, "data_model", &matrix);
        assert!(boosted.raw_score > plain.raw_score);

        // The same marker does nothing for validation.
        let v_boosted = analyzer.analyze("validate\nclassDiagram", "validation", &matrix);
        let v_plain = analyzer.analyze("validate", "validation", &matrix);
        let diff = v_boosted.raw_score - v_plain.raw_score;
        assert!(diff < 3.0, "unexpected diagram bonus: {diff}");
    }

    #[test]
    fn concept_combo_adds_bonus() {
        let matrix = KeywordWeightMatrix::default();
        let analyzer = ContentAnalyzer::standard();
        let padding = "y".repeat(1000);

        let combo = format!("mixed step handling {padding}");
        let solo = format!("mixed handling {padding}");
        let with_combo = analyzer.analyze(&combo, "mixed_type", &matrix);
        let without = analyzer.analyze(&solo, "mixed_type", &matrix);
        assert!(with_combo.raw_score > without.raw_score);
    }

    #[test]
    fn usage_events_cover_matched_keywords() {
        let matrix = KeywordWeightMatrix::default();
        let analysis = ContentAnalyzer::standard()
            .analyze("validate and check the constraint", "validation", &matrix);

        let event_keywords: Vec<&str> =
            analysis.usage_events.iter().map(|(k, _)| k.as_str()).collect();
        for keyword in &analysis.matched_keywords {
            assert!(event_keywords.contains(&keyword.as_str()));
        }
        for (_, weight) in &analysis.usage_events {
            assert!(*weight > 0.0);
        }
    }
}
