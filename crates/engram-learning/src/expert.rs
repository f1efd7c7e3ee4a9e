//! Expert annotations and change rollback.

use engram_core::models::{ChangeSource, ExpertAnnotation, MatrixChange};
use engram_matrix::KeywordWeightMatrix;

/// Minimum confidence for an expert annotation to be accepted.
const ANNOTATION_CONFIDENCE_FLOOR: f64 = 0.7;

/// Apply a curated weight suggestion. Annotations below the confidence
/// floor are rejected and leave the matrix untouched.
pub fn apply_annotation(matrix: &mut KeywordWeightMatrix, annotation: &ExpertAnnotation) -> bool {
    if annotation.confidence < ANNOTATION_CONFIDENCE_FLOOR {
        return false;
    }
    matrix.update_weight(
        &annotation.dimension,
        &annotation.keyword,
        annotation.suggested_weight,
        &annotation.reasoning,
        ChangeSource::ExpertAnnotation,
    );
    true
}

/// Roll back the named changes by applying their inverses, newest first.
/// Returns the number of changes undone.
pub fn rollback_changes(
    matrix: &mut KeywordWeightMatrix,
    changes: &[MatrixChange],
    change_ids: &[String],
) -> usize {
    let mut undone = 0;
    for change in changes.iter().rev() {
        if change_ids.contains(&change.change_id) {
            let inverse = change.inverted(format!("rollback of change {}", change.change_id));
            matrix.apply_change(&inverse);
            undone += 1;
        }
    }
    undone
}
