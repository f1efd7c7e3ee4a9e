//! JSON snapshot persistence for the weight matrix.
//!
//! Flat, explicitly-triggered save/load. Loading is lenient by default: a
//! malformed snapshot falls back to a freshly seeded matrix. Strict mode
//! validates the schema version and fails closed.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

use engram_core::constants::SNAPSHOT_SCHEMA_VERSION;
use engram_core::errors::SnapshotError;
use engram_core::models::{KeywordStats, ScoringSession};
use engram_core::{EngramError, EngramResult, LearningConfig};

use crate::matrix::{DiscoveryRecord, KeywordWeightMatrix};

/// How strictly to treat a bad snapshot on load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadMode {
    /// Malformed snapshot → freshly seeded default matrix (interactive
    /// tooling default).
    Lenient,
    /// Malformed snapshot → error, fail closed.
    Strict,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SnapshotMetadata {
    pub total_keywords: usize,
    pub total_usage_count: u64,
    pub discovered_keywords_count: u64,
}

/// Serialized form of a matrix plus the engine's session history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatrixSnapshot {
    pub version: String,
    pub created_at: DateTime<Utc>,
    pub matrix: HashMap<String, HashMap<String, f64>>,
    pub metadata: SnapshotMetadata,
    pub max_scores: HashMap<String, f64>,
    pub keyword_stats: HashMap<String, KeywordStats>,
    pub learning_parameters: LearningConfig,
    #[serde(default)]
    pub scoring_history: Vec<ScoringSession>,
    #[serde(default)]
    pub discovered_keywords_log: Vec<DiscoveryRecord>,
}

impl MatrixSnapshot {
    /// Capture the current matrix state together with the engine's
    /// scoring history.
    pub fn capture(matrix: &KeywordWeightMatrix, scoring_history: &[ScoringSession]) -> Self {
        Self {
            version: matrix.version().to_string(),
            created_at: matrix.created_at(),
            matrix: matrix.weights_table().clone(),
            metadata: SnapshotMetadata {
                total_keywords: matrix.total_keywords(),
                total_usage_count: matrix.total_usage(),
                discovered_keywords_count: matrix.discovered_count(),
            },
            max_scores: matrix.max_scores_table().clone(),
            keyword_stats: matrix.stats_table().clone(),
            learning_parameters: matrix.learning().clone(),
            scoring_history: scoring_history.to_vec(),
            discovered_keywords_log: matrix.discovery_log().to_vec(),
        }
    }

    /// Write the snapshot to disk. Synchronous and explicit; a failed write
    /// surfaces as an error the caller must detect and retry.
    pub fn write_to(&self, path: &Path) -> EngramResult<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json).map_err(|e| {
            EngramError::Snapshot(SnapshotError::WriteFailed {
                reason: e.to_string(),
            })
        })
    }

    /// Read and validate a snapshot from disk.
    pub fn read_from(path: &Path) -> EngramResult<Self> {
        let raw = fs::read_to_string(path)?;
        let snapshot: Self =
            serde_json::from_str(&raw).map_err(|e| SnapshotError::Malformed {
                reason: e.to_string(),
            })?;
        if snapshot.version != SNAPSHOT_SCHEMA_VERSION {
            return Err(SnapshotError::UnsupportedVersion {
                found: snapshot.version,
                expected: SNAPSHOT_SCHEMA_VERSION.to_string(),
            }
            .into());
        }
        Ok(snapshot)
    }

    /// Rebuild a live matrix from this snapshot.
    pub fn into_matrix(self) -> KeywordWeightMatrix {
        KeywordWeightMatrix::from_parts(
            self.version,
            self.created_at,
            self.matrix,
            self.max_scores,
            self.keyword_stats,
            self.discovered_keywords_log,
            self.metadata.total_usage_count,
            self.learning_parameters,
        )
    }
}

/// Load a matrix and its scoring history from `path`.
///
/// In lenient mode any failure (missing file, malformed JSON, version
/// mismatch) logs a warning and returns a freshly seeded default matrix. In
/// strict mode a missing file still seeds a default, but a malformed or
/// version-mismatched snapshot is an error.
pub fn load_or_default(
    path: &Path,
    mode: LoadMode,
) -> EngramResult<(KeywordWeightMatrix, Vec<ScoringSession>)> {
    if !path.exists() {
        return Ok((KeywordWeightMatrix::default(), Vec::new()));
    }

    match MatrixSnapshot::read_from(path) {
        Ok(snapshot) => {
            let history = snapshot.scoring_history.clone();
            Ok((snapshot.into_matrix(), history))
        }
        Err(err) => match mode {
            LoadMode::Strict => Err(err),
            LoadMode::Lenient => {
                warn!(path = %path.display(), error = %err, "snapshot load failed, reseeding");
                Ok((KeywordWeightMatrix::default(), Vec::new()))
            }
        },
    }
}
