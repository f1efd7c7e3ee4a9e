//! Error taxonomy for the Engram workspace.
//!
//! "No match" is never an error anywhere in the system: missing dimensions or
//! keywords score zero, out-of-range weights are clamped, and low-confidence
//! discovery candidates are silently dropped. Errors here cover the genuine
//! failure modes: snapshot I/O, malformed snapshots in strict mode, and
//! serialization.

mod snapshot_error;

pub use snapshot_error::SnapshotError;

/// Result alias used across the workspace.
pub type EngramResult<T> = Result<T, EngramError>;

/// Top-level error aggregating all subsystem errors.
#[derive(Debug, thiserror::Error)]
pub enum EngramError {
    #[error("snapshot error: {0}")]
    Snapshot(#[from] SnapshotError),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("concurrency error: {reason}")]
    Concurrency { reason: String },
}
