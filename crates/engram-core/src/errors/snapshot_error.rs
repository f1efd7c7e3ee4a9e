/// Matrix snapshot persistence errors.
#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    #[error("snapshot schema version {found} is not supported (expected {expected})")]
    UnsupportedVersion { found: String, expected: String },

    #[error("snapshot is malformed: {reason}")]
    Malformed { reason: String },

    #[error("snapshot write failed: {reason}")]
    WriteFailed { reason: String },
}
