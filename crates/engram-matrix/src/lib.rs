//! # engram-matrix
//!
//! The keyword weight matrix: dimension → keyword → weight, plus per-keyword
//! usage statistics. Sole owner of mutable scoring state. Every mutation is
//! logged as a [`MatrixChange`](engram_core::MatrixChange) so the current
//! state can be reproduced by replaying changes from an initial snapshot.

pub mod dimensions;
pub mod matrix;
pub mod snapshot;

pub use dimensions::{DimensionSet, DimensionSpec};
pub use matrix::KeywordWeightMatrix;
pub use snapshot::{load_or_default, LoadMode, MatrixSnapshot};
