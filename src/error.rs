//! Errors from the multi-core entry points.

use thiserror::Error;

/// Why a parallel run could not be set up.
///
/// The single-core path has no error conditions: shape mismatches are
/// programmer errors caught by asserts at the public entries, and the
/// kernels themselves never check anything. Partitioning, though, depends on
/// runtime data (M versus the core count), so it reports through `Result`.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GemmError {
    /// The row dimension does not split into equal contiguous bands.
    #[error("{rows} rows cannot be split evenly across {cores} cores")]
    UnevenPartition {
        /// Row dimension of A and C.
        rows: usize,
        /// Requested core count.
        cores: usize,
    },

    /// A parallel run with zero cores was requested.
    #[error("at least one core is required")]
    NoCores,
}
