//! Column-slicing sweep and tile dispatch.
//!
//! The tile kernel computes one T-row, one-chunk-wide block. The sweep in
//! this module turns that into a full matrix product: it walks the output's
//! columns in engine-sized chunks and its rows in T-row bands, and the
//! dispatcher on top picks T from the problem's row count.

pub mod sweep;

pub use sweep::{gemm_tiled, gemm_with};
