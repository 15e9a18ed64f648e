//! The register-resident tile kernel.
//!
//! One generic kernel computes a T-row, one-chunk-wide block of C in a
//! single pass over the reduction dimension, T ∈ {1, 2, 4, 8, 16}. The
//! accumulators live in a [`TileRegs`] register file sized by the tile, and
//! the loop body is identical for every height, so there is exactly one
//! place where the numerics are defined.

pub mod tile;

pub use tile::{TileRegs, tile_mul};
