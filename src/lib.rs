//! Register-blocked matrix multiplication for wide-SIMD vector engines.
//!
//! I wrote this around one idea from vector-processor GEMMs: keep a tile of
//! output rows resident in vector registers, stream the reduction dimension
//! past them, and let double-buffered row loads hide memory latency behind
//! the FMAs. The tile height (1 to 16 rows) and the register grouping are
//! picked per problem so the accumulators plus two row buffers exactly fill
//! the register budget.
//!
//! ## Usage
//!
//! ```
//! use fmatmul::gemm;
//!
//! let a = vec![1.0f64; 64 * 64];
//! let b = vec![1.0f64; 64 * 64];
//! let mut c = vec![0.0f64; 64 * 64];
//!
//! gemm(&a, &b, &mut c, 64, 64, 64);
//! assert_eq!(c[0], 64.0);
//! ```
//!
//! To split the rows across cores (M must divide evenly):
//!
//! ```
//! use fmatmul::gemm_parallel;
//!
//! let a = vec![1.0f64; 128 * 128];
//! let b = vec![1.0f64; 128 * 128];
//! let mut c = vec![0.0f64; 128 * 128];
//!
//! gemm_parallel(&a, &b, &mut c, 128, 128, 128, 4).unwrap();
//! ```
//!
//! ## What's inside
//!
//! - One generic tile kernel covering every tile height, software-pipelined
//!   so the next operands are fetched while the current ones compute
//! - A column sweep that always advances by the operand width the vector
//!   engine actually configured
//! - A register-budget policy that derives tile height and grouping instead
//!   of hardcoding dispatch thresholds
//! - A barrier-synchronized SPMD wrapper with one row band per core
//!
//! All tile heights, chunkings, and core counts produce bit-identical
//! results: every output element is summed in ascending k order with one
//! fused multiply-add per term.

pub mod blocked;
pub mod engine;
pub mod error;
pub mod kernels;
pub mod matrix;
pub mod policy;
pub mod threaded;

pub use blocked::{gemm_tiled, gemm_with};
pub use engine::{SoftEngine, VectorEngine};
pub use error::GemmError;
pub use matrix::{Mismatch, init_affine, matmul_reference, verify};
pub use policy::{Tile, TilePolicy};
pub use threaded::{SpmdConfig, SpmdReport, gemm_parallel, spmd_run};

/// Matrix multiply: C = A * B.
///
/// Picks the tile height from M through the default register-budget policy
/// and runs on the default software vector engine. Matrices are row-major:
/// A is m×k, B is k×n, C is m×n. C is overwritten.
///
/// # Panics
///
/// Panics if the slice sizes don't match m, n, k.
pub fn gemm(a: &[f64], b: &[f64], c: &mut [f64], m: usize, n: usize, k: usize) {
    assert_eq!(a.len(), m * k, "A: expected {}x{}={} elements", m, k, m * k);
    assert_eq!(b.len(), k * n, "B: expected {}x{}={} elements", k, n, k * n);
    assert_eq!(c.len(), m * n, "C: expected {}x{}={} elements", m, n, m * n);

    let policy = TilePolicy::default();
    let mut engine = SoftEngine::default();
    gemm_with(&mut engine, &policy, a, b, c, m, n, k);
}
