//! The vector-engine capability the kernels run on.
//!
//! The tile kernels never touch SIMD directly. They talk to a [`VectorEngine`]:
//! a unit that can be configured to operate on some number of f64 lanes at a
//! time, and that offers contiguous vector load/store plus a broadcast-scalar
//! fused multiply-add. This mirrors how a length-agnostic vector ISA works:
//! you *request* an operand width, the hardware tells you what it actually
//! configured, and every subsequent operation applies to that many lanes.
//!
//! Two rules the kernels must follow:
//!
//! - Always use the width returned by [`VectorEngine::configure`], never the
//!   requested one. The engine is free to configure less.
//! - A register allocated at one grouping stays valid while the configured
//!   width only shrinks; widening the grouping requires reallocating.
//!
//! The register *grouping* multiplier trades register count for width: at
//! grouping g, each logical register is g hardware registers wide, so an
//! engine with 32 registers has only 32/g of them. The tile policy picks the
//! grouping; see [`crate::policy`].

pub mod soft;

pub use soft::SoftEngine;

/// A configurable-width f64 vector compute unit.
///
/// Implementations decide how vectors are represented (`Vector`) and how wide
/// they can go. All lane-wise operations apply to the first [`vl`](Self::vl)
/// lanes only; remaining lanes are unspecified.
pub trait VectorEngine {
    /// One vector register's worth of f64 lanes.
    type Vector;

    /// Number of lanes per register at grouping 1.
    fn lanes(&self) -> usize;

    /// Select the register grouping multiplier.
    ///
    /// Registers allocated before this call are sized for the old grouping
    /// and must not be reused after widening it.
    fn set_group(&mut self, group: usize);

    /// Widest operand the engine will configure at the current grouping.
    fn vlmax(&self) -> usize;

    /// Request an operand width; returns the width actually configured.
    ///
    /// The result is at most `requested` and at most [`vlmax`](Self::vlmax),
    /// and must be positive whenever `requested` is: a grant of zero lanes
    /// for a nonzero request leaves callers unable to make progress.
    fn configure(&mut self, requested: usize) -> usize;

    /// Currently configured operand width.
    fn vl(&self) -> usize;

    /// Allocate a register wide enough for the current grouping.
    fn alloc(&self) -> Self::Vector;

    /// Clear the first `vl` lanes of `v`.
    fn zero(&self, v: &mut Self::Vector);

    /// Load `vl` contiguous f64 values from `src` into `v`.
    ///
    /// # Panics
    ///
    /// Panics if `src` holds fewer than `vl` elements.
    fn load(&self, v: &mut Self::Vector, src: &[f64]);

    /// `acc[i] += t * b[i]` over the first `vl` lanes, one fused
    /// multiply-add per lane.
    fn fma(&self, acc: &mut Self::Vector, t: f64, b: &Self::Vector);

    /// Store the first `vl` lanes of `v` into `dst`.
    ///
    /// # Panics
    ///
    /// Panics if `dst` holds fewer than `vl` elements.
    fn store(&self, v: &Self::Vector, dst: &mut [f64]);
}
