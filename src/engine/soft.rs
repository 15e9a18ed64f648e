//! Portable software implementation of the vector engine.

use super::VectorEngine;

/// Default number of lanes per register, matching a 4096-bit vector unit
/// operating on 64-bit elements.
pub const DEFAULT_LANES: usize = 64;

/// Largest supported register grouping multiplier.
pub const MAX_GROUP: usize = 8;

/// A software vector unit: plain heap-backed registers and scalar loops.
///
/// The loops are written lane-at-a-time over contiguous slices, which the
/// compiler auto-vectorizes for the host target. What matters here is the
/// *contract*, not the speed: `configure` clamps exactly like a real
/// length-agnostic unit, so the kernels above it can be tested against the
/// same width-negotiation behavior they would see on hardware.
#[derive(Debug, Clone)]
pub struct SoftEngine {
    lanes: usize,
    group: usize,
    vl: usize,
}

impl SoftEngine {
    /// Engine with `lanes` f64 lanes per register at grouping 1.
    ///
    /// # Panics
    ///
    /// Panics if `lanes` is zero.
    pub fn new(lanes: usize) -> Self {
        assert!(lanes > 0, "a vector engine needs at least one lane");
        SoftEngine {
            lanes,
            group: 1,
            vl: 0,
        }
    }
}

impl Default for SoftEngine {
    fn default() -> Self {
        SoftEngine::new(DEFAULT_LANES)
    }
}

impl VectorEngine for SoftEngine {
    type Vector = Box<[f64]>;

    fn lanes(&self) -> usize {
        self.lanes
    }

    fn set_group(&mut self, group: usize) {
        assert!(
            group > 0 && group <= MAX_GROUP,
            "register grouping must be in 1..={}, got {}",
            MAX_GROUP,
            group
        );
        self.group = group;
        self.vl = self.vl.min(self.vlmax());
    }

    fn vlmax(&self) -> usize {
        self.lanes * self.group
    }

    fn configure(&mut self, requested: usize) -> usize {
        self.vl = requested.min(self.vlmax());
        self.vl
    }

    fn vl(&self) -> usize {
        self.vl
    }

    fn alloc(&self) -> Box<[f64]> {
        vec![0.0; self.vlmax()].into_boxed_slice()
    }

    fn zero(&self, v: &mut Box<[f64]>) {
        v[..self.vl].fill(0.0);
    }

    fn load(&self, v: &mut Box<[f64]>, src: &[f64]) {
        v[..self.vl].copy_from_slice(&src[..self.vl]);
    }

    fn fma(&self, acc: &mut Box<[f64]>, t: f64, b: &Box<[f64]>) {
        for (a, &x) in acc[..self.vl].iter_mut().zip(&b[..self.vl]) {
            *a = t.mul_add(x, *a);
        }
    }

    fn store(&self, v: &Box<[f64]>, dst: &mut [f64]) {
        dst[..self.vl].copy_from_slice(&v[..self.vl]);
    }
}
