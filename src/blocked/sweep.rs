//! Sweeping the output with a fixed tile height.

use crate::engine::VectorEngine;
use crate::kernels::{TileRegs, tile_mul};
use crate::policy::{Tile, TilePolicy};

/// Compute C = A·B with a fixed tile height.
///
/// A is m×k, B is k×n, C is m×n, all row-major. The N dimension is swept in
/// chunks: each pass requests `min(n - p, vlmax)` lanes and advances by the
/// width the engine reports back, which may be smaller than the request.
/// Within a chunk the M dimension is swept in `tile.rows()`-row bands; a
/// final band shorter than the tile runs the same kernel over the rows that
/// remain.
///
/// Every output element is the k-ascending sum of its products, one fused
/// multiply-add per term, regardless of tile height or chunk boundaries.
/// Two sweeps of the same problem at different tile heights are
/// bit-identical.
#[allow(clippy::too_many_arguments)]
pub fn gemm_tiled<E: VectorEngine>(
    engine: &mut E,
    policy: &TilePolicy,
    tile: Tile,
    a: &[f64],
    b: &[f64],
    c: &mut [f64],
    m: usize,
    n: usize,
    k: usize,
) {
    let t = tile.rows();

    engine.set_group(policy.group(tile));
    let max_chunk = engine.vlmax();
    let mut regs = TileRegs::new(engine, tile);

    let mut p = 0;
    while p < n {
        let vl = engine.configure((n - p).min(max_chunk));
        // A zero grant can never make progress; fail loudly instead of
        // spinning on the same column forever.
        assert!(vl > 0, "engine configured a zero-width operand");

        let mut row = 0;
        while row < m {
            let rows = t.min(m - row);
            tile_mul(
                engine,
                &mut regs,
                rows,
                &a[row * k..],
                k,
                &b[p..],
                n,
                &mut c[row * n + p..],
                n,
                k,
            );
            row += t;
        }
        p += vl;
    }
}

/// Compute C = A·B, picking the tile height through `policy`.
///
/// The selection is combinatorial over M (see [`TilePolicy::select`]); the
/// full, unsliced matrices are then handed to [`gemm_tiled`].
#[allow(clippy::too_many_arguments)]
pub fn gemm_with<E: VectorEngine>(
    engine: &mut E,
    policy: &TilePolicy,
    a: &[f64],
    b: &[f64],
    c: &mut [f64],
    m: usize,
    n: usize,
    k: usize,
) {
    let tile = policy.select(m, engine.lanes());
    gemm_tiled(engine, policy, tile, a, b, c, m, n, k);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::SoftEngine;
    use crate::matrix::matmul_reference;

    fn sweep_with(tile: Tile, lanes: usize, m: usize, n: usize, k: usize) -> Vec<f64> {
        let a: Vec<f64> = (0..m * k).map(|i| ((i % 13) as f64) - 6.0).collect();
        let b: Vec<f64> = (0..k * n).map(|i| ((i % 7) as f64) * 0.5).collect();
        let mut c = vec![f64::NAN; m * n];

        let mut engine = SoftEngine::new(lanes);
        gemm_tiled(&mut engine, &TilePolicy::default(), tile, &a, &b, &mut c, m, n, k);
        c
    }

    fn reference(m: usize, n: usize, k: usize) -> Vec<f64> {
        let a: Vec<f64> = (0..m * k).map(|i| ((i % 13) as f64) - 6.0).collect();
        let b: Vec<f64> = (0..k * n).map(|i| ((i % 7) as f64) * 0.5).collect();
        let mut c = vec![0.0; m * n];
        matmul_reference(&a, &b, &mut c, m, n, k);
        c
    }

    #[test]
    fn matches_reference_bit_for_bit() {
        for &(m, n, k) in &[(4, 4, 4), (8, 12, 5), (16, 33, 16), (6, 130, 9)] {
            assert_eq!(sweep_with(Tile::T4, 8, m, n, k), reference(m, n, k));
        }
    }

    #[test]
    fn every_tile_height_agrees() {
        let want = reference(19, 23, 11);
        for tile in Tile::ALL {
            assert_eq!(sweep_with(tile, 8, 19, 23, 11), want, "{:?}", tile);
        }
    }

    #[test]
    fn chunk_boundaries_leave_no_seams() {
        // 4 lanes forces many chunks; 64 covers n in one.
        let narrow = sweep_with(Tile::T8, 4, 10, 23, 7);
        let wide = sweep_with(Tile::T8, 64, 10, 23, 7);
        assert_eq!(narrow, wide);
    }

    #[test]
    fn runt_band_rows_all_computed() {
        // m = 5 on an 8-row tile: one full-height call covering 5 rows.
        assert_eq!(sweep_with(Tile::T8, 8, 5, 6, 4), reference(5, 6, 4));
        // m = 17 on a 16-row tile: one full band plus a 1-row runt.
        assert_eq!(sweep_with(Tile::T16, 8, 17, 6, 4), reference(17, 6, 4));
    }

    /// Grants zero lanes no matter what was requested.
    struct StuckEngine(SoftEngine);

    impl VectorEngine for StuckEngine {
        type Vector = Box<[f64]>;

        fn lanes(&self) -> usize {
            self.0.lanes()
        }
        fn set_group(&mut self, group: usize) {
            self.0.set_group(group);
        }
        fn vlmax(&self) -> usize {
            self.0.vlmax()
        }
        fn configure(&mut self, _requested: usize) -> usize {
            self.0.configure(0)
        }
        fn vl(&self) -> usize {
            self.0.vl()
        }
        fn alloc(&self) -> Box<[f64]> {
            self.0.alloc()
        }
        fn zero(&self, v: &mut Box<[f64]>) {
            self.0.zero(v);
        }
        fn load(&self, v: &mut Box<[f64]>, src: &[f64]) {
            self.0.load(v, src);
        }
        fn fma(&self, acc: &mut Box<[f64]>, t: f64, b: &Box<[f64]>) {
            self.0.fma(acc, t, b);
        }
        fn store(&self, v: &Box<[f64]>, dst: &mut [f64]) {
            self.0.store(v, dst);
        }
    }

    #[test]
    #[should_panic(expected = "zero-width operand")]
    fn zero_width_grant_panics_instead_of_spinning() {
        let a = [1.0; 4];
        let b = [1.0; 4];
        let mut c = [0.0; 4];
        let mut engine = StuckEngine(SoftEngine::new(4));
        gemm_tiled(
            &mut engine,
            &TilePolicy::default(),
            Tile::T2,
            &a,
            &b,
            &mut c,
            2,
            2,
            2,
        );
    }

    #[test]
    fn dispatch_and_direct_agree() {
        let m = 7;
        let (n, k) = (9, 5);
        let a: Vec<f64> = (0..m * k).map(|i| i as f64).collect();
        let b: Vec<f64> = (0..k * n).map(|i| (i as f64) * 0.25).collect();

        let policy = TilePolicy::default();
        let mut engine = SoftEngine::new(8);

        let mut c_dispatch = vec![0.0; m * n];
        gemm_with(&mut engine, &policy, &a, &b, &mut c_dispatch, m, n, k);

        let mut c_direct = vec![0.0; m * n];
        let tile = policy.select(m, engine.lanes());
        gemm_tiled(&mut engine, &policy, tile, &a, &b, &mut c_direct, m, n, k);

        assert_eq!(c_dispatch, c_direct);
    }
}
