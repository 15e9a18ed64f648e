//! Generic T-row tile kernel with software-pipelined operand streaming.

use crate::engine::VectorEngine;
use crate::policy::Tile;

/// Tallest tile the kernel family supports.
pub const MAX_TILE: usize = 16;

/// Register file for one tile kernel: T row accumulators plus two B-row
/// buffers for double buffering.
///
/// Allocated once per sweep and reused across every tile invocation, so the
/// kernel itself never allocates.
pub struct TileRegs<E: VectorEngine> {
    acc: Vec<E::Vector>,
    brow: [E::Vector; 2],
}

impl<E: VectorEngine> TileRegs<E> {
    /// Allocate registers for a `tile`-row kernel at the engine's current
    /// grouping.
    pub fn new(engine: &E, tile: Tile) -> Self {
        let acc = (0..tile.rows()).map(|_| engine.alloc()).collect();
        TileRegs {
            acc,
            brow: [engine.alloc(), engine.alloc()],
        }
    }

    /// Tile height these registers were allocated for.
    pub fn rows(&self) -> usize {
        self.acc.len()
    }
}

/// Compute `rows` output rows, one chunk of columns wide: for each row r,
/// `c[r][0..vl] = sum over p of a[r][p] * b[p][0..vl]`, summed in ascending
/// p order with one fused multiply-add per term.
///
/// `a` is the tile's row band of A (row stride `lda`, scalars at
/// `a[r * lda + p]`), `b` the current column chunk of B (row stride `ldb`),
/// `c` the output block (row stride `ldc`). All three are indexed from the
/// chunk origin; `vl` lanes of each B/C row must be in bounds.
///
/// The loop is a three-stage software pipeline, arranged to hide load
/// latency behind the vector FMAs:
///
/// - prologue: load B row 0 and the tile's first column of A scalars;
/// - steady state: issue the load of B row p+1 into the alternate buffer,
///   then run the `rows` FMAs against row p, refreshing each A scalar right
///   after its FMA consumes it;
/// - epilogue: the last iteration has nothing left to fetch, drain the
///   accumulators to C.
///
/// On an out-of-order host this ordering is a hint rather than a schedule,
/// but it keeps the next-operand fetches independent of the arithmetic they
/// overlap, which is what lets any engine pipeline them.
///
/// `rows` may be less than the register file's tile height for a runt band;
/// only the first `rows` accumulators, A rows, and C rows are touched.
/// `k == 0` stores zeros.
#[allow(clippy::too_many_arguments)]
pub fn tile_mul<E: VectorEngine>(
    engine: &E,
    regs: &mut TileRegs<E>,
    rows: usize,
    a: &[f64],
    lda: usize,
    b: &[f64],
    ldb: usize,
    c: &mut [f64],
    ldc: usize,
    k: usize,
) {
    debug_assert!(rows >= 1 && rows <= regs.rows());
    let vl = engine.vl();

    for r in 0..rows {
        engine.zero(&mut regs.acc[r]);
    }

    if k > 0 {
        // Prologue: first B row and the first scalar of each A row.
        engine.load(&mut regs.brow[0], &b[..vl]);
        let mut t = [0.0f64; MAX_TILE];
        for (r, slot) in t[..rows].iter_mut().enumerate() {
            *slot = a[r * lda];
        }

        for p in 0..k {
            let cur = p & 1;
            let next = p + 1;
            if next < k {
                let off = next * ldb;
                engine.load(&mut regs.brow[next & 1], &b[off..off + vl]);
            }
            for r in 0..rows {
                engine.fma(&mut regs.acc[r], t[r], &regs.brow[cur]);
                if next < k {
                    t[r] = a[r * lda + next];
                }
            }
        }
    }

    for r in 0..rows {
        let off = r * ldc;
        engine.store(&regs.acc[r], &mut c[off..off + vl]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::SoftEngine;

    fn run_tile(
        tile: Tile,
        rows: usize,
        k: usize,
        vl: usize,
        a: &[f64],
        b: &[f64],
    ) -> Vec<f64> {
        let mut engine = SoftEngine::new(vl);
        engine.configure(vl);
        let mut regs = TileRegs::new(&engine, tile);
        let mut c = vec![f64::NAN; rows * vl];
        tile_mul(&engine, &mut regs, rows, a, k, b, vl, &mut c, vl, k);
        c
    }

    #[test]
    fn single_row_dot_products() {
        // 1x3 A times 3x2 B.
        let a = [1.0, 2.0, 3.0];
        let b = [10.0, 20.0, 30.0, 40.0, 50.0, 60.0];
        let c = run_tile(Tile::T1, 1, 3, 2, &a, &b);
        assert_eq!(
            c,
            vec![
                1.0 * 10.0 + 2.0 * 30.0 + 3.0 * 50.0,
                1.0 * 20.0 + 2.0 * 40.0 + 3.0 * 60.0,
            ]
        );
    }

    #[test]
    fn two_rows_share_b_rows() {
        // 2x2 A times 2x2 B.
        let a = [1.0, 2.0, 3.0, 4.0];
        let b = [5.0, 6.0, 7.0, 8.0];
        let c = run_tile(Tile::T2, 2, 2, 2, &a, &b);
        assert_eq!(c, vec![19.0, 22.0, 43.0, 50.0]);
    }

    #[test]
    fn zero_k_stores_zeros() {
        let c = run_tile(Tile::T4, 4, 0, 3, &[], &[]);
        assert_eq!(c, vec![0.0; 12]);
    }

    #[test]
    fn k_one_single_fma_per_row() {
        let a = [2.0, -1.0];
        let b = [3.0, 4.0];
        let c = run_tile(Tile::T2, 2, 1, 2, &a, &b);
        assert_eq!(c, vec![6.0, 8.0, -3.0, -4.0]);
    }

    #[test]
    fn runt_rows_leave_upper_accumulators_alone() {
        // 3 live rows on a 4-row register file.
        let a = [1.0, 0.0, 1.0];
        let b = [2.0, 3.0];
        let mut engine = SoftEngine::new(2);
        engine.configure(2);
        let mut regs = TileRegs::new(&engine, Tile::T4);
        let mut c = vec![f64::NAN; 4 * 2];
        tile_mul(&engine, &mut regs, 3, &a, 1, &b, 2, &mut c, 2, 1);
        assert_eq!(&c[..6], &[2.0, 3.0, 0.0, 0.0, 2.0, 3.0]);
        assert!(c[6].is_nan() && c[7].is_nan());
    }

    #[test]
    fn odd_and_even_k_sum_every_term_once() {
        // The pipeline's two live buffers must not double-count or skip a
        // B row when k is odd relative to the buffer alternation.
        for k in 1..=9 {
            let a: Vec<f64> = (0..k).map(|p| (p + 1) as f64).collect();
            let b: Vec<f64> = (0..k).map(|p| ((p * p) % 7) as f64).collect();
            let c = run_tile(Tile::T1, 1, k, 1, &a, &b);
            let mut want = 0.0f64;
            for p in 0..k {
                want = a[p].mul_add(b[p], want);
            }
            assert_eq!(c[0], want, "k = {}", k);
        }
    }
}
