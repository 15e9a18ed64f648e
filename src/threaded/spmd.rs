//! Barrier-synchronized SPMD row-band execution.

use std::sync::Barrier;
use std::thread;
use std::time::{Duration, Instant};

use crate::blocked::gemm_tiled;
use crate::engine::{SoftEngine, VectorEngine};
use crate::error::GemmError;
use crate::matrix::{Mismatch, verify};
use crate::policy::{Tile, TilePolicy};

/// How a parallel run is shaped.
#[derive(Debug, Clone)]
pub struct SpmdConfig {
    /// Number of cores; M must be an exact multiple of it.
    pub num_cores: usize,
    /// Untimed full passes each core runs before the timed one, to prime
    /// caches and pipelines.
    pub warm_up: usize,
    /// Pin every core to this tile height instead of letting each core
    /// select on its band height.
    pub tile: Option<Tile>,
}

impl SpmdConfig {
    /// A plain compute run: no warm-up, per-band tile selection.
    pub fn compute(num_cores: usize) -> Self {
        SpmdConfig {
            num_cores,
            warm_up: 0,
            tile: None,
        }
    }
}

/// What core 0 observed during a run.
#[derive(Debug, Clone, Copy)]
pub struct SpmdReport {
    /// Wall time of the timed pass, from the moment every core was released
    /// into it until every core had finished it.
    pub elapsed: Duration,
    /// First out-of-threshold element, if a golden matrix was supplied and
    /// the result missed it.
    pub mismatch: Option<Mismatch>,
}

/// Compute C = A·B across `num_cores` cores.
///
/// Equivalent to [`crate::gemm`] on the same inputs, bit for bit: each core
/// runs the same k-ascending kernel over its own rows, and no row's sum
/// depends on which band it landed in.
///
/// # Errors
///
/// Fails if `num_cores` is zero or does not divide `m`.
///
/// # Panics
///
/// Panics if the slice lengths do not match the dimensions.
pub fn gemm_parallel(
    a: &[f64],
    b: &[f64],
    c: &mut [f64],
    m: usize,
    n: usize,
    k: usize,
    num_cores: usize,
) -> Result<(), GemmError> {
    spmd_run(a, b, c, m, n, k, &SpmdConfig::compute(num_cores), None).map(|_| ())
}

/// Run the full SPMD protocol and return core 0's observations.
///
/// Per core: derive the band, rendezvous at the start barrier, run
/// `cfg.warm_up` untimed passes, rendezvous, run the timed pass, rendezvous,
/// then core 0 reads the clock and (when `golden` is given as a matrix plus
/// threshold) verifies the entire C, all bands included, while the other
/// cores hold at the final barrier. Nobody returns before core 0 is done
/// reading.
///
/// The timed window opens only after every core has reached the post-warm-up
/// barrier and closes only once every core has reached the barrier behind
/// the timed pass, so no core's work is counted while another has yet to
/// start.
///
/// # Errors
///
/// Fails if `cfg.num_cores` is zero or does not divide `m`.
///
/// # Panics
///
/// Panics if the slice lengths do not match the dimensions, or if a worker
/// thread panics.
#[allow(clippy::too_many_arguments)]
pub fn spmd_run(
    a: &[f64],
    b: &[f64],
    c: &mut [f64],
    m: usize,
    n: usize,
    k: usize,
    cfg: &SpmdConfig,
    golden: Option<(&[f64], f64)>,
) -> Result<SpmdReport, GemmError> {
    assert_eq!(a.len(), m * k, "A: expected {}x{}={} elements", m, k, m * k);
    assert_eq!(b.len(), k * n, "B: expected {}x{}={} elements", k, n, k * n);
    assert_eq!(c.len(), m * n, "C: expected {}x{}={} elements", m, n, m * n);

    if cfg.num_cores == 0 {
        return Err(GemmError::NoCores);
    }
    if m % cfg.num_cores != 0 {
        return Err(GemmError::UnevenPartition {
            rows: m,
            cores: cfg.num_cores,
        });
    }

    let rows_per_core = m / cfg.num_cores;
    let barrier = Barrier::new(cfg.num_cores);

    // C is handed to the workers as a raw pointer. Each core reconstructs
    // only its own band, and the bands are disjoint, so there is never a
    // concurrent writer to any element. Core 0 additionally reads the whole
    // matrix, but only between the completion barrier and the final one,
    // when every band's writer is parked.
    let c_ptr = c.as_mut_ptr() as usize;

    let report = thread::scope(|s| {
        let handles: Vec<_> = (0..cfg.num_cores)
            .map(|core_id| {
                let barrier = &barrier;
                s.spawn(move || {
                    let row0 = core_id * rows_per_core;
                    let a_band = &a[row0 * k..(row0 + rows_per_core) * k];
                    // SAFETY: bands are disjoint per core_id, in bounds of
                    // the m*n buffer behind c_ptr, and the &mut [f64] they
                    // came from outlives this scope.
                    let c_band = unsafe {
                        std::slice::from_raw_parts_mut(
                            (c_ptr as *mut f64).add(row0 * n),
                            rows_per_core * n,
                        )
                    };

                    let policy = TilePolicy::default();
                    let mut engine = SoftEngine::default();
                    let tile = cfg
                        .tile
                        .unwrap_or_else(|| policy.select(rows_per_core, engine.lanes()));

                    barrier.wait();

                    for _ in 0..cfg.warm_up {
                        gemm_tiled(
                            &mut engine,
                            &policy,
                            tile,
                            a_band,
                            b,
                            c_band,
                            rows_per_core,
                            n,
                            k,
                        );
                    }

                    barrier.wait();

                    let start = Instant::now();
                    gemm_tiled(
                        &mut engine,
                        &policy,
                        tile,
                        a_band,
                        b,
                        c_band,
                        rows_per_core,
                        n,
                        k,
                    );

                    barrier.wait();

                    let observed = if core_id == 0 {
                        let elapsed = start.elapsed();
                        // SAFETY: every core is past the completion barrier;
                        // no band is written again in this scope.
                        let full_c =
                            unsafe { std::slice::from_raw_parts(c_ptr as *const f64, m * n) };
                        let mismatch =
                            golden.and_then(|(gold, threshold)| verify(full_c, gold, threshold));
                        Some(SpmdReport { elapsed, mismatch })
                    } else {
                        None
                    };

                    barrier.wait();
                    observed
                })
            })
            .collect();

        handles
            .into_iter()
            .filter_map(|h| h.join().unwrap())
            .next()
            .expect("core 0 always reports")
    });

    Ok(report)
}
