//! Benchmark runner for the tiled GEMM variants.

use std::time::Instant;

use fmatmul::{
    SoftEngine, SpmdConfig, Tile, TilePolicy, gemm_tiled, init_affine, matmul_reference, spmd_run,
    verify,
};

const NUM_CORES: usize = 4;
const WARM_UP: usize = 1;
const THRESHOLD: f64 = 0.001;

fn main() {
    println!("=============");
    println!("=  FMATMUL  =");
    println!("=============\n");

    let sizes = [64, 128, 256];
    let iterations = 3;
    let mut all_results = Vec::new();

    for &size in &sizes {
        let (m, n, k) = (size, size, size);
        println!("Matrix: {}×{}", size, size);
        println!("{}", "-".repeat(60));

        let mut a = vec![0.0; m * k];
        let mut b = vec![0.0; k * n];
        init_affine(&mut a, m, k, 1.0, 1.0, -32.0);
        init_affine(&mut b, k, n, 2.0, 1.0, 16.0);

        let mut golden = vec![0.0; m * n];
        matmul_reference(&a, &b, &mut golden, m, n, k);

        let mut results: Vec<(String, (f64, f64))> = vec![(
            "Scalar reference".to_string(),
            bench_fn(&a, &b, &golden, m, n, k, iterations, matmul_reference),
        )];

        for tile in [Tile::T4, Tile::T8, Tile::T16] {
            let policy = TilePolicy::default();
            results.push((
                format!("{:?} tiled", tile),
                bench_fn(
                    &a,
                    &b,
                    &golden,
                    m,
                    n,
                    k,
                    iterations,
                    |a, b, c, m, n, k| {
                        let mut engine = SoftEngine::default();
                        gemm_tiled(&mut engine, &policy, tile, a, b, c, m, n, k);
                    },
                ),
            ));
        }

        results.push((
            "Dispatched".to_string(),
            bench_fn(&a, &b, &golden, m, n, k, iterations, fmatmul::gemm),
        ));

        results.push((
            format!("SPMD ({} cores)", NUM_CORES),
            bench_parallel(&a, &b, &golden, m, n, k),
        ));

        let baseline_time = results[0].1.0;
        for (i, (name, (time_ms, gflops))) in results.iter().enumerate() {
            let speedup = baseline_time / time_ms;
            println!(
                "{}. {:18} {:8.2} ms  {:6.2} GFLOPS  ({:.1}×)",
                i + 1,
                name,
                time_ms,
                gflops,
                speedup
            );
        }
        println!();

        all_results.push((size, results));
    }

    print_summary_table(&sizes, &all_results);
}

/// Time a single-threaded variant and check it against the golden result.
#[allow(clippy::too_many_arguments)]
fn bench_fn<F>(
    a: &[f64],
    b: &[f64],
    golden: &[f64],
    m: usize,
    n: usize,
    k: usize,
    iterations: usize,
    f: F,
) -> (f64, f64)
where
    F: Fn(&[f64], &[f64], &mut [f64], usize, usize, usize),
{
    // Warmup
    let mut c = vec![0.0; m * n];
    f(a, b, &mut c, m, n, k);

    let mut total = 0.0;
    for _ in 0..iterations {
        let mut c = vec![0.0; m * n];
        let start = Instant::now();
        f(a, b, &mut c, m, n, k);
        total += start.elapsed().as_secs_f64();

        if let Some(mm) = verify(&c, golden, THRESHOLD) {
            println!(
                "  VERIFY FAILED at index {}: got {}, expected {}",
                mm.index, mm.got, mm.expected
            );
        }
    }

    summarize(total, iterations, m, n, k)
}

/// Time the SPMD protocol; verification happens on core 0 inside the run.
fn bench_parallel(a: &[f64], b: &[f64], golden: &[f64], m: usize, n: usize, k: usize) -> (f64, f64) {
    let cfg = SpmdConfig {
        num_cores: NUM_CORES,
        warm_up: WARM_UP,
        tile: None,
    };

    let mut c = vec![0.0; m * n];
    let report = spmd_run(a, b, &mut c, m, n, k, &cfg, Some((golden, THRESHOLD)))
        .expect("benchmark sizes divide evenly");

    if let Some(mm) = report.mismatch {
        println!(
            "  VERIFY FAILED at index {}: got {}, expected {}",
            mm.index, mm.got, mm.expected
        );
    }

    summarize(report.elapsed.as_secs_f64(), 1, m, n, k)
}

fn summarize(total: f64, iterations: usize, m: usize, n: usize, k: usize) -> (f64, f64) {
    let avg = total / iterations as f64;
    let gflops = 2.0 * (m * n * k) as f64 / avg / 1e9;
    (avg * 1000.0, gflops)
}

#[allow(clippy::type_complexity)]
fn print_summary_table(sizes: &[usize], all_results: &[(usize, Vec<(String, (f64, f64))>)]) {
    println!("{}", "=".repeat(72));
    println!("SUMMARY");
    println!("{}", "=".repeat(72));

    print!("\n{:<20}", "Method");
    for size in sizes {
        print!(" {:>12}", format!("{0}×{0}", size));
    }
    println!(" {:>10}", "Speedup");
    println!("{}", "-".repeat(72));

    let num_methods = all_results[0].1.len();
    for method_idx in 0..num_methods {
        let method_name = &all_results[0].1[method_idx].0;

        let mut gflops_list = Vec::new();
        let mut speedups = Vec::new();
        for (_, results) in all_results {
            let (time_ms, gflops) = results[method_idx].1;
            let baseline_time = results[0].1.0;
            gflops_list.push(gflops);
            speedups.push(baseline_time / time_ms);
        }
        let avg_speedup: f64 = speedups.iter().sum::<f64>() / speedups.len() as f64;

        print!("{:<20}", method_name);
        for gf in &gflops_list {
            print!(" {:>9.2} GF", gf);
        }
        println!(" {:>9.1}×", avg_speedup);
    }

    println!("{}", "=".repeat(72));
    println!("\nGF = GFLOPS. Speedup relative to the scalar reference.\n");
}
