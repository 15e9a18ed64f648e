//! Criterion benchmarks for the tiled GEMM variants.

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use fmatmul::{SoftEngine, Tile, TilePolicy, gemm, gemm_parallel, gemm_tiled};

const SIZES: &[usize] = &[64, 128, 256];

fn make_matrix(len: usize, seed: u64) -> Vec<f64> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..len).map(|_| rng.gen_range(-1.0..1.0)).collect()
}

fn bench_tiles(c: &mut Criterion) {
    let mut group = c.benchmark_group("gemm_tiled");
    for &n in SIZES {
        group.throughput(Throughput::Elements((n as u64).pow(3)));

        let a = make_matrix(n * n, 0x5EED ^ n as u64);
        let b = make_matrix(n * n, 0xB00B5 ^ (n as u64).rotate_left(13));
        let mut out = vec![0.0f64; n * n];
        let policy = TilePolicy::default();

        for tile in [Tile::T4, Tile::T8, Tile::T16] {
            group.bench_function(BenchmarkId::new(format!("{:?}", tile), n), |bench| {
                let mut engine = SoftEngine::default();
                bench.iter(|| {
                    gemm_tiled(
                        &mut engine,
                        &policy,
                        tile,
                        black_box(&a),
                        black_box(&b),
                        black_box(&mut out),
                        n,
                        n,
                        n,
                    );
                    black_box(out[n / 2]);
                });
            });
        }
    }
    group.finish();
}

fn bench_dispatch(c: &mut Criterion) {
    let mut group = c.benchmark_group("gemm");
    for &n in SIZES {
        group.throughput(Throughput::Elements((n as u64).pow(3)));

        let a = make_matrix(n * n, 0xACE ^ n as u64);
        let b = make_matrix(n * n, 0xDEC0 ^ (n as u64).rotate_left(7));
        let mut out = vec![0.0f64; n * n];

        group.bench_function(BenchmarkId::new("dispatched", n), |bench| {
            bench.iter(|| {
                gemm(black_box(&a), black_box(&b), black_box(&mut out), n, n, n);
                black_box(out[n / 2]);
            });
        });

        group.bench_function(BenchmarkId::new("parallel4", n), |bench| {
            bench.iter(|| {
                gemm_parallel(black_box(&a), black_box(&b), black_box(&mut out), n, n, n, 4)
                    .unwrap();
                black_box(out[n / 2]);
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_tiles, bench_dispatch);
criterion_main!(benches);
