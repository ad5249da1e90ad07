use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use skyframes::kepler::solve_kepler_danby;

/// Mean anomaly in (−180°, 180°]
#[inline]
fn rand_mean_anomaly(rng: &mut StdRng) -> f64 {
    180.0 - rng.random::<f64>() * 360.0
}

fn bench_eccentricity_range(c: &mut Criterion, name: &str, seed: u64, low: f64, high: f64) {
    let mut rng = StdRng::seed_from_u64(seed);
    let samples = 10_000usize;

    c.bench_function(name, |b| {
        b.iter_batched(
            || {
                (0..samples)
                    .map(|_| (rand_mean_anomaly(&mut rng), rng.random_range(low..high)))
                    .collect::<Vec<_>>()
            },
            |cases| {
                for (m, e) in cases {
                    let _ = black_box(solve_kepler_danby(black_box(m), black_box(e)));
                }
            },
            BatchSize::LargeInput,
        )
    });
}

/// Planetary regime: e ∈ [0, 0.25)
fn bench_planetary(c: &mut Criterion) {
    bench_eccentricity_range(c, "solve_kepler_danby/planetary_e<0.25", 0xDEADBEEF, 0.0, 0.25);
}

/// Cometary regime: e ∈ [0.7, 0.98)
fn bench_high_e(c: &mut Criterion) {
    bench_eccentricity_range(c, "solve_kepler_danby/high_e_0.7..0.98", 0xBADF00D, 0.7, 0.98);
}

/// Mean anomaly close to zero at high eccentricity, the slowest start for the first guess.
fn bench_fixed_stress(c: &mut Criterion) {
    let e = 0.97_f64;
    let m = 0.5_f64;

    c.bench_function("solve_kepler_danby/fixed_stress_case", |b| {
        b.iter(|| black_box(solve_kepler_danby(black_box(m), black_box(e)).ok()))
    });
}

criterion_group!(
    name = benches;
    config = Criterion::default();
    targets = bench_planetary, bench_high_e, bench_fixed_stress
);
criterion_main!(benches);
