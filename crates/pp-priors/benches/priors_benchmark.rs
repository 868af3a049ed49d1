//! Criterion benchmarks for prior evaluation, construction and sampling.
//!
//! Measures batch `log_pdf` throughput for the common mass-prior shapes and the cost of the
//! tabulated pieces (smoothing quadrature, spline inverse, CDF tables).

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::hint::black_box;

use pp_priors::{
    BoundedPdf, ConditionalPdf2d, FlexiblePdf, JointPdf2d, PowerLawGaussianPdf, PowerLawPdf,
    Prior, SmoothedPdf, TruncatedGaussianPdf,
};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn masses(n: usize, lo: f64, hi: f64) -> Vec<f64> {
    (0..n).map(|i| lo + (hi - lo) * (i as f64 + 0.5) / n as f64).collect()
}

fn power_law_peak() -> PowerLawGaussianPdf {
    PowerLawGaussianPdf::new(
        PowerLawPdf::new(4.6, 86.0, -3.4).unwrap(),
        TruncatedGaussianPdf::new(34.0, 3.6, 4.6, 100.0).unwrap(),
        0.04,
    )
    .unwrap()
}

// ---------------------------------------------------------------------------
// Benchmarks
// ---------------------------------------------------------------------------

fn bench_log_pdf_batch(c: &mut Criterion) {
    let mut group = c.benchmark_group("log_pdf_batch");
    let priors: Vec<(&str, Prior)> = vec![
        ("power_law", PowerLawPdf::new(4.6, 86.0, -3.4).unwrap().into()),
        ("power_law_gaussian", power_law_peak().into()),
        ("smoothed_plp", SmoothedPdf::new(power_law_peak(), 4.8).unwrap().into()),
        (
            "flexible",
            FlexiblePdf::with_default_range(4.6, 100.0, &[0.2, 0.0, 0.4, 0.1, -0.1])
                .unwrap()
                .into(),
        ),
    ];
    for n in [1_000usize, 100_000] {
        let xs = masses(n, 2.0, 105.0);
        let mut out = vec![0.0; n];
        for (name, prior) in &priors {
            group.bench_with_input(BenchmarkId::new(*name, n), &n, |b, _| {
                b.iter(|| {
                    prior.log_pdf_batch(black_box(&xs), &mut out).unwrap();
                    black_box(out[n / 2])
                })
            });
        }
    }
    group.finish();
}

fn bench_construction(c: &mut Criterion) {
    c.bench_function("smoothed_new", |b| {
        b.iter(|| SmoothedPdf::new(black_box(power_law_peak()), 4.8).unwrap())
    });
    c.bench_function("flexible_new_9_slopes", |b| {
        let slopes = [0.1, 0.0, 0.2, -0.1, 0.3, 0.0, 0.1, 0.2, -0.2];
        b.iter(|| FlexiblePdf::with_default_range(4.6, 100.0, black_box(&slopes)).unwrap())
    });
}

fn bench_sampling(c: &mut Criterion) {
    let mut group = c.benchmark_group("sample");
    let smoothed: Prior = SmoothedPdf::new(power_law_peak(), 4.8).unwrap().into();
    let joint = ConditionalPdf2d::new(
        smoothed.clone(),
        Prior::from(SmoothedPdf::new(PowerLawPdf::new(4.6, 100.0, 1.1).unwrap(), 4.8).unwrap()),
    );
    for n in [1_000usize, 100_000] {
        group.bench_with_input(BenchmarkId::new("smoothed_plp", n), &n, |b, &n| {
            let mut rng = StdRng::seed_from_u64(0);
            b.iter(|| black_box(smoothed.sample(n, &mut rng).unwrap()))
        });
        group.bench_with_input(BenchmarkId::new("conditional_pair", n), &n, |b, &n| {
            let mut rng = StdRng::seed_from_u64(0);
            b.iter(|| black_box(joint.sample(n, &mut rng).unwrap()))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_log_pdf_batch, bench_construction, bench_sampling);
criterion_main!(benches);
