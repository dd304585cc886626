//! Evaluation Benchmarks
//!
//! Per-output metric computation, multi-output reports and pivoting.

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use cpgeval::metrics::registry::{classification_metrics, regression_metrics};
use cpgeval::{evaluate, unstack_report, EvalConfig, Evaluator, Mask, NamedArrays};
use ndarray::Array1;

/// Simple LCG random generator for reproducibility
fn rand_f64(state: &mut u64) -> f64 {
    *state = state.wrapping_mul(6364136223846793005).wrapping_add(1);
    (*state >> 33) as f64 / (u32::MAX as f64)
}

/// Binary truth with ~10% missing sites, and matching scores
fn create_binary_output(n_samples: usize, seed: u64) -> (Array1<f64>, Array1<f64>) {
    let mut state = seed;
    let truth: Array1<f64> = (0..n_samples)
        .map(|_| {
            let u = rand_f64(&mut state);
            if u < 0.1 {
                -1.0
            } else if u < 0.55 {
                0.0
            } else {
                1.0
            }
        })
        .collect();
    let preds = truth
        .iter()
        .map(|&t| (t.max(0.0) * 0.6 + rand_f64(&mut state) * 0.4).min(1.0))
        .collect();
    (truth, preds)
}

fn create_outputs(n_outputs: usize, n_samples: usize) -> (NamedArrays, NamedArrays) {
    let mut outputs = NamedArrays::new();
    let mut preds = NamedArrays::new();
    for i in 0..n_outputs {
        let (y, z) = create_binary_output(n_samples, 42 + i as u64);
        let name = format!("cpg/cell{}", i);
        outputs.insert(name.clone(), y);
        preds.insert(name, z);
    }
    (outputs, preds)
}

fn bench_single_output(c: &mut Criterion) {
    let mut group = c.benchmark_group("Single Output");

    for n_samples in [1_000, 10_000, 100_000] {
        let (y, z) = create_binary_output(n_samples, 42);

        group.bench_with_input(
            BenchmarkId::new("classification", n_samples),
            &(y.clone(), z.clone()),
            |b, (y, z)| b.iter(|| evaluate(black_box(y), black_box(z), Mask::default(), classification_metrics())),
        );

        group.bench_with_input(
            BenchmarkId::new("regression", n_samples),
            &(y, z),
            |b, (y, z)| b.iter(|| evaluate(black_box(y), black_box(z), Mask::default(), regression_metrics())),
        );
    }

    group.finish();
}

fn bench_multi_output(c: &mut Criterion) {
    let mut group = c.benchmark_group("Multi Output");
    group.sample_size(10);

    let (outputs, preds) = create_outputs(32, 20_000);
    for parallel in [false, true] {
        let evaluator = Evaluator::new(EvalConfig {
            parallel,
            ..EvalConfig::default()
        })
        .unwrap();
        let label = if parallel { "parallel" } else { "sequential" };
        group.bench_function(label, |b| {
            b.iter(|| evaluator.evaluate_outputs(black_box(&outputs), black_box(&preds)))
        });
    }

    group.finish();
}

fn bench_unstack(c: &mut Criterion) {
    let mut group = c.benchmark_group("Unstack");

    for n_outputs in [10, 100] {
        let (outputs, preds) = create_outputs(n_outputs, 500);
        let report = Evaluator::default()
            .evaluate_outputs(&outputs, &preds)
            .unwrap();
        group.bench_with_input(BenchmarkId::new("unstack_report", n_outputs), &report, |b, report| {
            b.iter(|| unstack_report(black_box(report)))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_single_output, bench_multi_output, bench_unstack);
criterion_main!(benches);
