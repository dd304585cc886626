// Shared fixtures and assertions for the integration tests
#![allow(dead_code)]

use cpgeval::{EvalResult, LongReport, NamedArrays};
use ndarray::{array, Array1, Array2};

const TOLERANCE: f64 = 1e-12;

/// Equal values, treating two NaNs as equal
pub fn same_value(a: f64, b: f64) -> bool {
    (a.is_nan() && b.is_nan()) || (a - b).abs() < TOLERANCE
}

pub fn assert_value(actual: Option<f64>, expected: f64) {
    let actual = actual.expect("value is missing");
    assert!(
        same_value(actual, expected),
        "expected {}, got {}",
        expected,
        actual
    );
}

pub fn assert_results_equal(a: &EvalResult, b: &EvalResult) {
    assert_eq!(a.keys(), b.keys());
    for ((key, x), (_, y)) in a.iter().zip(b.iter()) {
        assert!(same_value(x, y), "{}: {} != {}", key, x, y);
    }
}

pub fn assert_reports_equal(a: &LongReport, b: &LongReport) {
    assert_eq!(a.key_columns(), b.key_columns());
    assert_eq!(a.len(), b.len());
    for (x, y) in a.rows().iter().zip(b.rows()) {
        assert_eq!(x.metric, y.metric);
        assert_eq!(x.keys, y.keys);
        assert!(
            same_value(x.value, y.value),
            "{} {:?}: {} != {}",
            x.metric,
            x.keys,
            x.value,
            y.value
        );
    }
}

/// Deterministic values in `[0, 1)`
pub fn lcg_values(seed: u64, n: usize) -> Vec<f64> {
    let mut state = seed;
    (0..n)
        .map(|_| {
            state = state
                .wrapping_mul(6364136223846793005)
                .wrapping_add(1442695040888963407);
            (state >> 11) as f64 / (1u64 << 53) as f64
        })
        .collect()
}

/// Binary truth with roughly `missing` of the entries set to -1
pub fn binary_truth(seed: u64, n: usize, missing: f64) -> Array1<f64> {
    lcg_values(seed, n)
        .into_iter()
        .enumerate()
        .map(|(i, u)| {
            if u < missing {
                -1.0
            } else if i % 2 == 0 {
                1.0
            } else {
                0.0
            }
        })
        .collect()
}

/// One-hot truth with every fourth row unlabelled
pub fn one_hot_truth(n: usize, classes: usize) -> Array2<f64> {
    Array2::from_shape_fn((n, classes), |(i, j)| {
        if i % 4 == 3 {
            0.0
        } else if (i * 7 + 3) % classes == j {
            1.0
        } else {
            0.0
        }
    })
}

/// Row-normalised class probabilities
pub fn class_probabilities(seed: u64, n: usize, classes: usize) -> Array2<f64> {
    let raw = Array2::from_shape_vec((n, classes), lcg_values(seed, n * classes))
        .expect("shape matches generated length");
    let sums = raw.sum_axis(ndarray::Axis(1));
    Array2::from_shape_fn((n, classes), |(i, j)| (raw[[i, j]] + 0.01) / (sums[i] + 0.01 * classes as f64))
}

/// Truth and predictions for a model with CpG, bulk and statistics outputs
pub fn sample_outputs() -> (NamedArrays, NamedArrays) {
    let outputs = NamedArrays::new()
        .with("cpg/cellA", array![0.0, 1.0, 1.0, 0.0, -1.0])
        .with("cpg/cellB", array![1.0, 0.0, -1.0, 1.0, 0.0, 1.0])
        .with("bulk/liver", array![0.1, 0.9, 0.4, 0.8])
        .with("stats/var", array![0.1, 0.3, 0.2, 0.05])
        .with(
            "stats/cat_var",
            array![
                [1.0, 0.0, 0.0],
                [0.0, 1.0, 0.0],
                [0.0, 0.0, 0.0],
                [0.0, 0.0, 1.0],
                [0.0, 1.0, 0.0]
            ],
        );
    let preds = NamedArrays::new()
        .with("cpg/cellA", array![0.2, 0.8, 0.9, 0.3, 0.5])
        .with("cpg/cellB", array![0.6, 0.4, 0.1, 0.3, 0.2, 0.9])
        .with("bulk/liver", array![0.2, 0.7, 0.45, 0.9])
        .with("stats/var", array![0.15, 0.25, 0.2, 0.1])
        .with(
            "stats/cat_var",
            array![
                [0.7, 0.2, 0.1],
                [0.1, 0.8, 0.1],
                [0.3, 0.3, 0.4],
                [0.2, 0.2, 0.6],
                [0.5, 0.4, 0.1]
            ],
        );
    (outputs, preds)
}
