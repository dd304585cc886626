//! 評価指標モジュール
//!
//! Scalar metric functions and the descriptors the evaluators dispatch on.
//! Every metric maps a `(truth, prediction)` pair to one `f64`; degenerate
//! inputs yield `NaN` instead of an error.

pub mod categorical;
pub mod classification;
pub mod registry;
pub mod regression;

use std::fmt;

use ndarray::ArrayView2;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

pub use registry::{registry, MetricRegistry};

/// Group a metric belongs to in the registry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MetricCategory {
    /// One-hot multi-class metrics
    Categorical,
    /// Binary classification metrics
    Classification,
    /// Regression metrics
    Regression,
}

impl MetricCategory {
    /// カテゴリ名を文字列で取得
    pub fn name(&self) -> &'static str {
        match self {
            MetricCategory::Categorical => "categorical",
            MetricCategory::Classification => "classification",
            MetricCategory::Regression => "regression",
        }
    }
}

/// Function pointer behind a metric
#[derive(Clone, Copy)]
pub enum MetricFn {
    /// Scored on flat sequences as given
    Plain(fn(&[f64], &[f64]) -> f64),
    /// Scored on flat sequences, optionally rounded to class labels first
    Rounded(fn(&[f64], &[f64], bool) -> f64),
    /// Scored on `samples x classes` matrices
    Matrix(fn(ArrayView2<f64>, ArrayView2<f64>) -> f64),
}

/// A named metric registered under one category
#[derive(Clone, Copy)]
pub struct Metric {
    name: &'static str,
    category: MetricCategory,
    func: MetricFn,
}

impl Metric {
    /// Metric scored on unrounded flat sequences
    pub const fn plain(
        name: &'static str,
        category: MetricCategory,
        func: fn(&[f64], &[f64]) -> f64,
    ) -> Self {
        Metric {
            name,
            category,
            func: MetricFn::Plain(func),
        }
    }

    /// Classification metric that accepts the `round` option
    pub const fn rounded(name: &'static str, func: fn(&[f64], &[f64], bool) -> f64) -> Self {
        Metric {
            name,
            category: MetricCategory::Classification,
            func: MetricFn::Rounded(func),
        }
    }

    /// Categorical metric over one-hot matrices
    pub const fn matrix(
        name: &'static str,
        func: fn(ArrayView2<f64>, ArrayView2<f64>) -> f64,
    ) -> Self {
        Metric {
            name,
            category: MetricCategory::Categorical,
            func: MetricFn::Matrix(func),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn category(&self) -> MetricCategory {
        self.category
    }

    /// Whether the metric rounds its inputs to class labels before scoring
    pub fn rounds_inputs(&self) -> bool {
        matches!(self.func, MetricFn::Rounded(_))
    }

    /// Whether the metric expects `samples x classes` matrices
    pub fn is_matrix(&self) -> bool {
        matches!(self.func, MetricFn::Matrix(_))
    }

    /// Score flat sequences with rounding enabled
    pub fn score(&self, y: &[f64], z: &[f64]) -> Result<f64> {
        self.score_with_rounding(y, z, true)
    }

    /// Score flat sequences; `round` only affects metrics that round
    pub fn score_with_rounding(&self, y: &[f64], z: &[f64], round: bool) -> Result<f64> {
        match self.func {
            MetricFn::Plain(f) => Ok(f(y, z)),
            MetricFn::Rounded(f) => Ok(f(y, z, round)),
            MetricFn::Matrix(_) => Err(Error::InvalidMetric(format!(
                "'{}' は行列入力を必要とします",
                self.name
            ))),
        }
    }

    /// Score one-hot matrices
    pub fn score_matrix(&self, y: ArrayView2<f64>, z: ArrayView2<f64>) -> Result<f64> {
        match self.func {
            MetricFn::Matrix(f) => Ok(f(y, z)),
            _ => Err(Error::InvalidMetric(format!(
                "'{}' は行列入力に対応していません",
                self.name
            ))),
        }
    }
}

impl PartialEq for Metric {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.category == other.category
    }
}

impl Eq for Metric {}

impl fmt::Debug for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Metric")
            .field("name", &self.name)
            .field("category", &self.category)
            .field("rounds_inputs", &self.rounds_inputs())
            .finish()
    }
}

/// Round values to the nearest class label, ties to even
pub fn round_labels(values: &[f64]) -> Vec<f64> {
    values.iter().map(|v| v.round_ties_even()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_labels_ties_to_even() {
        let rounded = round_labels(&[0.5, 1.5, 0.49, 0.51, 2.5]);
        assert_eq!(rounded, vec![0.0, 2.0, 0.0, 1.0, 2.0]);
    }

    #[test]
    fn test_matrix_metric_rejects_flat_input() {
        let metric = registry().get("cat_acc").unwrap();
        assert!(metric.is_matrix());
        assert!(matches!(
            metric.score(&[1.0], &[1.0]),
            Err(Error::InvalidMetric(_))
        ));
    }

    #[test]
    fn test_flat_metric_rejects_matrix_input() {
        let metric = registry().get("mse").unwrap();
        let y = ndarray::array![[1.0, 0.0]];
        assert!(matches!(
            metric.score_matrix(y.view(), y.view()),
            Err(Error::InvalidMetric(_))
        ));
    }
}
