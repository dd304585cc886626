//! Global, read-only catalogue of metrics grouped by category.
//!
//! The registry is built once on first use and never mutated afterwards.
//! Group order is significant: it fixes the order metrics are computed in
//! and the order report columns are laid out in.

use std::collections::HashMap;

use lazy_static::lazy_static;

use super::{categorical, classification, regression, Metric, MetricCategory};
use crate::error::{Error, Result};

pub const AUC: &str = "auc";
pub const ACC: &str = "acc";
pub const TPR: &str = "tpr";
pub const TNR: &str = "tnr";
pub const F1: &str = "f1";
pub const MCC: &str = "mcc";
pub const MSE: &str = "mse";
pub const MAD: &str = "mad";
pub const COR: &str = "cor";
pub const RMSE: &str = "rmse";
pub const RRMSE: &str = "rrmse";
pub const CAT_ACC: &str = "cat_acc";

lazy_static! {
    static ref REGISTRY: MetricRegistry = MetricRegistry::new();
}

/// Access the process-wide registry
pub fn registry() -> &'static MetricRegistry {
    &REGISTRY
}

/// Look up a metric by its registered name
pub fn get(name: &str) -> Result<Metric> {
    registry().get(name)
}

/// Default metric set for binary outputs
pub fn classification_metrics() -> &'static [Metric] {
    registry().classification()
}

/// Default metric set for continuous outputs
pub fn regression_metrics() -> &'static [Metric] {
    registry().regression()
}

/// Default metric set for one-hot outputs
pub fn categorical_metrics() -> &'static [Metric] {
    registry().categorical()
}

#[derive(Debug)]
pub struct MetricRegistry {
    categorical: Vec<Metric>,
    classification: Vec<Metric>,
    regression: Vec<Metric>,
    by_name: HashMap<&'static str, Metric>,
}

impl MetricRegistry {
    fn new() -> Self {
        let categorical = vec![Metric::matrix(CAT_ACC, categorical::cat_acc)];
        let classification = vec![
            Metric::rounded(AUC, classification::auc),
            Metric::rounded(ACC, classification::acc),
            Metric::rounded(TPR, classification::tpr),
            Metric::rounded(TNR, classification::tnr),
            Metric::rounded(F1, classification::f1),
            Metric::rounded(MCC, classification::mcc),
        ];
        let regression = vec![
            Metric::plain(MSE, MetricCategory::Regression, regression::mse),
            Metric::plain(MAD, MetricCategory::Regression, regression::mad),
            Metric::plain(COR, MetricCategory::Regression, regression::cor),
        ];
        // lookup-only, not part of any default group
        let extra = [
            Metric::plain(RMSE, MetricCategory::Regression, regression::rmse),
            Metric::plain(RRMSE, MetricCategory::Regression, regression::rrmse),
        ];

        let mut by_name = HashMap::new();
        for metric in categorical
            .iter()
            .chain(classification.iter())
            .chain(regression.iter())
            .chain(extra.iter())
        {
            let previous = by_name.insert(metric.name(), *metric);
            debug_assert!(previous.is_none(), "duplicate metric name {}", metric.name());
        }

        MetricRegistry {
            categorical,
            classification,
            regression,
            by_name,
        }
    }

    pub fn classification(&self) -> &[Metric] {
        &self.classification
    }

    pub fn regression(&self) -> &[Metric] {
        &self.regression
    }

    pub fn categorical(&self) -> &[Metric] {
        &self.categorical
    }

    /// Default group for a category
    pub fn group(&self, category: MetricCategory) -> &[Metric] {
        match category {
            MetricCategory::Categorical => &self.categorical,
            MetricCategory::Classification => &self.classification,
            MetricCategory::Regression => &self.regression,
        }
    }

    /// Grouped metrics in declaration order: categorical, classification, regression
    pub fn declaration_order(&self) -> impl Iterator<Item = &Metric> + '_ {
        self.categorical
            .iter()
            .chain(self.classification.iter())
            .chain(self.regression.iter())
    }

    /// Look up a metric by name, including lookup-only metrics
    pub fn get(&self, name: &str) -> Result<Metric> {
        self.by_name
            .get(name)
            .copied()
            .ok_or_else(|| Error::UnknownMetric(name.to_string()))
    }

    /// Resolve a list of names, preserving order
    pub fn resolve<S: AsRef<str>>(&self, names: &[S]) -> Result<Vec<Metric>> {
        names.iter().map(|name| self.get(name.as_ref())).collect()
    }

    /// All registered names, sorted
    pub fn names(&self) -> Vec<&'static str> {
        let mut names: Vec<&'static str> = self.by_name.keys().copied().collect();
        names.sort_unstable();
        names
    }
}
