//! Evaluation settings.
//!
//! Settings can be built in code or loaded from a TOML or YAML file:
//!
//! ```toml
//! round = true
//! parallel = true
//! categorical_binary_metrics = ["auc", "acc"]
//!
//! [mask]
//! sentinel = -1.0
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::evaluation::Mask;
use crate::metrics::registry::{self, AUC};
use crate::metrics::Metric;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EvalConfig {
    /// Missing-truth handling for scalar outputs
    pub mask: Mask,
    /// Round inputs of classification metrics to class labels
    pub round: bool,
    /// Evaluate outputs on the rayon thread pool
    pub parallel: bool,
    /// Per-class metrics for the one-hot variance output
    pub categorical_binary_metrics: Vec<String>,
}

impl Default for EvalConfig {
    fn default() -> Self {
        EvalConfig {
            mask: Mask::default(),
            round: true,
            parallel: false,
            categorical_binary_metrics: vec![AUC.to_string()],
        }
    }
}

impl EvalConfig {
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let config: EvalConfig =
            toml::from_str(source).map_err(|e| Error::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_yaml_str(source: &str) -> Result<Self> {
        let config: EvalConfig =
            serde_yaml::from_str(source).map_err(|e| Error::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a `.toml`, `.yaml` or `.yml` file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let source = fs::read_to_string(path)?;
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => Self::from_toml_str(&source),
            Some("yaml") | Some("yml") => Self::from_yaml_str(&source),
            _ => Err(Error::Config(format!(
                "サポートされていない設定ファイル形式です: {}",
                path.display()
            ))),
        }
    }

    /// Check that every metric name is registered and usable per class
    pub fn validate(&self) -> Result<()> {
        for metric in self.binary_metrics()? {
            if metric.is_matrix() {
                return Err(Error::Config(format!(
                    "'{}' はクラスごとの指標として使用できません",
                    metric.name()
                )));
            }
        }
        Ok(())
    }

    pub fn binary_metrics(&self) -> Result<Vec<Metric>> {
        registry::registry().resolve(&self.categorical_binary_metrics)
    }
}
