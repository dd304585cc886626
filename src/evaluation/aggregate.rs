//! 複数出力の評価とロング形式レポートの生成

use ndarray::{ArrayD, Ix2};
use rayon::prelude::*;

use super::dispatch::{get_output_metrics, STATS_CAT_VAR};
use super::{evaluate_cat_with_rounding, evaluate_with_rounding, EvalResult, NamedArrays};
use crate::config::EvalConfig;
use crate::error::{Error, Result};
use crate::metrics::registry::categorical_metrics;
use crate::report::{LongReport, LongRow};

/// モデルのすべての出力を真の値に対して評価する
#[derive(Debug, Clone, Default)]
pub struct Evaluator {
    config: EvalConfig,
}

impl Evaluator {
    pub fn new(config: EvalConfig) -> Result<Self> {
        config.validate()?;
        Ok(Evaluator { config })
    }

    pub fn config(&self) -> &EvalConfig {
        &self.config
    }

    /// 出力名に応じた評価方法と指標セットで1つの出力を評価
    pub fn evaluate_output(
        &self,
        name: &str,
        y: &ArrayD<f64>,
        z: &ArrayD<f64>,
    ) -> Result<EvalResult> {
        let result = if name == STATS_CAT_VAR {
            let y = y.view().into_dimensionality::<Ix2>().map_err(|_| {
                Error::DimensionMismatch(format!(
                    "出力 '{}' は2次元配列である必要があります: {:?}",
                    name,
                    y.shape()
                ))
            })?;
            let z = z.view().into_dimensionality::<Ix2>().map_err(|_| {
                Error::DimensionMismatch(format!(
                    "出力 '{}' の予測値は2次元配列である必要があります: {:?}",
                    name,
                    z.shape()
                ))
            })?;
            evaluate_cat_with_rounding(
                &y,
                &z,
                categorical_metrics(),
                &self.config.binary_metrics()?,
                self.config.round,
            )?
        } else {
            let metrics = get_output_metrics(name)?;
            evaluate_with_rounding(y, z, self.config.mask, &metrics, self.config.round)?
        };

        log::debug!("evaluated output '{}' on {} samples", name, result.n());
        for (metric, value) in result.scores() {
            if value.is_nan() {
                log::debug!("metric '{}' is undefined for output '{}'", metric, name);
            }
        }
        Ok(result)
    }

    fn output_rows(&self, name: &str, y: &ArrayD<f64>, preds: &NamedArrays) -> Result<Vec<LongRow>> {
        let z = preds
            .get(name)
            .ok_or_else(|| Error::MissingPrediction(name.to_string()))?;
        let result = self.evaluate_output(name, y, z)?;
        Ok(LongReport::from_result(name, &result).rows().to_vec())
    }

    /// すべての出力を評価し、`(metric, value)` 順のレポートにまとめる
    ///
    /// 出力は挿入順に処理します。`parallel` が有効な場合は並列に評価しますが、
    /// 結果は同じ順序で集めるため、レポートはスケジューリングに依存しません。
    ///
    /// # Arguments
    /// * `outputs` - 出力名ごとの真の値
    /// * `preds` - 出力名ごとの予測値
    ///
    /// # Returns
    /// * `Result<LongReport>` - 列 `metric, output, value` のレポート
    pub fn evaluate_outputs(&self, outputs: &NamedArrays, preds: &NamedArrays) -> Result<LongReport> {
        let per_output: Vec<Result<Vec<LongRow>>> = if self.config.parallel {
            outputs
                .entries()
                .par_iter()
                .map(|(name, y)| self.output_rows(name, y, preds))
                .collect()
        } else {
            outputs
                .iter()
                .map(|(name, y)| self.output_rows(name, y, preds))
                .collect()
        };

        let mut report = LongReport::for_outputs();
        for rows in per_output {
            report.extend_rows(rows?);
        }
        report.sort_by_metric_value();

        log::info!(
            "evaluated {} outputs into {} report rows",
            outputs.len(),
            report.len()
        );
        Ok(report)
    }
}

/// 既定の設定ですべての出力を評価
pub fn evaluate_outputs(outputs: &NamedArrays, preds: &NamedArrays) -> Result<LongReport> {
    Evaluator::default().evaluate_outputs(outputs, preds)
}
