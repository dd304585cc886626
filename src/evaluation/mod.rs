//! 出力ごとの評価
//!
//! [`evaluate`] はマスクされた真の値を除いてスカラー出力を評価し、
//! [`evaluate_cat`] はラベルのない行を除いて one-hot 出力を評価します。
//! どちらも最後の要素がサンプル数 `n` である [`EvalResult`] を返します。

pub mod aggregate;
pub mod dispatch;
pub mod outputs;

use ndarray::{ArrayBase, Axis, Data, Dimension, Ix2};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::metrics::Metric;

pub use aggregate::{evaluate_outputs, Evaluator};
pub use dispatch::get_output_metrics;
pub use outputs::NamedArrays;

/// 観測されていないサンプルを示す真の値
pub const MISSING_VALUE: f64 = -1.0;

/// 評価結果におけるサンプル数のキー
pub const N_SAMPLES_KEY: &str = "n";

/// マスク対象の真の値の判定方法
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mask {
    /// すべてのサンプルを評価
    Disabled,
    /// 真の値がこの値に等しいサンプルを除外
    Sentinel(f64),
}

impl Default for Mask {
    fn default() -> Self {
        Mask::Sentinel(MISSING_VALUE)
    }
}

/// 1つの出力に対する順序付きメトリクス値
#[derive(Debug, Clone, Serialize)]
pub struct EvalResult {
    scores: Vec<(String, f64)>,
    n: usize,
}

impl EvalResult {
    fn new(n: usize) -> Self {
        EvalResult {
            scores: Vec::new(),
            n,
        }
    }

    fn push(&mut self, name: impl Into<String>, value: f64) {
        self.scores.push((name.into(), value));
    }

    /// 評価に使われたサンプル数
    pub fn n(&self) -> usize {
        self.n
    }

    /// 計算順のメトリクス値（`n` を含まない）
    pub fn scores(&self) -> &[(String, f64)] {
        &self.scores
    }

    /// キーに対応する値を取得（`"n"` はサンプル数）
    pub fn get(&self, name: &str) -> Option<f64> {
        if name == N_SAMPLES_KEY {
            return Some(self.n as f64);
        }
        self.scores
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| *value)
    }

    /// すべての要素を順に返す（最後は `n`）
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> + '_ {
        self.scores
            .iter()
            .map(|(key, value)| (key.as_str(), *value))
            .chain(std::iter::once((N_SAMPLES_KEY, self.n as f64)))
    }

    pub fn keys(&self) -> Vec<&str> {
        self.iter().map(|(key, _)| key).collect()
    }

    /// 要素数（`n` を含む）
    pub fn len(&self) -> usize {
        self.scores.len() + 1
    }

    /// `n` は常に含まれるため、結果が空になることはありません
    pub fn is_empty(&self) -> bool {
        false
    }
}

/// 両配列を平坦化し、真の値がセンチネルに等しい位置を除外
///
/// # Arguments
/// * `y` - 真の値
/// * `z` - 予測値
/// * `mask` - マスクの設定
///
/// # Returns
/// * `Result<(Vec<f64>, Vec<f64>)>` - 残った真の値と予測値。要素数が異なる場合は `LengthMismatch`
pub fn mask_pairs<S, T, D, E>(
    y: &ArrayBase<S, D>,
    z: &ArrayBase<T, E>,
    mask: Mask,
) -> Result<(Vec<f64>, Vec<f64>)>
where
    S: Data<Elem = f64>,
    T: Data<Elem = f64>,
    D: Dimension,
    E: Dimension,
{
    if y.len() != z.len() {
        return Err(Error::LengthMismatch {
            expected: y.len(),
            actual: z.len(),
        });
    }

    let pairs = y.iter().zip(z.iter());
    let (y, z): (Vec<f64>, Vec<f64>) = match mask {
        Mask::Disabled => pairs.map(|(&t, &p)| (t, p)).unzip(),
        Mask::Sentinel(value) => pairs
            .filter(|&(&t, _)| t != value)
            .map(|(&t, &p)| (t, p))
            .unzip(),
    };
    Ok((y, z))
}

/// スカラー出力を `metrics` のすべての指標で評価
///
/// 任意の次元の配列を論理順に平坦化してからマスクします。
/// 分類指標は入力を丸めてから計算します。
///
/// # Arguments
/// * `y` - 真の値
/// * `z` - 予測値
/// * `mask` - マスクの設定（既定は `-1` を欠損とする）
/// * `metrics` - 計算する指標（順序を保持）
///
/// # Returns
/// * `Result<EvalResult>` - 指標ごとの値と、最後にサンプル数 `n`
pub fn evaluate<S, T, D, E>(
    y: &ArrayBase<S, D>,
    z: &ArrayBase<T, E>,
    mask: Mask,
    metrics: &[Metric],
) -> Result<EvalResult>
where
    S: Data<Elem = f64>,
    T: Data<Elem = f64>,
    D: Dimension,
    E: Dimension,
{
    evaluate_with_rounding(y, z, mask, metrics, true)
}

/// 分類指標の `round` オプションを明示的に指定する [`evaluate`]
pub fn evaluate_with_rounding<S, T, D, E>(
    y: &ArrayBase<S, D>,
    z: &ArrayBase<T, E>,
    mask: Mask,
    metrics: &[Metric],
    round: bool,
) -> Result<EvalResult>
where
    S: Data<Elem = f64>,
    T: Data<Elem = f64>,
    D: Dimension,
    E: Dimension,
{
    let (y, z) = mask_pairs(y, z, mask)?;
    let mut result = EvalResult::new(y.len());
    for metric in metrics {
        result.push(metric.name(), metric.score_with_rounding(&y, &z, round)?);
    }
    Ok(result)
}

/// one-hot 出力を評価
///
/// 真の値の行和が 0 の行はラベルを持たないため除外します。
/// 2クラス指標はクラス列ごとにも計算し、`"<metric>_<class>"` として格納します。
///
/// # Arguments
/// * `y` - one-hot 形式の真の値（サンプル × クラス）
/// * `z` - 予測値（サンプル × クラス）
/// * `metrics` - 多クラス指標
/// * `binary_metrics` - クラスごとに計算する2クラス指標
///
/// # Returns
/// * `Result<EvalResult>` - 多クラス指標、クラスごとの指標、最後にサンプル数 `n`
pub fn evaluate_cat<S, T>(
    y: &ArrayBase<S, Ix2>,
    z: &ArrayBase<T, Ix2>,
    metrics: &[Metric],
    binary_metrics: &[Metric],
) -> Result<EvalResult>
where
    S: Data<Elem = f64>,
    T: Data<Elem = f64>,
{
    evaluate_cat_with_rounding(y, z, metrics, binary_metrics, true)
}

/// 2クラス指標の `round` オプションを明示的に指定する [`evaluate_cat`]
pub fn evaluate_cat_with_rounding<S, T>(
    y: &ArrayBase<S, Ix2>,
    z: &ArrayBase<T, Ix2>,
    metrics: &[Metric],
    binary_metrics: &[Metric],
    round: bool,
) -> Result<EvalResult>
where
    S: Data<Elem = f64>,
    T: Data<Elem = f64>,
{
    if y.dim() != z.dim() {
        return Err(Error::DimensionMismatch(format!(
            "真の値 {:?} と予測値 {:?} の形状が一致しません",
            y.dim(),
            z.dim()
        )));
    }

    let labelled: Vec<usize> = y
        .rows()
        .into_iter()
        .enumerate()
        .filter(|(_, row)| row.sum() > 0.0)
        .map(|(i, _)| i)
        .collect();
    let y = y.select(Axis(0), &labelled);
    let z = z.select(Axis(0), &labelled);

    let mut result = EvalResult::new(labelled.len());
    for metric in metrics {
        result.push(metric.name(), metric.score_matrix(y.view(), z.view())?);
    }
    if !binary_metrics.is_empty() {
        for class in 0..y.ncols() {
            let y_class = y.column(class).to_vec();
            let z_class = z.column(class).to_vec();
            for metric in binary_metrics {
                let value = metric.score_with_rounding(&y_class, &z_class, round)?;
                result.push(format!("{}_{}", metric.name(), class), value);
            }
        }
    }
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::registry::{self, categorical_metrics, classification_metrics};
    use ndarray::{array, Array1};

    #[test]
    fn test_mask_pairs_preserves_order() {
        let y = array![1.0, -1.0, 0.0, -1.0, 1.0];
        let z = array![0.1, 0.2, 0.3, 0.4, 0.5];
        let (ym, zm) = mask_pairs(&y, &z, Mask::default()).unwrap();
        assert_eq!(ym, vec![1.0, 0.0, 1.0]);
        assert_eq!(zm, vec![0.1, 0.3, 0.5]);

        let (ym, zm) = mask_pairs(&y, &z, Mask::Disabled).unwrap();
        assert_eq!(ym.len(), 5);
        assert_eq!(zm, z.to_vec());
    }

    #[test]
    fn test_mask_pairs_length_mismatch() {
        let y = array![1.0, 0.0];
        let z = array![0.5];
        assert!(matches!(
            mask_pairs(&y, &z, Mask::Disabled),
            Err(Error::LengthMismatch { expected: 2, actual: 1 })
        ));
    }

    #[test]
    fn test_evaluate_flattens_matrices() {
        let y = array![[0.0, 1.0], [-1.0, 1.0]];
        let z = array![[0.1, 0.9], [0.5, 0.7]];
        let result = evaluate(&y, &z, Mask::default(), classification_metrics()).unwrap();
        assert_eq!(result.n(), 3);
        assert_eq!(result.get("acc"), Some(1.0));
    }

    #[test]
    fn test_result_keys_end_with_n() {
        let y: Array1<f64> = array![0.0, 1.0];
        let result = evaluate(&y, &y, Mask::Disabled, classification_metrics()).unwrap();
        assert_eq!(
            result.keys(),
            vec!["auc", "acc", "tpr", "tnr", "f1", "mcc", "n"]
        );
        assert_eq!(result.len(), 7);
        assert_eq!(result.get("n"), Some(2.0));
        assert_eq!(result.get("mse"), None);
    }

    #[test]
    fn test_result_without_samples_still_holds_n() {
        let y: Array1<f64> = array![-1.0, -1.0];
        let result = evaluate(&y, &y, Mask::default(), &[]).unwrap();
        assert!(!result.is_empty());
        assert_eq!(result.len(), 1);
        assert_eq!(result.keys(), vec!["n"]);
        assert_eq!(result.get("n"), Some(0.0));
    }

    #[test]
    fn test_evaluate_without_rounding() {
        let y = array![0.0, 1.0];
        let z = array![0.2, 0.8];
        let metrics = vec![registry::get("acc").unwrap()];
        let rounded = evaluate_with_rounding(&y, &z, Mask::Disabled, &metrics, true).unwrap();
        let raw = evaluate_with_rounding(&y, &z, Mask::Disabled, &metrics, false).unwrap();
        assert_eq!(rounded.get("acc"), Some(1.0));
        assert_eq!(raw.get("acc"), Some(0.0));
    }

    #[test]
    fn test_evaluate_rejects_matrix_metric() {
        let y = array![0.0, 1.0];
        assert!(matches!(
            evaluate(&y, &y, Mask::Disabled, categorical_metrics()),
            Err(Error::InvalidMetric(_))
        ));
    }

    #[test]
    fn test_evaluate_cat_per_class_names() {
        let y = array![[1.0, 0.0, 0.0], [0.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]];
        let z = array![[0.8, 0.1, 0.1], [0.2, 0.2, 0.6], [0.1, 0.7, 0.2], [0.1, 0.2, 0.7]];
        let auc = vec![registry::get("auc").unwrap(), registry::get("acc").unwrap()];
        let result = evaluate_cat(&y, &z, categorical_metrics(), &auc).unwrap();
        assert_eq!(
            result.keys(),
            vec!["cat_acc", "auc_0", "acc_0", "auc_1", "acc_1", "auc_2", "acc_2", "n"]
        );
        assert_eq!(result.n(), 3);
        assert_eq!(result.get("cat_acc"), Some(1.0));
        assert_eq!(result.get("auc_0"), Some(1.0));
    }

    #[test]
    fn test_evaluate_cat_shape_mismatch() {
        let y = array![[1.0, 0.0]];
        let z = array![[1.0, 0.0, 0.0]];
        assert!(matches!(
            evaluate_cat(&y, &z, categorical_metrics(), &[]),
            Err(Error::DimensionMismatch(_))
        ));
    }

    #[test]
    fn test_evaluate_cat_without_labels() {
        let y = array![[0.0, 0.0], [0.0, 0.0]];
        let z = array![[0.3, 0.7], [0.6, 0.4]];
        let result = evaluate_cat(&y, &z, categorical_metrics(), &[]).unwrap();
        assert_eq!(result.n(), 0);
        assert!(result.get("cat_acc").unwrap().is_nan());
    }
}
