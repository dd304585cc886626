//! 分類モデル評価のためのメトリクス
//!
//! ラベル 1 を陽性、それ以外を陰性として扱う2クラス分類指標。
//! `round` が有効な場合、真の値と予測値を最も近いクラスラベルに丸めてから計算します。

use super::round_labels;

/// 2x2 混同行列のカウント
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConfusionCounts {
    pub tp: usize,
    pub fp: usize,
    pub tn: usize,
    pub fn_: usize,
}

impl ConfusionCounts {
    /// ラベル列から混同行列を集計
    pub fn from_labels(y: &[f64], z: &[f64]) -> Self {
        let mut counts = ConfusionCounts::default();
        for (&t, &p) in y.iter().zip(z.iter()) {
            match (t == 1.0, p == 1.0) {
                (true, true) => counts.tp += 1,
                (false, true) => counts.fp += 1,
                (false, false) => counts.tn += 1,
                (true, false) => counts.fn_ += 1,
            }
        }
        counts
    }

    pub fn total(&self) -> usize {
        self.tp + self.fp + self.tn + self.fn_
    }
}

fn prepare(y: &[f64], z: &[f64], round: bool) -> (Vec<f64>, Vec<f64>) {
    if round {
        (round_labels(y), round_labels(z))
    } else {
        (y.to_vec(), z.to_vec())
    }
}

// 空の入力は NaN、分母が 0 の場合は 0
fn ratio_or_zero(num: usize, den: usize, total: usize) -> f64 {
    if total == 0 {
        return f64::NAN;
    }
    if den == 0 {
        return 0.0;
    }
    num as f64 / den as f64
}

fn ratio(num: usize, den: usize) -> f64 {
    if den == 0 {
        return f64::NAN;
    }
    num as f64 / den as f64
}

/// ROC曲線下面積（AUC）を計算
///
/// 真の値のみ丸め、予測値は連続スコアのまま使用します。
/// 同順位は平均順位で扱います（Mann-Whitney U 統計量）。
///
/// # Returns
/// * `f64` - AUC。空の入力、またはクラスがちょうど2つでない場合は `NaN`
pub fn auc(y: &[f64], z: &[f64], round: bool) -> f64 {
    let y = if round { round_labels(y) } else { y.to_vec() };
    if y.is_empty() {
        return f64::NAN;
    }

    let mut classes = y.clone();
    classes.sort_by(|a, b| a.total_cmp(b));
    classes.dedup();
    if classes.len() != 2 {
        return f64::NAN;
    }
    let positive = classes[1];

    let mut ranked: Vec<(f64, bool)> = z
        .iter()
        .zip(y.iter())
        .map(|(&score, &label)| (score, label == positive))
        .collect();
    ranked.sort_by(|a, b| a.0.total_cmp(&b.0));

    let n_pos = ranked.iter().filter(|(_, is_pos)| *is_pos).count();
    let n_neg = ranked.len() - n_pos;

    let mut sum_rank_pos = 0.0;
    let mut start = 0;
    while start < ranked.len() {
        let mut end = start + 1;
        while end < ranked.len() && ranked[end].0 == ranked[start].0 {
            end += 1;
        }
        let avg_rank = (start + 1 + end) as f64 * 0.5;
        sum_rank_pos += avg_rank * ranked[start..end].iter().filter(|(_, p)| *p).count() as f64;
        start = end;
    }

    let n_pos = n_pos as f64;
    let n_neg = n_neg as f64;
    (sum_rank_pos - n_pos * (n_pos + 1.0) * 0.5) / (n_pos * n_neg)
}

/// 正解率（Accuracy）を計算
///
/// # Returns
/// * `f64` - 正解率（0〜1）。空の入力では `NaN`
pub fn acc(y: &[f64], z: &[f64], round: bool) -> f64 {
    let (y, z) = prepare(y, z, round);
    let correct = y.iter().zip(z.iter()).filter(|(t, p)| t == p).count();
    ratio(correct, y.len())
}

/// 真陽性率（再現率, TPR）を計算
///
/// # Returns
/// * `f64` - TP / (TP + FN)。陽性サンプルがない場合は 0、空の入力では `NaN`
pub fn tpr(y: &[f64], z: &[f64], round: bool) -> f64 {
    let (y, z) = prepare(y, z, round);
    let c = ConfusionCounts::from_labels(&y, &z);
    ratio_or_zero(c.tp, c.tp + c.fn_, c.total())
}

/// 真陰性率（特異度, TNR）を計算
///
/// # Returns
/// * `f64` - TN / (TN + FP)。陰性サンプルがない場合は `NaN`
pub fn tnr(y: &[f64], z: &[f64], round: bool) -> f64 {
    let (y, z) = prepare(y, z, round);
    let c = ConfusionCounts::from_labels(&y, &z);
    ratio(c.tn, c.tn + c.fp)
}

/// F1スコアを計算
///
/// # Returns
/// * `f64` - 2TP / (2TP + FP + FN)。TP、FP、FN がすべて 0 の場合は 0、空の入力では `NaN`
pub fn f1(y: &[f64], z: &[f64], round: bool) -> f64 {
    let (y, z) = prepare(y, z, round);
    let c = ConfusionCounts::from_labels(&y, &z);
    ratio_or_zero(2 * c.tp, 2 * c.tp + c.fp + c.fn_, c.total())
}

/// マシューズ相関係数（MCC）を計算
///
/// # Returns
/// * `f64` - MCC（-1〜1）。分母が 0 の場合は 0、空の入力では `NaN`
pub fn mcc(y: &[f64], z: &[f64], round: bool) -> f64 {
    let (y, z) = prepare(y, z, round);
    let c = ConfusionCounts::from_labels(&y, &z);
    if c.total() == 0 {
        return f64::NAN;
    }

    let (tp, fp, tn, fn_) = (c.tp as f64, c.fp as f64, c.tn as f64, c.fn_ as f64);
    let denom = ((tp + fp) * (tp + fn_) * (tn + fp) * (tn + fn_)).sqrt();
    if denom == 0.0 {
        return 0.0;
    }
    (tp * tn - fp * fn_) / denom
}
