//! 多クラス分類（one-hot）のためのメトリクス

use ndarray::{ArrayView1, ArrayView2};

/// Index of the first maximum in a row
fn argmax(row: ArrayView1<f64>) -> usize {
    let mut best = 0;
    for (i, &v) in row.iter().enumerate() {
        if v > row[best] {
            best = i;
        }
    }
    best
}

/// 行ごとの argmax が一致する割合（多クラス正解率）を計算
///
/// # Arguments
/// * `y` - one-hot 形式の真の値（サンプル × クラス）
/// * `z` - 予測値（サンプル × クラス）
///
/// # Returns
/// * `f64` - 正解率。行がない場合は `NaN`
pub fn cat_acc(y: ArrayView2<f64>, z: ArrayView2<f64>) -> f64 {
    let rows = y.nrows();
    if rows == 0 {
        return f64::NAN;
    }
    let correct = y
        .rows()
        .into_iter()
        .zip(z.rows())
        .filter(|(t, p)| argmax(*t) == argmax(*p))
        .count();
    correct as f64 / rows as f64
}
