//! 回帰モデル評価のためのメトリクス

fn mean(values: impl Iterator<Item = f64>, len: usize) -> f64 {
    if len == 0 {
        return f64::NAN;
    }
    values.sum::<f64>() / len as f64
}

/// 平均二乗誤差（Mean Squared Error）を計算
///
/// # Arguments
/// * `y` - 真の値
/// * `z` - 予測値
///
/// # Returns
/// * `f64` - 平均二乗誤差。空の入力では `NaN`
pub fn mse(y: &[f64], z: &[f64]) -> f64 {
    mean(y.iter().zip(z.iter()).map(|(t, p)| (t - p) * (t - p)), y.len())
}

/// 平均絶対偏差（Mean Absolute Deviation）を計算
///
/// # Arguments
/// * `y` - 真の値
/// * `z` - 予測値
///
/// # Returns
/// * `f64` - 平均絶対偏差。空の入力では `NaN`
pub fn mad(y: &[f64], z: &[f64]) -> f64 {
    mean(y.iter().zip(z.iter()).map(|(t, p)| (t - p).abs()), y.len())
}

/// ピアソン相関係数を計算
///
/// # Returns
/// * `f64` - 相関係数（-1〜1）。サンプルが2未満、または分散が0の場合は `NaN`
pub fn cor(y: &[f64], z: &[f64]) -> f64 {
    let n = y.len();
    if n < 2 {
        return f64::NAN;
    }
    let y_mean = mean(y.iter().copied(), n);
    let z_mean = mean(z.iter().copied(), n);

    let mut cov = 0.0;
    let mut var_y = 0.0;
    let mut var_z = 0.0;
    for (&t, &p) in y.iter().zip(z.iter()) {
        let dy = t - y_mean;
        let dz = p - z_mean;
        cov += dy * dz;
        var_y += dy * dy;
        var_z += dz * dz;
    }

    if var_y == 0.0 || var_z == 0.0 {
        return f64::NAN;
    }
    cov / (var_y * var_z).sqrt()
}

/// 平均二乗誤差の平方根（Root Mean Squared Error）を計算
pub fn rmse(y: &[f64], z: &[f64]) -> f64 {
    mse(y, z).sqrt()
}

/// 1 - RMSE を計算
pub fn rrmse(y: &[f64], z: &[f64]) -> f64 {
    1.0 - rmse(y, z)
}
