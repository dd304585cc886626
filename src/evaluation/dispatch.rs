//! 出力名から指標セットへの対応付け
//!
//! 出力名は固定の規約に従います。サイトごとの2値出力は `cpg`、
//! バルク出力は `bulk` で始まり、要約統計量は `stats/` 以下に置かれます。

use crate::error::{Error, Result};
use crate::metrics::registry::{classification_metrics, regression_metrics};
use crate::metrics::Metric;

pub const CPG_PREFIX: &str = "cpg";
pub const BULK_PREFIX: &str = "bulk";

pub const STATS_DIFF: &str = "stats/diff";
pub const STATS_MODE: &str = "stats/mode";
pub const STATS_CAT2_VAR: &str = "stats/cat2_var";
pub const STATS_MEAN: &str = "stats/mean";
pub const STATS_VAR: &str = "stats/var";
/// one-hot 形式の分散カテゴリ（多クラス評価で扱う）
pub const STATS_CAT_VAR: &str = "stats/cat_var";

const BINARY_STATS: [&str; 3] = [STATS_DIFF, STATS_MODE, STATS_CAT2_VAR];

fn regression_then_classification() -> Vec<Metric> {
    regression_metrics()
        .iter()
        .chain(classification_metrics())
        .copied()
        .collect()
}

/// 出力名に対応する指標セットを取得
///
/// # Arguments
/// * `output_name` - 出力名
///
/// # Returns
/// * `Result<Vec<Metric>>` - 指標セット。規約に一致しない名前は `UnrecognizedOutput`
pub fn get_output_metrics(output_name: &str) -> Result<Vec<Metric>> {
    let metrics = if output_name.starts_with(CPG_PREFIX) {
        classification_metrics().to_vec()
    } else if output_name.starts_with(BULK_PREFIX) {
        regression_then_classification()
    } else if BINARY_STATS.contains(&output_name) {
        classification_metrics().to_vec()
    } else if output_name == STATS_MEAN {
        regression_then_classification()
    } else if output_name == STATS_VAR {
        regression_metrics().to_vec()
    } else {
        return Err(Error::UnrecognizedOutput(output_name.to_string()));
    };
    Ok(metrics)
}
