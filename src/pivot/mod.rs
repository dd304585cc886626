//! ピボットテーブル機能を提供するモジュール
//!
//! Reshapes a long report into one row per key combination and one column
//! per metric. Rows of the pivot are ordered by their key tuple and metric
//! columns by name; [`unstack_report`] then regroups columns by registry
//! order and ranks rows by a single priority metric.

use std::collections::{BTreeMap, BTreeSet};

use crate::error::{Error, Result};
use crate::metrics::registry::{registry, ACC, AUC, MSE};
use crate::report::{cmp_nan_last, Cell, LongReport, ReportTable};

/// 集計関数の種類
///
/// 同じキーと指標を持つ行が複数ある場合に適用します。NaN は無視します。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AggFunction {
    /// 合計
    Sum,
    /// 平均
    #[default]
    Mean,
    /// 最小値
    Min,
    /// 最大値
    Max,
    /// カウント
    Count,
}

impl AggFunction {
    /// 関数名を文字列で取得
    pub fn name(&self) -> &'static str {
        match self {
            AggFunction::Sum => "sum",
            AggFunction::Mean => "mean",
            AggFunction::Min => "min",
            AggFunction::Max => "max",
            AggFunction::Count => "count",
        }
    }

    /// 文字列から集計関数を解析
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "sum" => Some(AggFunction::Sum),
            "mean" | "avg" | "average" => Some(AggFunction::Mean),
            "min" | "minimum" => Some(AggFunction::Min),
            "max" | "maximum" => Some(AggFunction::Max),
            "count" => Some(AggFunction::Count),
            _ => None,
        }
    }

    fn apply(&self, values: &[f64]) -> f64 {
        let present: Vec<f64> = values.iter().copied().filter(|v| !v.is_nan()).collect();
        match self {
            AggFunction::Count => present.len() as f64,
            AggFunction::Sum => present.iter().sum(),
            _ if present.is_empty() => f64::NAN,
            AggFunction::Mean => present.iter().sum::<f64>() / present.len() as f64,
            AggFunction::Min => present.iter().copied().fold(f64::INFINITY, f64::min),
            AggFunction::Max => present.iter().copied().fold(f64::NEG_INFINITY, f64::max),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct WideRow {
    pub keys: Vec<String>,
    /// 指標列ごとのセル。ロング形式に行がなかった場合は `None`
    pub values: Vec<Option<f64>>,
}

/// ピボット後のレポート（キー列の後に指標列）
#[derive(Debug, Clone, PartialEq)]
pub struct WideReport {
    key_columns: Vec<String>,
    metric_columns: Vec<String>,
    rows: Vec<WideRow>,
}

impl WideReport {
    pub fn key_columns(&self) -> &[String] {
        &self.key_columns
    }

    pub fn metric_columns(&self) -> &[String] {
        &self.metric_columns
    }

    pub fn rows(&self) -> &[WideRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// キー列と指標列の名前
    pub fn columns(&self) -> Vec<String> {
        self.key_columns
            .iter()
            .chain(self.metric_columns.iter())
            .cloned()
            .collect()
    }

    fn metric_index(&self, metric: &str) -> Option<usize> {
        self.metric_columns.iter().position(|c| c == metric)
    }

    /// キーと指標列で指定したセルを取得
    pub fn get(&self, keys: &[&str], metric: &str) -> Option<f64> {
        let col = self.metric_index(metric)?;
        self.rows
            .iter()
            .find(|row| row.keys.iter().map(String::as_str).eq(keys.iter().copied()))
            .and_then(|row| row.values[col])
    }

    /// 指標列のすべてのセルを行順に取得
    pub fn column_values(&self, metric: &str) -> Option<Vec<Option<f64>>> {
        let col = self.metric_index(metric)?;
        Some(self.rows.iter().map(|row| row.values[col]).collect())
    }

    /// 指標列を並べ替える（`order` は既存の列の順列であること）
    pub fn reorder_columns(&mut self, order: &[String]) -> Result<()> {
        let mut indices = Vec::with_capacity(order.len());
        for name in order {
            let idx = self
                .metric_index(name)
                .ok_or_else(|| Error::Consistency(format!("列が見つかりません: {}", name)))?;
            if indices.contains(&idx) {
                return Err(Error::Consistency(format!("列 '{}' が重複しています", name)));
            }
            indices.push(idx);
        }
        if indices.len() != self.metric_columns.len() {
            return Err(Error::LengthMismatch {
                expected: self.metric_columns.len(),
                actual: indices.len(),
            });
        }

        self.metric_columns = order.to_vec();
        for row in &mut self.rows {
            row.values = indices.iter().map(|&i| row.values[i]).collect();
        }
        Ok(())
    }

    /// 指標列で安定ソート（欠損値と NaN は末尾）
    pub fn sort_by_metric(&mut self, metric: &str, ascending: bool) -> Result<()> {
        let col = self
            .metric_index(metric)
            .ok_or_else(|| Error::Consistency(format!("列が見つかりません: {}", metric)))?;
        self.rows.sort_by(|a, b| {
            let a = a.values[col].unwrap_or(f64::NAN);
            let b = b.values[col].unwrap_or(f64::NAN);
            cmp_nan_last(a, b, ascending)
        });
        Ok(())
    }

    /// ロング形式に戻す（値のあるセルごとに1行）
    pub fn to_long(&self) -> Result<LongReport> {
        let mut report = LongReport::new(self.key_columns.clone())?;
        for row in &self.rows {
            for (metric, value) in self.metric_columns.iter().zip(row.values.iter()) {
                if let Some(value) = value {
                    report.push(metric.clone(), row.keys.clone(), *value)?;
                }
            }
        }
        Ok(report)
    }
}

impl ReportTable for WideReport {
    fn column_names(&self) -> Vec<String> {
        self.columns()
    }

    fn row_count(&self) -> usize {
        self.rows.len()
    }

    fn row_cells(&self, row: usize) -> Vec<Cell> {
        let row = &self.rows[row];
        row.keys
            .iter()
            .map(|key| Cell::Text(key.clone()))
            .chain(row.values.iter().map(|value| match value {
                Some(v) => Cell::Number(*v),
                None => Cell::Missing,
            }))
            .collect()
    }
}

/// ピボットテーブルを作成するための構造体
#[derive(Debug)]
pub struct PivotTable<'a> {
    /// 元のレポート
    report: &'a LongReport,

    /// 集計関数
    aggfunc: AggFunction,
}

impl<'a> PivotTable<'a> {
    pub fn new(report: &'a LongReport, aggfunc: AggFunction) -> Self {
        PivotTable { report, aggfunc }
    }

    /// ピボットテーブルを実行して新しいレポートを生成
    ///
    /// 行はキーの昇順、指標列は名前の昇順になります。
    pub fn execute(&self) -> WideReport {
        let metric_columns: Vec<String> = self
            .report
            .rows()
            .iter()
            .map(|row| row.metric.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        // キー -> (メトリクス -> 値のリスト)
        let mut groups: BTreeMap<&[String], BTreeMap<&str, Vec<f64>>> = BTreeMap::new();
        for row in self.report.rows() {
            groups
                .entry(row.keys.as_slice())
                .or_default()
                .entry(row.metric.as_str())
                .or_default()
                .push(row.value);
        }

        let rows = groups
            .into_iter()
            .map(|(keys, cells)| WideRow {
                keys: keys.to_vec(),
                values: metric_columns
                    .iter()
                    .map(|metric| cells.get(metric.as_str()).map(|v| self.aggfunc.apply(v)))
                    .collect(),
            })
            .collect();

        WideReport {
            key_columns: self.report.key_columns().to_vec(),
            metric_columns,
            rows,
        }
    }
}

/// 指標列をレジストリの宣言順にグループ化
///
/// 列は名前が前方一致する最初の登録済み指標のグループに入るため、
/// `auc_0` のようなクラスごとの列は `auc` の後に並びます。
/// 一致しない列は相対順序を保って末尾に置きます。
pub fn sort_metric_columns(columns: &[String]) -> Vec<String> {
    let mut sorted: Vec<String> = Vec::with_capacity(columns.len());
    for metric in registry().declaration_order() {
        for column in columns {
            if column.starts_with(metric.name()) && !sorted.contains(column) {
                sorted.push(column.clone());
            }
        }
    }
    for column in columns {
        if !sorted.contains(column) {
            sorted.push(column.clone());
        }
    }
    sorted
}

/// 行の並べ替えに使う列と方向
///
/// `auc`（降順）、`mse`（昇順）、`acc`（降順）のうち最初に存在するものだけを使います。
pub fn priority_sort_key(metric_columns: &[String]) -> Option<(&'static str, bool)> {
    [(AUC, false), (MSE, true), (ACC, false)]
        .into_iter()
        .find(|(metric, _)| metric_columns.iter().any(|c| c == metric))
}

/// ロング形式のレポートをワイド形式にピボットし、並べ替える
///
/// # Arguments
/// * `report` - ロング形式のレポート
///
/// # Returns
/// * `Result<WideReport>` - キー列、レジストリ順の指標列を持ち、優先指標で並べ替えたレポート
pub fn unstack_report(report: &LongReport) -> Result<WideReport> {
    let mut wide = PivotTable::new(report, AggFunction::Mean).execute();

    let order = sort_metric_columns(wide.metric_columns());
    wide.reorder_columns(&order)?;

    if let Some((metric, ascending)) = priority_sort_key(wide.metric_columns()) {
        wide.sort_by_metric(metric, ascending)?;
    }
    Ok(wide)
}
