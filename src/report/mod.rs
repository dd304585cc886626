//! Long-format (tidy) performance report.
//!
//! One row per `(metric, keys...)` pair. For a report produced by
//! [`evaluate_outputs`](crate::evaluation::evaluate_outputs) the only key
//! column is `output`; extra key columns such as `model` can be appended to
//! compare several reports side by side.

use std::cmp::Ordering;

use serde::Serialize;

use crate::error::{Error, Result};
use crate::evaluation::EvalResult;

pub const METRIC_COLUMN: &str = "metric";
pub const OUTPUT_COLUMN: &str = "output";
pub const VALUE_COLUMN: &str = "value";

/// A single table cell
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Text(String),
    Number(f64),
    /// No value for this key/metric combination
    Missing,
}

/// Tabular view shared by long and wide reports
pub trait ReportTable {
    /// Column names in output order
    fn column_names(&self) -> Vec<String>;

    fn row_count(&self) -> usize;

    /// Cells of one row, aligned with [`column_names`](Self::column_names)
    fn row_cells(&self, row: usize) -> Vec<Cell>;
}

/// Order numbers, placing NaN after every number
pub(crate) fn cmp_nan_last(a: f64, b: f64, ascending: bool) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => {
            let ord = a.partial_cmp(&b).unwrap_or(Ordering::Equal);
            if ascending {
                ord
            } else {
                ord.reverse()
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LongRow {
    pub metric: String,
    /// Values of the key columns, in key-column order
    pub keys: Vec<String>,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LongReport {
    key_columns: Vec<String>,
    rows: Vec<LongRow>,
}

impl LongReport {
    /// Empty report with the given key columns
    pub fn new(key_columns: Vec<String>) -> Result<Self> {
        for name in &key_columns {
            if name == METRIC_COLUMN || name == VALUE_COLUMN {
                return Err(Error::Consistency(format!(
                    "キー列に '{}' は使用できません",
                    name
                )));
            }
        }
        for (i, name) in key_columns.iter().enumerate() {
            if key_columns[..i].contains(name) {
                return Err(Error::Consistency(format!("キー列 '{}' が重複しています", name)));
            }
        }
        Ok(LongReport {
            key_columns,
            rows: Vec::new(),
        })
    }

    /// Empty report keyed by `output`
    pub fn for_outputs() -> Self {
        LongReport {
            key_columns: vec![OUTPUT_COLUMN.to_string()],
            rows: Vec::new(),
        }
    }

    /// Rows `(metric, output, value)` of one evaluation result, `n` included
    pub fn from_result(output: &str, result: &EvalResult) -> Self {
        let mut report = LongReport::for_outputs();
        report.rows = result
            .iter()
            .map(|(metric, value)| LongRow {
                metric: metric.to_string(),
                keys: vec![output.to_string()],
                value,
            })
            .collect();
        report
    }

    pub fn push(
        &mut self,
        metric: impl Into<String>,
        keys: Vec<String>,
        value: f64,
    ) -> Result<()> {
        if keys.len() != self.key_columns.len() {
            return Err(Error::LengthMismatch {
                expected: self.key_columns.len(),
                actual: keys.len(),
            });
        }
        self.rows.push(LongRow {
            metric: metric.into(),
            keys,
            value,
        });
        Ok(())
    }

    pub(crate) fn extend_rows(&mut self, rows: impl IntoIterator<Item = LongRow>) {
        self.rows.extend(rows);
    }

    pub fn key_columns(&self) -> &[String] {
        &self.key_columns
    }

    pub fn rows(&self) -> &[LongRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// `metric`, the key columns, then `value`
    pub fn columns(&self) -> Vec<String> {
        let mut columns = Vec::with_capacity(self.key_columns.len() + 2);
        columns.push(METRIC_COLUMN.to_string());
        columns.extend(self.key_columns.iter().cloned());
        columns.push(VALUE_COLUMN.to_string());
        columns
    }

    /// Append a key column holding the same value on every row
    pub fn with_key_column(mut self, name: impl Into<String>, value: impl Into<String>) -> Result<Self> {
        let name = name.into();
        if name == METRIC_COLUMN || name == VALUE_COLUMN || self.key_columns.contains(&name) {
            return Err(Error::Consistency(format!("列 '{}' は既に存在します", name)));
        }
        let value = value.into();
        self.key_columns.push(name);
        for row in &mut self.rows {
            row.keys.push(value.clone());
        }
        Ok(self)
    }

    /// Concatenate reports that share the same key columns
    pub fn concat(reports: impl IntoIterator<Item = LongReport>) -> Result<LongReport> {
        let mut reports = reports.into_iter();
        let mut combined = match reports.next() {
            Some(first) => first,
            None => return Ok(LongReport::for_outputs()),
        };
        for report in reports {
            if report.key_columns != combined.key_columns {
                return Err(Error::Consistency(format!(
                    "キー列が一致しません: {:?} vs {:?}",
                    combined.key_columns, report.key_columns
                )));
            }
            combined.rows.extend(report.rows);
        }
        Ok(combined)
    }

    /// Stable sort by metric name, then value ascending with NaN last
    pub fn sort_by_metric_value(&mut self) {
        self.rows.sort_by(|a, b| {
            a.metric
                .cmp(&b.metric)
                .then_with(|| cmp_nan_last(a.value, b.value, true))
        });
    }

    /// Value of the first row matching `metric` and `keys`
    pub fn value(&self, metric: &str, keys: &[&str]) -> Option<f64> {
        self.rows
            .iter()
            .find(|row| row.metric == metric && row.keys.iter().map(String::as_str).eq(keys.iter().copied()))
            .map(|row| row.value)
    }

    /// Distinct metric names in first-seen order
    pub fn metrics(&self) -> Vec<&str> {
        let mut metrics: Vec<&str> = Vec::new();
        for row in &self.rows {
            if !metrics.contains(&row.metric.as_str()) {
                metrics.push(&row.metric);
            }
        }
        metrics
    }
}

impl ReportTable for LongReport {
    fn column_names(&self) -> Vec<String> {
        self.columns()
    }

    fn row_count(&self) -> usize {
        self.rows.len()
    }

    fn row_cells(&self, row: usize) -> Vec<Cell> {
        let row = &self.rows[row];
        let mut cells = Vec::with_capacity(row.keys.len() + 2);
        cells.push(Cell::Text(row.metric.clone()));
        cells.extend(row.keys.iter().map(|key| Cell::Text(key.clone())));
        cells.push(Cell::Number(row.value));
        cells
    }
}
