use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use serde_json::{Map, Number, Value};

use crate::error::Result;
use crate::report::{Cell, ReportTable};

/// JSON出力形式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonOrient {
    /// レコード形式 [{col1:val1, col2:val2}, ...]
    #[default]
    Records,
    /// 列形式 {col1: [val1, val2, ...], col2: [...]}
    Columns,
}

// NaN と欠損値は null
fn cell_value(cell: Cell) -> Value {
    match cell {
        Cell::Text(text) => Value::String(text),
        Cell::Number(value) => Number::from_f64(value).map_or(Value::Null, Value::Number),
        Cell::Missing => Value::Null,
    }
}

/// レポートをJSON値に変換
pub fn to_json<T: ReportTable>(table: &T, orient: JsonOrient) -> Value {
    let columns = table.column_names();
    match orient {
        JsonOrient::Records => Value::Array(
            (0..table.row_count())
                .map(|i| {
                    let record: Map<String, Value> = columns
                        .iter()
                        .cloned()
                        .zip(table.row_cells(i).into_iter().map(cell_value))
                        .collect();
                    Value::Object(record)
                })
                .collect(),
        ),
        JsonOrient::Columns => {
            let mut values: Vec<Vec<Value>> = vec![Vec::with_capacity(table.row_count()); columns.len()];
            for i in 0..table.row_count() {
                for (col, cell) in table.row_cells(i).into_iter().enumerate() {
                    values[col].push(cell_value(cell));
                }
            }
            let object: Map<String, Value> = columns
                .into_iter()
                .zip(values.into_iter().map(Value::Array))
                .collect();
            Value::Object(object)
        }
    }
}

/// レポートをJSONファイルに書き込む
pub fn write_json<T: ReportTable, P: AsRef<Path>>(table: &T, path: P, orient: JsonOrient) -> Result<()> {
    let file = File::create(path.as_ref())?;
    let writer = BufWriter::new(file);
    serde_json::to_writer_pretty(writer, &to_json(table, orient))?;
    Ok(())
}
