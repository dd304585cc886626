use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use csv::{ReaderBuilder, WriterBuilder};

use crate::error::{Error, Result};
use crate::report::{Cell, LongReport, ReportTable, METRIC_COLUMN, VALUE_COLUMN};

/// 区切り文字の設定
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CsvFormat {
    pub delimiter: u8,
}

impl CsvFormat {
    pub fn csv() -> Self {
        CsvFormat { delimiter: b',' }
    }

    pub fn tsv() -> Self {
        CsvFormat { delimiter: b'\t' }
    }
}

impl Default for CsvFormat {
    fn default() -> Self {
        Self::csv()
    }
}

fn format_cell(cell: Cell) -> String {
    match cell {
        Cell::Text(text) => text,
        Cell::Number(value) if value.is_nan() => "nan".to_string(),
        Cell::Number(value) => value.to_string(),
        Cell::Missing => String::new(),
    }
}

fn parse_value(text: &str) -> Result<f64> {
    match text {
        "" | "nan" | "NaN" | "NAN" => Ok(f64::NAN),
        _ => text
            .parse::<f64>()
            .map_err(|_| Error::Format(format!("数値として解析できません: '{}'", text))),
    }
}

/// レポートをCSVとして書き込む
pub fn write_table<T: ReportTable, W: Write>(table: &T, writer: W, format: CsvFormat) -> Result<()> {
    let mut wtr = WriterBuilder::new()
        .delimiter(format.delimiter)
        .from_writer(writer);

    // ヘッダー行を書き込む
    wtr.write_record(table.column_names())?;

    for i in 0..table.row_count() {
        let record: Vec<String> = table.row_cells(i).into_iter().map(format_cell).collect();
        wtr.write_record(&record)?;
    }

    wtr.flush()?;
    Ok(())
}

/// レポートをCSVファイルに書き込む
pub fn write_csv<T: ReportTable, P: AsRef<Path>>(table: &T, path: P, format: CsvFormat) -> Result<()> {
    let file = File::create(path.as_ref())?;
    write_table(table, file, format)
}

/// CSVからロング形式のレポートを読み込む
///
/// The header must contain `metric` and `value`; every other column becomes
/// a key column, in header order.
pub fn read_long<R: Read>(reader: R, format: CsvFormat) -> Result<LongReport> {
    let mut rdr = ReaderBuilder::new()
        .delimiter(format.delimiter)
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers: Vec<String> = rdr.headers()?.iter().map(|h| h.to_string()).collect();
    let position = |name: &str| {
        headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| Error::Format(format!("列 '{}' がありません", name)))
    };
    let metric_idx = position(METRIC_COLUMN)?;
    let value_idx = position(VALUE_COLUMN)?;
    let key_idx: Vec<usize> = (0..headers.len())
        .filter(|&i| i != metric_idx && i != value_idx)
        .collect();

    let mut report = LongReport::new(key_idx.iter().map(|&i| headers[i].clone()).collect())?;
    for result in rdr.records() {
        let record = result?;
        if record.len() != headers.len() {
            return Err(Error::LengthMismatch {
                expected: headers.len(),
                actual: record.len(),
            });
        }
        let keys = key_idx.iter().map(|&i| record[i].to_string()).collect();
        report.push(&record[metric_idx], keys, parse_value(&record[value_idx])?)?;
    }
    Ok(report)
}

/// CSVファイルからロング形式のレポートを読み込む
pub fn read_long_csv<P: AsRef<Path>>(path: P, format: CsvFormat) -> Result<LongReport> {
    let file = File::open(path.as_ref())?;
    read_long(file, format)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_value() {
        assert_eq!(parse_value("0.25").unwrap(), 0.25);
        assert!(parse_value("nan").unwrap().is_nan());
        assert!(parse_value("").unwrap().is_nan());
        assert!(matches!(parse_value("abc"), Err(Error::Format(_))));
    }

    #[test]
    fn test_write_long_report() {
        let mut report = LongReport::for_outputs();
        report.push("auc", vec!["cpgA".into()], f64::NAN).unwrap();
        report.push("n", vec!["cpgA".into()], 4.0).unwrap();

        let mut buf = Vec::new();
        write_table(&report, &mut buf, CsvFormat::tsv()).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(text, "metric\toutput\tvalue\nauc\tcpgA\tnan\nn\tcpgA\t4\n");
    }

    #[test]
    fn test_read_long_requires_columns() {
        let data = "metric,output\nauc,cpgA\n";
        assert!(matches!(
            read_long(data.as_bytes(), CsvFormat::csv()),
            Err(Error::Format(_))
        ));
    }

    #[test]
    fn test_read_long_key_columns_in_header_order() {
        let data = "output,metric,value,model\ncpgA,auc,0.8,dna\n";
        let report = read_long(data.as_bytes(), CsvFormat::csv()).unwrap();
        assert_eq!(report.key_columns(), &["output".to_string(), "model".to_string()][..]);
        assert_eq!(report.value("auc", &["cpgA", "dna"]), Some(0.8));
    }
}
