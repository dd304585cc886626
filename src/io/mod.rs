pub mod csv;
pub mod json;

// Re-export commonly used functions
pub use self::csv::{read_long, read_long_csv, write_csv, write_table, CsvFormat};
pub use self::json::{to_json, write_json, JsonOrient};
