//! Performance metrics and report tables for multi-output prediction models.
//!
//! Truth and prediction arrays are scored per output name, collected into a
//! long `(metric, output, value)` report and optionally pivoted into a wide
//! table with one column per metric.

pub mod config;
pub mod error;
pub mod evaluation;
pub mod io;
pub mod metrics;
pub mod pivot;
pub mod report;

// Re-export commonly used types
pub use config::EvalConfig;
pub use error::{Error, Result};
pub use evaluation::{
    evaluate, evaluate_cat, evaluate_outputs, get_output_metrics, EvalResult, Evaluator, Mask,
    NamedArrays, MISSING_VALUE,
};
pub use metrics::{Metric, MetricCategory};
pub use pivot::{unstack_report, AggFunction, PivotTable, WideReport};
pub use report::{LongReport, ReportTable};

// Export version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
