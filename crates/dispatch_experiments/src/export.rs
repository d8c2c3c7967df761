//! Export of run artifacts for external analysis.

mod csv;
mod json;

pub use self::csv::{write_dispatch_log_csv, write_results_csv};
pub use self::json::write_results_json;
