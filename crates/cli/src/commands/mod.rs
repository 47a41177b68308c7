//! CLI commands for the sentiment analysis.

pub mod data_status;
pub mod report;

pub use data_status::{run_data_status, DataStatusArgs};
pub use report::{run_report, ReportArgs};
