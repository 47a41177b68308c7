//! Data ingestion and export for the trader sentiment analysis.
//!
//! This crate provides:
//! - Date and timestamp normalization to calendar days
//! - Lenient CSV loaders for the Fear/Greed index and trade history
//! - CSV export of report tables and chart series

pub mod dates;
pub mod export;
pub mod loader;

pub use dates::{parse_calendar_day, parse_timestamp};
pub use export::CsvExporter;
pub use loader::{
    load_sentiment_index, load_trade_history, parse_decimal, read_sentiment_index,
    read_trade_history, Loaded,
};
