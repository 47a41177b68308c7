//! CSV ingestion for the Fear/Greed index and the trade history.
//!
//! Cleaning is lenient: rows with unparseable dates or non-numeric amounts are
//! dropped and counted in a [`LoadReport`]. A missing required column fails the
//! whole load.

use csv::{ReaderBuilder, StringRecord, Trim};
use rust_decimal::Decimal;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::str::FromStr;
use trader_sentiment_core::{
    AnalysisError, AnalysisResult, LoadReport, SentimentRecord, TradeRecord,
};

use crate::dates::{parse_calendar_day, parse_timestamp};

pub const SENTIMENT_DATE: &str = "date";
pub const SENTIMENT_CLASSIFICATION: &str = "classification";

pub const TRADE_ACCOUNT: &str = "Account";
pub const TRADE_TIMESTAMP: &str = "Timestamp IST";
pub const TRADE_CLOSED_PNL: &str = "Closed PnL";
pub const TRADE_SIZE_USD: &str = "Size USD";

/// Records that survived cleaning, with the audit of what was dropped.
#[derive(Debug, Clone)]
pub struct Loaded<T> {
    pub records: Vec<T>,
    pub report: LoadReport,
}

/// Loads the Fear/Greed index from a CSV file.
///
/// # Errors
/// Returns an error if the file cannot be opened, is not valid CSV, or lacks
/// the `date` or `classification` column.
pub fn load_sentiment_index(path: impl AsRef<Path>) -> AnalysisResult<Loaded<SentimentRecord>> {
    let path = path.as_ref();
    let file = File::open(path)?;
    read_sentiment_index(file, &path.display().to_string())
}

/// Reads the Fear/Greed index from any CSV source. `source` labels errors and logs.
///
/// # Errors
/// Returns an error if the input is not valid CSV or lacks a required column.
pub fn read_sentiment_index<R: Read>(
    reader: R,
    source: &str,
) -> AnalysisResult<Loaded<SentimentRecord>> {
    let mut csv_reader = csv_reader(reader);
    let headers = headers(&mut csv_reader, source)?;
    let date_idx = column_index(&headers, SENTIMENT_DATE, source)?;
    let class_idx = column_index(&headers, SENTIMENT_CLASSIFICATION, source)?;

    let mut records = Vec::new();
    let mut report = LoadReport::default();

    for (row, result) in csv_reader.records().enumerate() {
        let record = result.map_err(|e| parse_error(source, &e))?;
        report.rows_read += 1;

        let Some(date) = record.get(date_idx).and_then(parse_calendar_day) else {
            tracing::debug!(source, row = row + 2, "Dropping sentiment row with invalid date");
            report.invalid_date += 1;
            continue;
        };
        let classification = record.get(class_idx).unwrap_or_default();
        records.push(SentimentRecord::new(date, classification));
    }

    report.rows_kept = records.len();
    log_report(source, &report);
    Ok(Loaded { records, report })
}

/// Loads the trade history from a CSV file.
///
/// # Errors
/// Returns an error if the file cannot be opened, is not valid CSV, or lacks
/// one of `Account`, `Timestamp IST`, `Closed PnL`, `Size USD`.
pub fn load_trade_history(path: impl AsRef<Path>) -> AnalysisResult<Loaded<TradeRecord>> {
    let path = path.as_ref();
    let file = File::open(path)?;
    read_trade_history(file, &path.display().to_string())
}

/// Reads the trade history from any CSV source. Unused columns are ignored.
///
/// # Errors
/// Returns an error if the input is not valid CSV or lacks a required column.
pub fn read_trade_history<R: Read>(reader: R, source: &str) -> AnalysisResult<Loaded<TradeRecord>> {
    let mut csv_reader = csv_reader(reader);
    let headers = headers(&mut csv_reader, source)?;
    let account_idx = column_index(&headers, TRADE_ACCOUNT, source)?;
    let timestamp_idx = column_index(&headers, TRADE_TIMESTAMP, source)?;
    let pnl_idx = column_index(&headers, TRADE_CLOSED_PNL, source)?;
    let size_idx = column_index(&headers, TRADE_SIZE_USD, source)?;

    let mut records = Vec::new();
    let mut report = LoadReport::default();

    for (row, result) in csv_reader.records().enumerate() {
        let record = result.map_err(|e| parse_error(source, &e))?;
        report.rows_read += 1;

        let Some(timestamp) = record.get(timestamp_idx).and_then(parse_timestamp) else {
            tracing::debug!(source, row = row + 2, "Dropping trade with invalid timestamp");
            report.invalid_date += 1;
            continue;
        };

        let closed_pnl = record.get(pnl_idx).and_then(parse_decimal);
        let size_usd = record.get(size_idx).and_then(parse_decimal);
        let (Some(closed_pnl), Some(size_usd)) = (closed_pnl, size_usd) else {
            tracing::debug!(source, row = row + 2, "Dropping trade with non-numeric PnL or size");
            report.invalid_numeric += 1;
            continue;
        };

        let account = record.get(account_idx).unwrap_or_default();
        if account.is_empty() {
            tracing::debug!(source, row = row + 2, "Dropping trade with blank account");
            report.invalid_account += 1;
            continue;
        }
        records.push(TradeRecord::new(account, timestamp, closed_pnl, size_usd));
    }

    report.rows_kept = records.len();
    log_report(source, &report);
    Ok(Loaded { records, report })
}

/// Parses plain or scientific decimal notation. Blank and `NaN` values are rejected.
#[must_use]
pub fn parse_decimal(raw: &str) -> Option<Decimal> {
    let value = raw.trim();
    if value.is_empty() {
        return None;
    }
    Decimal::from_str(value)
        .or_else(|_| Decimal::from_scientific(value))
        .ok()
}

fn csv_reader<R: Read>(reader: R) -> csv::Reader<R> {
    ReaderBuilder::new()
        .trim(Trim::All)
        .flexible(true)
        .from_reader(reader)
}

fn headers<R: Read>(reader: &mut csv::Reader<R>, source: &str) -> AnalysisResult<StringRecord> {
    reader
        .headers()
        .cloned()
        .map_err(|e| parse_error(source, &e))
}

fn column_index(headers: &StringRecord, column: &str, source: &str) -> AnalysisResult<usize> {
    headers
        .iter()
        .position(|h| h.trim_start_matches('\u{feff}') == column)
        .ok_or_else(|| AnalysisError::MissingColumn {
            file: source.to_string(),
            column: column.to_string(),
        })
}

fn parse_error(source: &str, err: &csv::Error) -> AnalysisError {
    AnalysisError::Parse {
        file: source.to_string(),
        message: err.to_string(),
    }
}

fn log_report(source: &str, report: &LoadReport) {
    tracing::info!(
        source,
        rows_read = report.rows_read,
        rows_kept = report.rows_kept,
        "Loaded CSV"
    );
    if report.dropped() > 0 {
        tracing::warn!(
            source,
            invalid_date = report.invalid_date,
            invalid_numeric = report.invalid_numeric,
            invalid_account = report.invalid_account,
            "Dropped invalid rows"
        );
    }
}
