//! Error types for the sentiment analysis pipeline.
//!
//! Row-level parse failures are not errors: those rows are dropped and counted.
//! Everything here means the run (or one report section) cannot proceed.

use chrono::NaiveDate;
use thiserror::Error;

use crate::types::DateRange;

/// Errors raised while loading, aligning or analyzing the datasets.
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// A required column is absent from an input file header.
    #[error("missing required column '{column}' in {file}")]
    MissingColumn {
        /// Input file (or reader label).
        file: String,
        /// Column name that was expected.
        column: String,
    },

    /// A dataset has no usable rows after cleaning.
    #[error("dataset '{dataset}' has no valid rows")]
    EmptyDataset {
        /// Dataset label.
        dataset: String,
    },

    /// The sentiment index and the trade history cover disjoint dates.
    #[error("no overlapping date range: sentiment index covers {sentiment}, trades cover {trades}")]
    NoOverlappingDateRange {
        /// Range of the sentiment index.
        sentiment: DateRange,
        /// Range of the trade history.
        trades: DateRange,
    },

    /// No trade date in the overlap has a sentiment reading.
    #[error("no trades could be matched to a sentiment reading between {start} and {end}")]
    NoMatchedTrades {
        /// First day of the overlap.
        start: NaiveDate,
        /// Last day of the overlap.
        end: NaiveDate,
    },

    /// Too few accounts survive trimming to form the requested clusters.
    #[error("insufficient accounts for clustering: need at least {required}, have {available}")]
    InsufficientAccounts {
        /// Number of clusters requested.
        required: usize,
        /// Accounts available after trimming.
        available: usize,
    },

    /// Every account has a single observation, so no next-day label exists.
    #[error("no account has a subsequent observation; predictive check is undefined")]
    NoSuccessorObservations,

    /// A feature column is constant across the trimmed population.
    #[error("feature '{feature}' has zero standard deviation; cannot standardize")]
    ZeroVariance {
        /// Feature column name.
        feature: String,
    },

    /// A daily PnL sum does not fit in a `Decimal`.
    #[error("closed PnL for account '{account}' on {date} exceeds the representable range")]
    PnlOverflow {
        /// Account whose daily sum overflowed.
        account: String,
        /// Trading day of the overflowing sum.
        date: NaiveDate,
    },

    /// Configuration values are out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// An input file is structurally unreadable.
    #[error("failed to parse {file}: {message}")]
    Parse {
        /// Input file (or reader label).
        file: String,
        /// Underlying parser message.
        message: String,
    },

    /// Filesystem failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl AnalysisError {
    /// True for insufficient-data failures that only invalidate one report section.
    #[must_use]
    pub const fn is_insufficient_data(&self) -> bool {
        matches!(
            self,
            Self::InsufficientAccounts { .. } | Self::NoSuccessorObservations | Self::ZeroVariance { .. }
        )
    }
}

/// Result alias for pipeline operations.
pub type AnalysisResult<T> = std::result::Result<T, AnalysisError>;
