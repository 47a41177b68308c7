//! Structured results of one analysis run.
//!
//! Rendering lives in [`crate::report_formatter`]; these types are also
//! serialized as JSON by the CLI.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::stats::FiveNumberSummary;
use crate::types::{DateRange, Sentiment};

/// Rows read and dropped while loading one input file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadReport {
    pub rows_read: usize,
    pub rows_kept: usize,
    /// Rows whose date or timestamp could not be parsed.
    pub invalid_date: usize,
    /// Rows whose PnL or size was not numeric.
    pub invalid_numeric: usize,
    /// Trade rows with a blank account.
    #[serde(default)]
    pub invalid_account: usize,
}

impl LoadReport {
    #[must_use]
    pub fn dropped(&self) -> usize {
        self.invalid_date + self.invalid_numeric + self.invalid_account
    }

    #[must_use]
    pub fn kept_ratio(&self) -> f64 {
        if self.rows_read == 0 {
            return 0.0;
        }
        self.rows_kept as f64 / self.rows_read as f64
    }
}

/// Outcome of restricting both datasets to their common dates and joining them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlignmentReport {
    pub sentiment_range: DateRange,
    pub trade_range: DateRange,
    pub overlap: DateRange,
    pub sentiment_outside_range: usize,
    pub trades_outside_range: usize,
    /// Extra index rows for a date already seen; the first reading wins.
    pub duplicate_sentiment_dates: usize,
    /// In-range trades on a day with no index reading.
    pub unmatched_trades: usize,
    pub matched_trades: usize,
}

/// Data-quality audit for the whole run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataQuality {
    pub sentiment: LoadReport,
    pub trades: LoadReport,
    pub alignment: AlignmentReport,
    pub daily_observations: usize,
    pub accounts: usize,
}

/// Behavior of daily account observations within one regime.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegimeStats {
    pub sentiment: Sentiment,
    pub observations: usize,
    pub median_pnl: f64,
    pub mean_pnl: f64,
    /// Share of observations with positive daily PnL.
    pub win_rate: f64,
    pub median_trade_count: f64,
    pub median_size_usd: f64,
    /// Median absolute daily PnL.
    pub median_abs_pnl: f64,
}

/// Median account PnL for one day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendPoint {
    pub date: NaiveDate,
    pub sentiment: Sentiment,
    pub median_pnl: f64,
    /// Accounts active that day.
    pub accounts: usize,
}

/// Next-day profit probability within one regime.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConditionalProbability {
    pub sentiment: Sentiment,
    pub samples: usize,
    /// `None` when the regime has no lagged observations.
    pub probability: Option<f64>,
    pub ci_lower: f64,
    pub ci_upper: f64,
}

/// Does today's regime help predict whether an account profits on its next active day?
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictiveCheck {
    pub samples: usize,
    /// Overall next-day profit rate.
    pub next_profit_rate: f64,
    /// Accuracy of always predicting the majority class.
    pub baseline_accuracy: f64,
    pub conditional: Vec<ConditionalProbability>,
    /// Accuracy of predicting each regime's own majority class.
    pub regime_accuracy: f64,
    /// `regime_accuracy - baseline_accuracy`.
    pub lift: f64,
}

impl PredictiveCheck {
    #[must_use]
    pub fn probability(&self, sentiment: Sentiment) -> Option<f64> {
        self.conditional
            .iter()
            .find(|c| c.sentiment == sentiment)
            .and_then(|c| c.probability)
    }
}

/// One clustered account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusterAssignment {
    pub account: String,
    pub median_pnl: f64,
    pub mean_trade_count: f64,
    pub median_size: f64,
    /// Z-scored features in the order above.
    pub standardized: Vec<f64>,
    pub cluster: usize,
}

/// Mean raw features of one archetype.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusterProfile {
    pub cluster: usize,
    pub accounts: usize,
    pub mean_median_pnl: f64,
    pub mean_trade_count: f64,
    pub mean_median_size: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusterReport {
    /// Accounts with features before trimming.
    pub accounts_total: usize,
    /// Accounts surviving per-feature trimming; the clustered population.
    pub accounts_clustered: usize,
    pub k: usize,
    pub seed: u64,
    pub iterations: usize,
    pub converged: bool,
    /// Sum of squared distances to assigned centroids in standardized space.
    pub inertia: f64,
    pub assignments: Vec<ClusterAssignment>,
    pub profiles: Vec<ClusterProfile>,
}

impl ClusterReport {
    /// Accounts per cluster id, indexed by cluster.
    #[must_use]
    pub fn counts(&self) -> Vec<usize> {
        let mut counts = vec![0; self.k];
        for assignment in &self.assignments {
            counts[assignment.cluster] += 1;
        }
        counts
    }
}

/// Box-plot data of one metric for one regime.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegimeDistribution {
    pub metric: String,
    pub sentiment: Sentiment,
    pub summary: FiveNumberSummary,
}

/// One point of the trader archetype scatter plot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScatterPoint {
    pub account: String,
    pub x_trade_count: f64,
    pub y_median_pnl: f64,
    pub cluster: usize,
}

/// Presentation-free data behind every figure of the report.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChartData {
    /// PnL (violin), trade count, size and absolute PnL (box plots).
    pub distributions: Vec<RegimeDistribution>,
    pub trend: Vec<TrendPoint>,
    pub archetypes: Vec<ScatterPoint>,
}

/// A report section that could not be computed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedSection {
    pub section: String,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub data_quality: DataQuality,
    pub regimes: Vec<RegimeStats>,
    pub trend: Vec<TrendPoint>,
    pub predictive: Option<PredictiveCheck>,
    pub clustering: Option<ClusterReport>,
    pub charts: ChartData,
    pub skipped: Vec<SkippedSection>,
    pub insights: Vec<String>,
}

impl AnalysisReport {
    #[must_use]
    pub fn regime(&self, sentiment: Sentiment) -> Option<&RegimeStats> {
        self.regimes.iter().find(|r| r.sentiment == sentiment)
    }
}
