//! End-to-end analysis run: align, aggregate, then every report section.

use std::collections::BTreeSet;
use trader_sentiment_core::{
    AnalysisError, AnalysisReport, AnalysisResult, ClusteringConfig, DailyObservation,
    DataQuality, InputConfig, SentimentRecord, SkippedSection, TradeRecord,
};
use trader_sentiment_data::{load_sentiment_index, load_trade_history, Loaded};

use crate::aggregate::aggregate_daily;
use crate::align::align;
use crate::charts::build_chart_data;
use crate::clustering::cluster_traders;
use crate::insights::generate_insights;
use crate::predictive::{lagged_observations, predictive_check};
use crate::regimes::regime_summary;
use crate::trend::median_pnl_trend;

pub const SECTION_PREDICTIVE: &str = "predictive check";
pub const SECTION_CLUSTERING: &str = "trader archetypes";

/// The report plus the per-account daily table it was computed from.
#[derive(Debug, Clone)]
pub struct AnalysisOutput {
    pub report: AnalysisReport,
    pub daily: Vec<DailyObservation>,
}

/// Runs the sentiment versus trader behavior analysis.
#[derive(Debug, Clone, Default)]
pub struct SentimentAnalysis {
    clustering: ClusteringConfig,
}

impl SentimentAnalysis {
    #[must_use]
    pub const fn new(clustering: ClusteringConfig) -> Self {
        Self { clustering }
    }

    /// Loads both CSV inputs, then runs [`Self::run`].
    ///
    /// # Errors
    /// Returns an error if either file cannot be loaded or the run fails.
    pub fn run_from_paths(&self, inputs: &InputConfig) -> AnalysisResult<AnalysisOutput> {
        let sentiments = load_sentiment_index(&inputs.sentiment_path)?;
        let trades = load_trade_history(&inputs.trades_path)?;
        self.run(sentiments, trades)
    }

    /// Computes every section of the report.
    ///
    /// Insufficient data for the predictive check or clustering leaves that
    /// section out and records why in `skipped`.
    ///
    /// # Errors
    /// - `InvalidConfig` if the clustering parameters are invalid
    /// - `EmptyDataset` if either input has no valid rows
    /// - `NoOverlappingDateRange` if the inputs cover disjoint dates
    /// - `NoMatchedTrades` if no trade falls on a day with a reading
    /// - `PnlOverflow` if an account's daily PnL sum is out of range
    pub fn run(
        &self,
        sentiments: Loaded<SentimentRecord>,
        trades: Loaded<TradeRecord>,
    ) -> AnalysisResult<AnalysisOutput> {
        self.clustering.validate()?;

        let aligned = align(sentiments.records, trades.records)?;
        let daily = aggregate_daily(&aligned.trades)?;
        let accounts = daily
            .iter()
            .map(|o| o.account.as_str())
            .collect::<BTreeSet<_>>()
            .len();
        tracing::info!(
            daily_observations = daily.len(),
            accounts,
            "Aggregated daily observations"
        );

        let regimes = regime_summary(&daily);
        let trend = median_pnl_trend(&daily);
        let lagged = lagged_observations(&daily);

        let mut skipped = Vec::new();
        let predictive = section(SECTION_PREDICTIVE, predictive_check(&lagged), &mut skipped)?;
        let clustering = section(
            SECTION_CLUSTERING,
            cluster_traders(&lagged, &self.clustering),
            &mut skipped,
        )?;

        let charts = build_chart_data(&daily, &trend, clustering.as_ref());
        let insights = generate_insights(&regimes, predictive.as_ref(), clustering.as_ref());

        let report = AnalysisReport {
            data_quality: DataQuality {
                sentiment: sentiments.report,
                trades: trades.report,
                alignment: aligned.report,
                daily_observations: daily.len(),
                accounts,
            },
            regimes,
            trend,
            predictive,
            clustering,
            charts,
            skipped,
            insights,
        };
        Ok(AnalysisOutput { report, daily })
    }
}

/// Turns an insufficient-data failure into a skipped section; other errors propagate.
fn section<T>(
    name: &str,
    result: AnalysisResult<T>,
    skipped: &mut Vec<SkippedSection>,
) -> AnalysisResult<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(err) if err.is_insufficient_data() => {
            tracing::warn!(section = name, reason = %err, "Skipping report section");
            skipped.push(SkippedSection {
                section: name.to_string(),
                reason: err.to_string(),
            });
            Ok(None)
        }
        Err(err) => Err(err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;
    use trader_sentiment_core::LoadReport;

    fn loaded<T>(records: Vec<T>) -> Loaded<T> {
        let n = records.len();
        Loaded {
            records,
            report: LoadReport {
                rows_read: n,
                rows_kept: n,
                ..LoadReport::default()
            },
        }
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, d).unwrap()
    }

    fn trade(account: &str, d: u32, pnl: i64) -> TradeRecord {
        TradeRecord::new(
            account,
            day(d).and_hms_opt(12, 0, 0).unwrap(),
            Decimal::from(pnl),
            Decimal::from(100),
        )
    }

    #[test]
    fn single_day_accounts_skip_predictive_and_clustering() {
        let sentiments = vec![SentimentRecord::new(day(1), "Fear")];
        let trades = vec![trade("a", 1, 5), trade("b", 1, -5)];

        let output = SentimentAnalysis::default()
            .run(loaded(sentiments), loaded(trades))
            .unwrap();
        let report = &output.report;

        assert_eq!(output.daily.len(), 2);
        assert_eq!(report.data_quality.accounts, 2);
        assert!(report.predictive.is_none());
        assert!(report.clustering.is_none());
        let sections: Vec<&str> = report.skipped.iter().map(|s| s.section.as_str()).collect();
        assert_eq!(sections, vec![SECTION_PREDICTIVE, SECTION_CLUSTERING]);
        assert!(report.charts.archetypes.is_empty());
    }

    #[test]
    fn disjoint_inputs_stop_the_run() {
        let sentiments = vec![SentimentRecord::new(day(1), "Greed")];
        let trades = vec![trade("a", 20, 1)];

        let err = SentimentAnalysis::default()
            .run(loaded(sentiments), loaded(trades))
            .unwrap_err();
        assert!(matches!(err, AnalysisError::NoOverlappingDateRange { .. }));
    }

    #[test]
    fn invalid_clustering_config_stops_the_run() {
        let config = ClusteringConfig {
            trim_lower: 0.9,
            trim_upper: 0.1,
            ..ClusteringConfig::default()
        };
        let err = SentimentAnalysis::new(config)
            .run(loaded(Vec::new()), loaded(Vec::new()))
            .unwrap_err();
        assert!(matches!(err, AnalysisError::InvalidConfig(_)));
    }
}
