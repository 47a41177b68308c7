#![allow(clippy::format_push_string)]
#![allow(clippy::uninlined_format_args)]

use crate::report::{AnalysisReport, ClusterReport, PredictiveCheck, RegimeStats};
use crate::types::Sentiment;

const RULE: &str = "═══════════════════════════════════════════════════════════════\n";
const THIN: &str = "───────────────────────────────────────────────────────────────\n";

/// Trend rows shown before the listing is elided.
const TREND_ROWS: usize = 10;

pub struct ReportFormatter;

impl ReportFormatter {
    #[must_use]
    pub fn format(report: &AnalysisReport) -> String {
        let mut output = String::new();

        output.push('\n');
        output.push_str(RULE);
        output.push_str("          TRADER BEHAVIOR vs MARKET SENTIMENT                  \n");
        output.push_str(RULE);
        output.push('\n');

        Self::data_quality(&mut output, report);
        Self::regime_summary(&mut output, &report.regimes);
        Self::risk_proxy(&mut output, &report.regimes);
        Self::trend(&mut output, report);

        if let Some(predictive) = &report.predictive {
            Self::predictive(&mut output, predictive);
        }
        if let Some(clustering) = &report.clustering {
            Self::clusters(&mut output, clustering);
        }

        if !report.skipped.is_empty() {
            output.push_str("Skipped Sections\n");
            output.push_str(THIN);
            for skipped in &report.skipped {
                output.push_str(&format!("⚠️  {}: {}\n", skipped.section, skipped.reason));
            }
            output.push('\n');
        }

        output.push_str(RULE);
        output.push_str("                        FINAL INSIGHTS                         \n");
        output.push_str(RULE);
        for insight in &report.insights {
            output.push_str(&format!("• {}\n", insight));
        }
        output.push_str(RULE);

        output
    }

    fn data_quality(output: &mut String, report: &AnalysisReport) {
        let quality = &report.data_quality;
        let alignment = &quality.alignment;

        output.push_str("Data Quality\n");
        output.push_str(THIN);
        output.push_str(&format!(
            "Sentiment Rows:        {} read, {} kept, {:.1}% ({} invalid dates)\n",
            quality.sentiment.rows_read,
            quality.sentiment.rows_kept,
            quality.sentiment.kept_ratio() * 100.0,
            quality.sentiment.invalid_date
        ));
        output.push_str(&format!(
            "Trade Rows:            {} read, {} kept, {:.1}% ({} invalid dates, {} non-numeric, {} blank accounts)\n",
            quality.trades.rows_read,
            quality.trades.rows_kept,
            quality.trades.kept_ratio() * 100.0,
            quality.trades.invalid_date,
            quality.trades.invalid_numeric,
            quality.trades.invalid_account
        ));
        output.push_str(&format!("Sentiment Range:       {}\n", alignment.sentiment_range));
        output.push_str(&format!("Trade Range:           {}\n", alignment.trade_range));
        output.push_str(&format!(
            "Overlap:               {} ({} days)\n",
            alignment.overlap,
            alignment.overlap.num_days()
        ));
        output.push_str(&format!(
            "Outside Overlap:       {} sentiment rows, {} trades\n",
            alignment.sentiment_outside_range, alignment.trades_outside_range
        ));
        if alignment.duplicate_sentiment_dates > 0 {
            output.push_str(&format!(
                "Duplicate Dates:       {} (first reading kept)\n",
                alignment.duplicate_sentiment_dates
            ));
        }
        output.push_str(&format!(
            "Matched Trades:        {} ({} without a sentiment reading)\n",
            alignment.matched_trades, alignment.unmatched_trades
        ));
        output.push_str(&format!(
            "Total Daily Observations: {} across {} accounts\n",
            quality.daily_observations, quality.accounts
        ));
        output.push('\n');
    }

    fn regime_summary(output: &mut String, regimes: &[RegimeStats]) {
        output.push_str("Regime Summary\n");
        output.push_str(THIN);
        output.push_str(&format!(
            "{:<8} {:>7} {:>12} {:>12} {:>9} {:>8} {:>12}\n",
            "Regime", "Obs", "Median PnL", "Mean PnL", "Win Rate", "Trades", "Median Size"
        ));
        for regime in regimes {
            output.push_str(&format!(
                "{:<8} {:>7} {:>12.2} {:>12.2} {:>8.1}% {:>8.1} {:>12.2}\n",
                regime.sentiment.as_str(),
                regime.observations,
                regime.median_pnl,
                regime.mean_pnl,
                regime.win_rate * 100.0,
                regime.median_trade_count,
                regime.median_size_usd
            ));
        }
        output.push('\n');
    }

    fn risk_proxy(output: &mut String, regimes: &[RegimeStats]) {
        output.push_str("Median Absolute PnL (Risk Proxy)\n");
        output.push_str(THIN);
        for regime in regimes {
            output.push_str(&format!(
                "{:<8}               ${:.2}\n",
                regime.sentiment.as_str(),
                regime.median_abs_pnl
            ));
        }
        output.push('\n');
    }

    fn trend(output: &mut String, report: &AnalysisReport) {
        output.push_str("Median Daily Account PnL (most recent days)\n");
        output.push_str(THIN);
        let skip = report.trend.len().saturating_sub(TREND_ROWS);
        if skip > 0 {
            output.push_str(&format!("... {} earlier days omitted\n", skip));
        }
        for point in report.trend.iter().skip(skip) {
            output.push_str(&format!(
                "{}  {:<6} {:>12.2}  ({} accounts)\n",
                point.date,
                point.sentiment.as_str(),
                point.median_pnl,
                point.accounts
            ));
        }
        output.push('\n');
    }

    fn predictive(output: &mut String, check: &PredictiveCheck) {
        output.push_str("Predictive Check (next active day profitable?)\n");
        output.push_str(THIN);
        output.push_str(&format!("Samples:               {}\n", check.samples));
        output.push_str(&format!(
            "Baseline Accuracy:     {:.3}\n",
            check.baseline_accuracy
        ));
        for sentiment in Sentiment::ALL {
            let line = check
                .conditional
                .iter()
                .find(|c| c.sentiment == sentiment)
                .and_then(|c| {
                    c.probability.map(|p| {
                        format!(
                            "{:.3} [{:.3}, {:.3}] (n={})",
                            p, c.ci_lower, c.ci_upper, c.samples
                        )
                    })
                })
                .unwrap_or_else(|| "N/A (no observations)".to_string());
            output.push_str(&format!("P(profit | {:<5}):     {}\n", sentiment.as_str(), line));
        }
        output.push_str(&format!(
            "Regime Rule Accuracy:  {:.3} (lift {:+.3})\n",
            check.regime_accuracy, check.lift
        ));
        output.push('\n');
    }

    fn clusters(output: &mut String, report: &ClusterReport) {
        output.push_str("Trader Archetypes\n");
        output.push_str(THIN);
        output.push_str(&format!(
            "Accounts Clustered:    {} of {} (after trimming)\n",
            report.accounts_clustered, report.accounts_total
        ));
        output.push_str(&format!(
            "K-Means:               k={}, seed={}, {} iterations{}\n",
            report.k,
            report.seed,
            report.iterations,
            if report.converged { "" } else { " (not converged)" }
        ));
        for (cluster, count) in report.counts().iter().enumerate() {
            output.push_str(&format!("Cluster {}:             {} accounts\n", cluster, count));
        }
        for profile in &report.profiles {
            output.push_str(&format!(
                "  #{} median PnL {:.2}, trades/day {:.1}, median size ${:.2}\n",
                profile.cluster,
                profile.mean_median_pnl,
                profile.mean_trade_count,
                profile.mean_median_size
            ));
        }
        output.push('\n');
    }
}
