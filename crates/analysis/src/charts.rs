//! Data behind the report figures, kept free of any rendering concern.

use trader_sentiment_core::stats::to_f64;
use trader_sentiment_core::{
    ChartData, ClusterReport, DailyObservation, FiveNumberSummary, RegimeDistribution,
    ScatterPoint, Sentiment, TrendPoint,
};

pub const METRIC_CLOSED_PNL: &str = "closed_pnl";
pub const METRIC_TRADE_COUNT: &str = "trade_count";
pub const METRIC_SIZE_USD: &str = "size_usd";
pub const METRIC_ABS_PNL: &str = "abs_pnl";

type Extractor = fn(&DailyObservation) -> f64;

/// Metrics with a per-regime distribution, in plotting order.
const DISTRIBUTION_METRICS: [(&str, Extractor); 4] = [
    (METRIC_CLOSED_PNL, |o| to_f64(o.closed_pnl)),
    (METRIC_TRADE_COUNT, |o| o.trade_count as f64),
    (METRIC_SIZE_USD, |o| to_f64(o.size_usd)),
    (METRIC_ABS_PNL, |o| to_f64(o.abs_pnl())),
];

/// Assembles distributions, the trend line and the archetype scatter.
#[must_use]
pub fn build_chart_data(
    daily: &[DailyObservation],
    trend: &[TrendPoint],
    clustering: Option<&ClusterReport>,
) -> ChartData {
    ChartData {
        distributions: regime_distributions(daily),
        trend: trend.to_vec(),
        archetypes: clustering.map(archetype_scatter).unwrap_or_default(),
    }
}

/// Five-number summary of each metric per regime; empty regimes are skipped.
#[must_use]
pub fn regime_distributions(daily: &[DailyObservation]) -> Vec<RegimeDistribution> {
    let mut distributions = Vec::new();
    for (metric, extract) in DISTRIBUTION_METRICS {
        for sentiment in Sentiment::ALL {
            let values: Vec<f64> = daily
                .iter()
                .filter(|o| o.sentiment == sentiment)
                .map(extract)
                .collect();
            if let Some(summary) = FiveNumberSummary::from_values(&values) {
                distributions.push(RegimeDistribution {
                    metric: metric.to_string(),
                    sentiment,
                    summary,
                });
            }
        }
    }
    distributions
}

/// Mean trades per day against median daily PnL, one point per clustered account.
#[must_use]
pub fn archetype_scatter(clustering: &ClusterReport) -> Vec<ScatterPoint> {
    clustering
        .assignments
        .iter()
        .map(|a| ScatterPoint {
            account: a.account.clone(),
            x_trade_count: a.mean_trade_count,
            y_median_pnl: a.median_pnl,
            cluster: a.cluster,
        })
        .collect()
}
