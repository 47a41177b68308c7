//! Regime comparison: profitability, win rate, frequency, sizing and the
//! absolute-PnL risk proxy of daily account observations, split by sentiment.

use trader_sentiment_core::stats::{mean, median, to_f64};
use trader_sentiment_core::{DailyObservation, RegimeStats, Sentiment};

/// Summary statistics per regime, in `Sentiment::ALL` order.
///
/// Regimes without observations are omitted.
#[must_use]
pub fn regime_summary(daily: &[DailyObservation]) -> Vec<RegimeStats> {
    Sentiment::ALL
        .into_iter()
        .filter_map(|sentiment| {
            let group: Vec<&DailyObservation> =
                daily.iter().filter(|o| o.sentiment == sentiment).collect();
            summarize(sentiment, &group)
        })
        .collect()
}

fn summarize(sentiment: Sentiment, group: &[&DailyObservation]) -> Option<RegimeStats> {
    if group.is_empty() {
        return None;
    }

    let pnl: Vec<f64> = group.iter().map(|o| to_f64(o.closed_pnl)).collect();
    let abs_pnl: Vec<f64> = group.iter().map(|o| to_f64(o.abs_pnl())).collect();
    let trade_counts: Vec<f64> = group.iter().map(|o| o.trade_count as f64).collect();
    let sizes: Vec<f64> = group.iter().map(|o| to_f64(o.size_usd)).collect();
    let wins = group.iter().filter(|o| o.win).count();

    Some(RegimeStats {
        sentiment,
        observations: group.len(),
        median_pnl: median(&pnl)?,
        mean_pnl: mean(&pnl)?,
        win_rate: wins as f64 / group.len() as f64,
        median_trade_count: median(&trade_counts)?,
        median_size_usd: median(&sizes)?,
        median_abs_pnl: median(&abs_pnl)?,
    })
}
