use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use trader_sentiment_core::stats::median_decimal;
use trader_sentiment_core::{AnalysisError, AnalysisResult, DailyObservation, Sentiment};

use crate::align::JoinedTrade;

struct DayAccumulator {
    sentiment: Sentiment,
    closed_pnl: Decimal,
    sizes: Vec<Decimal>,
}

/// Collapses trades into one observation per (account, date), sorted by account then date.
///
/// PnL is summed exactly, so the result does not depend on trade order.
///
/// # Errors
/// Returns `PnlOverflow` if an account's daily PnL sum leaves the `Decimal` range.
pub fn aggregate_daily(trades: &[JoinedTrade]) -> AnalysisResult<Vec<DailyObservation>> {
    let mut days: BTreeMap<(String, NaiveDate), DayAccumulator> = BTreeMap::new();

    for joined in trades {
        let trade = &joined.trade;
        let acc = days
            .entry((trade.account.clone(), trade.date))
            .or_insert_with(|| DayAccumulator {
                sentiment: joined.sentiment,
                closed_pnl: Decimal::ZERO,
                sizes: Vec::new(),
            });
        acc.closed_pnl = acc.closed_pnl.checked_add(trade.closed_pnl).ok_or_else(|| {
            AnalysisError::PnlOverflow {
                account: trade.account.clone(),
                date: trade.date,
            }
        })?;
        acc.sizes.push(trade.size_usd);
    }

    let daily: Vec<DailyObservation> = days
        .into_iter()
        .map(|((account, date), acc)| DailyObservation {
            account,
            date,
            sentiment: acc.sentiment,
            win: acc.closed_pnl > Decimal::ZERO,
            closed_pnl: acc.closed_pnl,
            size_usd: median_decimal(&acc.sizes).unwrap_or(Decimal::ZERO),
            trade_count: acc.sizes.len(),
        })
        .collect();

    tracing::info!(
        trades = trades.len(),
        observations = daily.len(),
        "Aggregated daily account observations"
    );
    Ok(daily)
}
