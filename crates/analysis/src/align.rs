//! Restricts both datasets to their common dates and joins trades to regimes.

use chrono::NaiveDate;
use std::collections::BTreeMap;
use trader_sentiment_core::{
    AlignmentReport, AnalysisError, AnalysisResult, DateRange, Sentiment, SentimentRecord,
    TradeRecord,
};

/// A trade tagged with the regime of its calendar day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinedTrade {
    pub trade: TradeRecord,
    pub sentiment: Sentiment,
}

#[derive(Debug, Clone)]
pub struct Aligned {
    /// In-range index rows, one per date, sorted by date.
    pub sentiments: Vec<SentimentRecord>,
    pub trades: Vec<JoinedTrade>,
    pub report: AlignmentReport,
}

/// Filters both datasets to `[max(starts), min(ends)]` and inner-joins trades on date.
///
/// When the index has several rows for one date the first is used.
///
/// # Errors
/// - `EmptyDataset` if either input is empty
/// - `NoOverlappingDateRange` if the date ranges are disjoint
/// - `NoMatchedTrades` if no trade in the overlap has a sentiment reading
pub fn align(
    sentiments: Vec<SentimentRecord>,
    trades: Vec<TradeRecord>,
) -> AnalysisResult<Aligned> {
    let sentiment_range =
        DateRange::from_dates(sentiments.iter().map(|s| s.date)).ok_or_else(|| {
            AnalysisError::EmptyDataset {
                dataset: "sentiment index".to_string(),
            }
        })?;
    let trade_range = DateRange::from_dates(trades.iter().map(|t| t.date)).ok_or_else(|| {
        AnalysisError::EmptyDataset {
            dataset: "trade history".to_string(),
        }
    })?;

    let overlap = sentiment_range.intersect(&trade_range).ok_or(
        AnalysisError::NoOverlappingDateRange {
            sentiment: sentiment_range,
            trades: trade_range,
        },
    )?;

    let sentiment_total = sentiments.len();
    let mut by_date: BTreeMap<NaiveDate, SentimentRecord> = BTreeMap::new();
    let mut in_range = 0usize;
    for record in sentiments.into_iter().filter(|s| overlap.contains(s.date)) {
        in_range += 1;
        by_date.entry(record.date).or_insert(record);
    }
    let duplicate_sentiment_dates = in_range - by_date.len();
    if duplicate_sentiment_dates > 0 {
        tracing::warn!(
            duplicates = duplicate_sentiment_dates,
            "Sentiment index has repeated dates; keeping the first reading"
        );
    }

    let trade_total = trades.len();
    let mut trades_outside_range = 0usize;
    let mut unmatched_trades = 0usize;
    let mut joined = Vec::with_capacity(trade_total);
    for trade in trades {
        if !overlap.contains(trade.date) {
            trades_outside_range += 1;
            continue;
        }
        match by_date.get(&trade.date) {
            Some(record) => joined.push(JoinedTrade {
                sentiment: record.sentiment,
                trade,
            }),
            None => unmatched_trades += 1,
        }
    }

    if joined.is_empty() {
        return Err(AnalysisError::NoMatchedTrades {
            start: overlap.start,
            end: overlap.end,
        });
    }

    let report = AlignmentReport {
        sentiment_range,
        trade_range,
        overlap,
        sentiment_outside_range: sentiment_total - in_range,
        trades_outside_range,
        duplicate_sentiment_dates,
        unmatched_trades,
        matched_trades: joined.len(),
    };

    tracing::info!(
        overlap = %overlap,
        matched = report.matched_trades,
        trades_outside = trades_outside_range,
        sentiment_outside = report.sentiment_outside_range,
        "Aligned datasets"
    );
    if unmatched_trades > 0 {
        tracing::warn!(
            unmatched = unmatched_trades,
            "Trades on days without a sentiment reading were dropped"
        );
    }

    Ok(Aligned {
        sentiments: by_date.into_values().collect(),
        trades: joined,
        report,
    })
}
