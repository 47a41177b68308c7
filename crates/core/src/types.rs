//! Domain records shared by the ingestion, analysis and reporting layers.

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Binary market regime derived from the Fear/Greed classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Sentiment {
    Fear,
    Greed,
}

impl Sentiment {
    /// Both regimes in report order.
    pub const ALL: [Sentiment; 2] = [Sentiment::Fear, Sentiment::Greed];

    /// Collapses a raw index classification into a regime.
    ///
    /// Any classification containing `"Fear"` (case-sensitive) is Fear, everything
    /// else is Greed. This folds "Neutral" into Greed.
    #[must_use]
    pub fn from_classification(classification: &str) -> Self {
        if classification.contains("Fear") {
            Sentiment::Fear
        } else {
            Sentiment::Greed
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Sentiment::Fear => "Fear",
            Sentiment::Greed => "Greed",
        }
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One row of the Fear/Greed index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentimentRecord {
    pub date: NaiveDate,
    pub classification: String,
    pub sentiment: Sentiment,
}

impl SentimentRecord {
    #[must_use]
    pub fn new(date: NaiveDate, classification: impl Into<String>) -> Self {
        let classification = classification.into();
        let sentiment = Sentiment::from_classification(&classification);
        Self {
            date,
            classification,
            sentiment,
        }
    }
}

/// A single closed trade from the account history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradeRecord {
    pub account: String,
    pub timestamp: NaiveDateTime,
    /// Calendar day of `timestamp`.
    pub date: NaiveDate,
    pub closed_pnl: Decimal,
    pub size_usd: Decimal,
}

impl TradeRecord {
    #[must_use]
    pub fn new(
        account: impl Into<String>,
        timestamp: NaiveDateTime,
        closed_pnl: Decimal,
        size_usd: Decimal,
    ) -> Self {
        Self {
            account: account.into(),
            timestamp,
            date: timestamp.date(),
            closed_pnl,
            size_usd,
        }
    }
}

/// Closed interval of calendar days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    /// Returns `None` when `start > end`.
    #[must_use]
    pub fn new(start: NaiveDate, end: NaiveDate) -> Option<Self> {
        (start <= end).then_some(Self { start, end })
    }

    /// Smallest range covering every date, or `None` for an empty iterator.
    pub fn from_dates<I>(dates: I) -> Option<Self>
    where
        I: IntoIterator<Item = NaiveDate>,
    {
        dates.into_iter().fold(None, |range, date| match range {
            None => Some(Self {
                start: date,
                end: date,
            }),
            Some(r) => Some(Self {
                start: r.start.min(date),
                end: r.end.max(date),
            }),
        })
    }

    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// `[max(starts), min(ends)]`, or `None` when the ranges do not overlap.
    #[must_use]
    pub fn intersect(&self, other: &Self) -> Option<Self> {
        Self::new(self.start.max(other.start), self.end.min(other.end))
    }

    /// Number of calendar days covered, inclusive of both ends.
    #[must_use]
    pub fn num_days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} .. {}", self.start, self.end)
    }
}

/// Activity of one account on one day, tagged with that day's regime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyObservation {
    pub account: String,
    pub date: NaiveDate,
    pub sentiment: Sentiment,
    /// Sum of closed PnL over the day's trades.
    pub closed_pnl: Decimal,
    /// Median trade size in USD.
    pub size_usd: Decimal,
    pub trade_count: usize,
    /// `closed_pnl > 0`.
    pub win: bool,
}

impl DailyObservation {
    /// Risk proxy.
    #[must_use]
    pub fn abs_pnl(&self) -> Decimal {
        self.closed_pnl.abs()
    }
}

/// A daily observation paired with the win flag of the account's next observed day.
///
/// "Next" is the next row in chronological order for the account, which may be
/// several calendar days later when the account skipped days.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LaggedObservation {
    pub observation: DailyObservation,
    pub next_date: NaiveDate,
    pub next_profit: bool,
}

/// Account-level behavioral features used for archetype clustering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraderFeatures {
    pub account: String,
    pub median_pnl: f64,
    pub mean_trade_count: f64,
    pub median_size: f64,
}

impl TraderFeatures {
    pub const NAMES: [&'static str; 3] = ["median_pnl", "mean_trade_count", "median_size"];

    #[must_use]
    pub fn values(&self) -> [f64; 3] {
        [self.median_pnl, self.mean_trade_count, self.median_size]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    // ============================================================
    // Sentiment Tests
    // ============================================================

    #[test]
    fn extreme_fear_is_fear() {
        assert_eq!(Sentiment::from_classification("Extreme Fear"), Sentiment::Fear);
        assert_eq!(Sentiment::from_classification("Fear"), Sentiment::Fear);
    }

    #[test]
    fn greed_variants_are_greed() {
        assert_eq!(Sentiment::from_classification("Greed"), Sentiment::Greed);
        assert_eq!(Sentiment::from_classification("Extreme Greed"), Sentiment::Greed);
    }

    #[test]
    fn neutral_collapses_to_greed() {
        assert_eq!(Sentiment::from_classification("Neutral"), Sentiment::Greed);
        assert_eq!(Sentiment::from_classification(""), Sentiment::Greed);
    }

    #[test]
    fn fear_match_is_case_sensitive() {
        assert_eq!(Sentiment::from_classification("extreme fear"), Sentiment::Greed);
        assert_eq!(Sentiment::from_classification("FEAR"), Sentiment::Greed);
    }

    #[test]
    fn sentiment_record_derives_regime() {
        let record = SentimentRecord::new(day(2024, 1, 1), "Extreme Fear");
        assert_eq!(record.sentiment, Sentiment::Fear);
        assert_eq!(record.classification, "Extreme Fear");
    }

    // ============================================================
    // DateRange Tests
    // ============================================================

    #[test]
    fn date_range_rejects_inverted_bounds() {
        assert!(DateRange::new(day(2024, 1, 2), day(2024, 1, 1)).is_none());
    }

    #[test]
    fn date_range_from_dates_covers_all() {
        let range =
            DateRange::from_dates([day(2024, 3, 5), day(2024, 1, 9), day(2024, 2, 1)]).unwrap();
        assert_eq!(range.start, day(2024, 1, 9));
        assert_eq!(range.end, day(2024, 3, 5));
        assert!(DateRange::from_dates(std::iter::empty()).is_none());
    }

    #[test]
    fn intersection_is_max_start_min_end() {
        let a = DateRange::new(day(2024, 1, 1), day(2024, 1, 20)).unwrap();
        let b = DateRange::new(day(2024, 1, 10), day(2024, 2, 1)).unwrap();
        let both = a.intersect(&b).unwrap();
        assert_eq!(both.start, day(2024, 1, 10));
        assert_eq!(both.end, day(2024, 1, 20));
        assert_eq!(both.num_days(), 11);
    }

    #[test]
    fn disjoint_ranges_do_not_intersect() {
        let a = DateRange::new(day(2024, 1, 1), day(2024, 1, 5)).unwrap();
        let b = DateRange::new(day(2024, 1, 6), day(2024, 1, 9)).unwrap();
        assert!(a.intersect(&b).is_none());
    }

    #[test]
    fn single_day_overlap_is_kept() {
        let a = DateRange::new(day(2024, 1, 1), day(2024, 1, 5)).unwrap();
        let b = DateRange::new(day(2024, 1, 5), day(2024, 1, 9)).unwrap();
        let both = a.intersect(&b).unwrap();
        assert!(both.contains(day(2024, 1, 5)));
        assert_eq!(both.num_days(), 1);
    }

    // ============================================================
    // Record Tests
    // ============================================================

    #[test]
    fn trade_record_derives_calendar_day() {
        let ts = day(2024, 12, 2).and_hms_opt(22, 50, 0).unwrap();
        let trade = TradeRecord::new("0xabc", ts, dec!(1.5), dec!(100));
        assert_eq!(trade.date, day(2024, 12, 2));
    }

    #[test]
    fn abs_pnl_is_magnitude() {
        let obs = DailyObservation {
            account: "a".to_string(),
            date: day(2024, 1, 1),
            sentiment: Sentiment::Fear,
            closed_pnl: dec!(-12.5),
            size_usd: dec!(10),
            trade_count: 2,
            win: false,
        };
        assert_eq!(obs.abs_pnl(), dec!(12.5));
    }
}
