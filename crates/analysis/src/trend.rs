use chrono::NaiveDate;
use std::collections::BTreeMap;
use trader_sentiment_core::stats::{median, to_f64};
use trader_sentiment_core::{DailyObservation, Sentiment, TrendPoint};

/// Median account PnL per (date, regime), sorted by date.
#[must_use]
pub fn median_pnl_trend(daily: &[DailyObservation]) -> Vec<TrendPoint> {
    let mut groups: BTreeMap<(NaiveDate, Sentiment), Vec<f64>> = BTreeMap::new();
    for observation in daily {
        groups
            .entry((observation.date, observation.sentiment))
            .or_default()
            .push(to_f64(observation.closed_pnl));
    }

    groups
        .into_iter()
        .filter_map(|((date, sentiment), pnl)| {
            Some(TrendPoint {
                date,
                sentiment,
                median_pnl: median(&pnl)?,
                accounts: pnl.len(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn obs(account: &str, d: u32, sentiment: Sentiment, pnl: Decimal) -> DailyObservation {
        DailyObservation {
            account: account.to_string(),
            date: NaiveDate::from_ymd_opt(2024, 1, d).unwrap(),
            sentiment,
            closed_pnl: pnl,
            size_usd: dec!(1),
            trade_count: 1,
            win: pnl > Decimal::ZERO,
        }
    }

    #[test]
    fn one_point_per_day_with_cross_account_median() {
        let daily = vec![
            obs("a", 2, Sentiment::Greed, dec!(10)),
            obs("b", 2, Sentiment::Greed, dec!(30)),
            obs("a", 1, Sentiment::Fear, dec!(-5)),
            obs("b", 1, Sentiment::Fear, dec!(5)),
            obs("c", 1, Sentiment::Fear, dec!(7)),
        ];
        let trend = median_pnl_trend(&daily);

        assert_eq!(trend.len(), 2);
        assert_eq!(trend[0].date, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        assert!((trend[0].median_pnl - 5.0).abs() < 1e-9);
        assert_eq!(trend[0].accounts, 3);
        assert!((trend[1].median_pnl - 20.0).abs() < 1e-9);
    }

    #[test]
    fn points_carry_the_regime_of_their_day() {
        let daily = vec![
            obs("a", 1, Sentiment::Fear, dec!(1)),
            obs("a", 2, Sentiment::Greed, dec!(2)),
            obs("a", 3, Sentiment::Fear, dec!(3)),
        ];
        let trend = median_pnl_trend(&daily);
        let regimes: Vec<Sentiment> = trend.iter().map(|p| p.sentiment).collect();
        assert_eq!(regimes, vec![Sentiment::Fear, Sentiment::Greed, Sentiment::Fear]);
    }
}
