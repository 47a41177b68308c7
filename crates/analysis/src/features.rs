//! Account-level behavioral features for archetype clustering.

use std::collections::BTreeMap;
use trader_sentiment_core::stats::{mean, median, population_std, quantile, to_f64};
use trader_sentiment_core::{AnalysisError, AnalysisResult, LaggedObservation, TraderFeatures};

/// Relative threshold below which a feature's spread counts as zero.
const ZERO_STD_TOLERANCE: f64 = 1e-12;

/// Per-account median daily PnL, mean trades per day and median size.
///
/// Built from the observations that have a successor, the same population the
/// predictive check uses; accounts active on a single day have no features.
#[must_use]
pub fn trader_features(lagged: &[LaggedObservation]) -> Vec<TraderFeatures> {
    let mut by_account: BTreeMap<&str, (Vec<f64>, Vec<f64>, Vec<f64>)> = BTreeMap::new();
    for lagged in lagged {
        let obs = &lagged.observation;
        let entry = by_account.entry(obs.account.as_str()).or_default();
        entry.0.push(to_f64(obs.closed_pnl));
        entry.1.push(obs.trade_count as f64);
        entry.2.push(to_f64(obs.size_usd));
    }

    by_account
        .into_iter()
        .filter_map(|(account, (pnl, counts, sizes))| {
            Some(TraderFeatures {
                account: account.to_string(),
                median_pnl: median(&pnl)?,
                mean_trade_count: mean(&counts)?,
                median_size: median(&sizes)?,
            })
        })
        .collect()
}

/// Drops accounts outside the `[lower, upper]` quantile band, one feature at a time.
///
/// Each feature's bounds are computed on the accounts that survived the
/// previous features, in `TraderFeatures::NAMES` order.
#[must_use]
pub fn trim_outliers(mut features: Vec<TraderFeatures>, lower: f64, upper: f64) -> Vec<TraderFeatures> {
    let before = features.len();
    for column in 0..TraderFeatures::NAMES.len() {
        let values: Vec<f64> = features.iter().map(|f| f.values()[column]).collect();
        let (Some(low), Some(high)) = (quantile(&values, lower), quantile(&values, upper)) else {
            break;
        };
        features.retain(|f| {
            let v = f.values()[column];
            v >= low && v <= high
        });
        tracing::debug!(
            feature = TraderFeatures::NAMES[column],
            low,
            high,
            remaining = features.len(),
            "Trimmed feature"
        );
    }
    tracing::info!(before, after = features.len(), "Trimmed trader features");
    features
}

/// Z-scored feature matrix with the statistics used to build it.
#[derive(Debug, Clone, PartialEq)]
pub struct Standardized {
    pub means: [f64; 3],
    pub stds: [f64; 3],
    /// One row per account, in input order.
    pub rows: Vec<Vec<f64>>,
}

/// Centers each feature on its mean and scales by its population standard deviation.
///
/// # Errors
/// - `EmptyDataset` if there are no accounts
/// - `ZeroVariance` if a feature is constant across the accounts
pub fn standardize(features: &[TraderFeatures]) -> AnalysisResult<Standardized> {
    if features.is_empty() {
        return Err(AnalysisError::EmptyDataset {
            dataset: "trader features".to_string(),
        });
    }

    let mut means = [0.0; 3];
    let mut stds = [0.0; 3];
    for column in 0..3 {
        let values: Vec<f64> = features.iter().map(|f| f.values()[column]).collect();
        let m = mean(&values).unwrap_or(0.0);
        let s = population_std(&values).unwrap_or(0.0);
        if !s.is_finite() || s <= ZERO_STD_TOLERANCE * m.abs().max(1.0) {
            return Err(AnalysisError::ZeroVariance {
                feature: TraderFeatures::NAMES[column].to_string(),
            });
        }
        means[column] = m;
        stds[column] = s;
    }

    let rows: Vec<Vec<f64>> = features
        .iter()
        .map(|f| {
            f.values()
                .iter()
                .enumerate()
                .map(|(c, v)| (v - means[c]) / stds[c])
                .collect::<Vec<f64>>()
        })
        .collect();

    Ok(Standardized { means, stds, rows })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;
    use trader_sentiment_core::{DailyObservation, Sentiment};

    fn lagged(account: &str, d: u32, pnl: i64, trades: usize, size: i64) -> LaggedObservation {
        let date = NaiveDate::from_ymd_opt(2024, 1, d).unwrap();
        LaggedObservation {
            observation: DailyObservation {
                account: account.to_string(),
                date,
                sentiment: Sentiment::Fear,
                closed_pnl: Decimal::from(pnl),
                size_usd: Decimal::from(size),
                trade_count: trades,
                win: pnl > 0,
            },
            next_date: date.succ_opt().unwrap(),
            next_profit: false,
        }
    }

    fn features(account: &str, pnl: f64, count: f64, size: f64) -> TraderFeatures {
        TraderFeatures {
            account: account.to_string(),
            median_pnl: pnl,
            mean_trade_count: count,
            median_size: size,
        }
    }

    // ============================================================
    // Feature Construction Tests
    // ============================================================

    #[test]
    fn features_aggregate_per_account() {
        let rows = vec![
            lagged("a", 1, 10, 1, 100),
            lagged("a", 2, -30, 4, 300),
            lagged("a", 3, 20, 2, 200),
            lagged("b", 1, 5, 3, 50),
        ];
        let features = trader_features(&rows);

        assert_eq!(features.len(), 2);
        assert_eq!(features[0].account, "a");
        assert!((features[0].median_pnl - 10.0).abs() < 1e-12);
        assert!((features[0].mean_trade_count - 7.0 / 3.0).abs() < 1e-12);
        assert!((features[0].median_size - 200.0).abs() < 1e-12);
        assert!((features[1].median_pnl - 5.0).abs() < 1e-12);
    }

    // ============================================================
    // Trimming Tests
    // ============================================================

    #[test]
    fn trimming_drops_extremes_of_each_feature() {
        let population: Vec<TraderFeatures> = (0..21)
            .map(|i| {
                features(
                    &format!("acct{i:02}"),
                    f64::from(i),
                    5.0 + f64::from(i % 3),
                    100.0 + f64::from(i),
                )
            })
            .collect();
        let trimmed = trim_outliers(population, 0.05, 0.95);

        // pnl 0..=20: q05 = 1, q95 = 19 -> drops accounts 0 and 20
        assert!(trimmed.iter().all(|f| f.median_pnl >= 1.0 && f.median_pnl <= 19.0));
        assert!(!trimmed.iter().any(|f| f.account == "acct00" || f.account == "acct20"));
    }

    #[test]
    fn later_bounds_use_survivors_of_earlier_features() {
        // The size outlier is also the pnl outlier, so it is removed before the
        // size quantiles are computed and cannot stretch them.
        let mut population: Vec<TraderFeatures> = (0..20)
            .map(|i| features(&format!("acct{i:02}"), f64::from(i), 1.0, 100.0 + f64::from(i)))
            .collect();
        population.push(features("whale", 1_000.0, 1.0, 1_000_000.0));

        let trimmed = trim_outliers(population, 0.05, 0.95);
        assert!(!trimmed.iter().any(|f| f.account == "whale"));
        let max_size = trimmed.iter().map(|f| f.median_size).fold(f64::MIN, f64::max);
        assert!(max_size < 120.0);
    }

    #[test]
    fn trimming_empty_population_is_empty() {
        assert!(trim_outliers(Vec::new(), 0.05, 0.95).is_empty());
    }

    // ============================================================
    // Standardization Tests
    // ============================================================

    #[test]
    fn standardized_columns_have_zero_mean_unit_std() {
        let population = vec![
            features("a", 1.0, 2.0, 10.0),
            features("b", 2.0, 4.0, 20.0),
            features("c", 3.0, 9.0, 60.0),
        ];
        let standardized = standardize(&population).unwrap();

        for column in 0..3 {
            let values: Vec<f64> = standardized.rows.iter().map(|r| r[column]).collect();
            assert!(mean(&values).unwrap().abs() < 1e-12);
            assert!((population_std(&values).unwrap() - 1.0).abs() < 1e-12);
        }
        assert!((standardized.means[0] - 2.0).abs() < 1e-12);
    }

    #[test]
    fn constant_feature_fails_fast() {
        let population = vec![features("a", 1.0, 3.0, 10.0), features("b", 2.0, 3.0, 20.0)];
        let err = standardize(&population).unwrap_err();
        assert!(matches!(
            err,
            AnalysisError::ZeroVariance { ref feature } if feature == "mean_trade_count"
        ));
    }

    #[test]
    fn constant_fractional_feature_is_detected_despite_rounding() {
        let population = vec![
            features("a", 1.0, 0.1, 10.0),
            features("b", 2.0, 0.1, 20.0),
            features("c", 3.0, 0.1, 30.0),
        ];
        assert!(matches!(
            standardize(&population),
            Err(AnalysisError::ZeroVariance { .. })
        ));
    }

    #[test]
    fn empty_population_cannot_be_standardized() {
        assert!(matches!(
            standardize(&[]),
            Err(AnalysisError::EmptyDataset { .. })
        ));
    }
}
