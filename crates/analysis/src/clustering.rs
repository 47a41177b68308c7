//! Trader archetypes: per-account features, trimmed and standardized, split by k-means.

use trader_sentiment_core::stats::mean;
use trader_sentiment_core::{
    AnalysisError, AnalysisResult, ClusterAssignment, ClusterProfile, ClusterReport,
    ClusteringConfig, LaggedObservation, TraderFeatures,
};

use crate::features::{standardize, trader_features, trim_outliers};
use crate::kmeans::KMeans;

/// Clusters accounts into `config.k` behavioral archetypes.
///
/// # Errors
/// - `InvalidConfig` if `config` fails validation
/// - `InsufficientAccounts` if fewer than `k` accounts survive trimming
/// - `ZeroVariance` if a feature is constant across the survivors
pub fn cluster_traders(
    lagged: &[LaggedObservation],
    config: &ClusteringConfig,
) -> AnalysisResult<ClusterReport> {
    config.validate()?;

    let features = trader_features(lagged);
    let accounts_total = features.len();
    let survivors = trim_outliers(features, config.trim_lower, config.trim_upper);

    if survivors.len() < config.k {
        return Err(AnalysisError::InsufficientAccounts {
            required: config.k,
            available: survivors.len(),
        });
    }

    let standardized = standardize(&survivors)?;
    let fit = KMeans::from_config(config).fit(&standardized.rows)?;

    let assignments: Vec<ClusterAssignment> = survivors
        .iter()
        .zip(standardized.rows)
        .zip(&fit.labels)
        .map(|((features, standardized), &cluster)| ClusterAssignment {
            account: features.account.clone(),
            median_pnl: features.median_pnl,
            mean_trade_count: features.mean_trade_count,
            median_size: features.median_size,
            standardized,
            cluster,
        })
        .collect();

    let profiles = (0..config.k)
        .filter_map(|cluster| profile(cluster, &survivors, &fit.labels))
        .collect();

    let report = ClusterReport {
        accounts_total,
        accounts_clustered: survivors.len(),
        k: config.k,
        seed: config.seed,
        iterations: fit.iterations,
        converged: fit.converged,
        inertia: fit.inertia,
        assignments,
        profiles,
    };

    tracing::info!(
        accounts_total,
        accounts_clustered = report.accounts_clustered,
        iterations = report.iterations,
        counts = ?report.counts(),
        "Clustered trader archetypes"
    );
    Ok(report)
}

/// Mean raw features of one cluster; `None` when the cluster ended up empty.
fn profile(cluster: usize, features: &[TraderFeatures], labels: &[usize]) -> Option<ClusterProfile> {
    let members: Vec<&TraderFeatures> = features
        .iter()
        .zip(labels)
        .filter(|(_, &label)| label == cluster)
        .map(|(f, _)| f)
        .collect();

    let column = |pick: fn(&TraderFeatures) -> f64| {
        let values: Vec<f64> = members.iter().map(|f| pick(f)).collect();
        mean(&values)
    };

    Some(ClusterProfile {
        cluster,
        accounts: members.len(),
        mean_median_pnl: column(|f| f.median_pnl)?,
        mean_trade_count: column(|f| f.mean_trade_count)?,
        mean_median_size: column(|f| f.median_size)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;
    use trader_sentiment_core::{DailyObservation, Sentiment};

    /// One lagged observation per (account, day) with the given daily values.
    fn history(account: &str, days: u32, pnl: i64, trades: usize, size: i64) -> Vec<LaggedObservation> {
        (1..=days)
            .map(|d| {
                let date = NaiveDate::from_ymd_opt(2024, 3, d).unwrap();
                LaggedObservation {
                    observation: DailyObservation {
                        account: account.to_string(),
                        date,
                        sentiment: if d % 2 == 0 { Sentiment::Greed } else { Sentiment::Fear },
                        closed_pnl: Decimal::from(pnl),
                        size_usd: Decimal::from(size),
                        trade_count: trades,
                        win: pnl > 0,
                    },
                    next_date: date.succ_opt().unwrap(),
                    next_profit: pnl > 0,
                }
            })
            .collect()
    }

    /// Ten cautious accounts and ten aggressive ones, with small per-account variation.
    fn two_styles() -> Vec<LaggedObservation> {
        let mut lagged = Vec::new();
        for i in 0_i64..10 {
            let jitter = i as usize;
            lagged.extend(history(&format!("cautious{i:02}"), 3, 10 + i, 2 + jitter % 2, 100 + i));
            lagged.extend(history(&format!("aggressive{i:02}"), 3, 500 + i, 40 + jitter % 3, 9_000 + i));
        }
        lagged
    }

    fn no_trimming() -> ClusteringConfig {
        ClusteringConfig {
            trim_lower: 0.0,
            trim_upper: 1.0,
            ..ClusteringConfig::default()
        }
    }

    // ============================================================
    // Archetype Tests
    // ============================================================

    #[test]
    fn separates_two_trading_styles() {
        let report = cluster_traders(&two_styles(), &no_trimming()).unwrap();

        assert_eq!(report.accounts_total, 20);
        assert_eq!(report.accounts_clustered, 20);
        assert_eq!(report.counts(), vec![10, 10]);

        let cluster_of = |account: &str| {
            report
                .assignments
                .iter()
                .find(|a| a.account == account)
                .map(|a| a.cluster)
                .unwrap()
        };
        let cautious = cluster_of("cautious00");
        let aggressive = cluster_of("aggressive00");
        assert_ne!(cautious, aggressive);
        for a in &report.assignments {
            let expected = if a.account.starts_with("cautious") { cautious } else { aggressive };
            assert_eq!(a.cluster, expected, "{} misassigned", a.account);
        }
    }

    #[test]
    fn profiles_are_in_original_units() {
        let report = cluster_traders(&two_styles(), &no_trimming()).unwrap();
        assert_eq!(report.profiles.len(), 2);

        let big = report
            .profiles
            .iter()
            .max_by(|a, b| a.mean_median_size.total_cmp(&b.mean_median_size))
            .unwrap();
        assert_eq!(big.accounts, 10);
        assert!((big.mean_median_size - 9_004.5).abs() < 1e-9);
        assert!((big.mean_median_pnl - 504.5).abs() < 1e-9);
    }

    #[test]
    fn assignments_keep_raw_and_standardized_features() {
        let report = cluster_traders(&two_styles(), &no_trimming()).unwrap();
        let first = &report.assignments[0];
        assert_eq!(first.standardized.len(), 3);
        assert!(first.median_size > 1_000.0);
        assert!(first.standardized[2] > 0.0);
    }

    #[test]
    fn same_seed_reproduces_assignments() {
        let config = no_trimming();
        let a = cluster_traders(&two_styles(), &config).unwrap();
        let b = cluster_traders(&two_styles(), &config).unwrap();
        assert_eq!(a, b);
    }

    // ============================================================
    // Precondition Tests
    // ============================================================

    #[test]
    fn trimming_shrinks_the_clustered_population() {
        let report = cluster_traders(&two_styles(), &ClusteringConfig::default()).unwrap();
        assert_eq!(report.accounts_total, 20);
        assert!(report.accounts_clustered < 20);
        assert_eq!(report.assignments.len(), report.accounts_clustered);
    }

    #[test]
    fn too_few_accounts_after_trimming_is_reported() {
        let mut lagged = history("a", 2, 1, 1, 10);
        lagged.extend(history("b", 2, 2, 2, 20));
        lagged.extend(history("c", 2, 3, 3, 30));

        // Default 5%/95% trimming drops the extremes of three accounts.
        let err = cluster_traders(&lagged, &ClusteringConfig::default()).unwrap_err();
        assert!(matches!(
            err,
            AnalysisError::InsufficientAccounts {
                required: 2,
                available: 1
            }
        ));
        assert!(err.is_insufficient_data());
    }

    #[test]
    fn constant_feature_is_reported() {
        let mut lagged = history("a", 2, 1, 5, 10);
        lagged.extend(history("b", 2, 2, 5, 20));
        lagged.extend(history("c", 2, 3, 5, 30));

        let err = cluster_traders(&lagged, &no_trimming()).unwrap_err();
        assert!(matches!(err, AnalysisError::ZeroVariance { .. }));
    }

    #[test]
    fn invalid_config_is_rejected_before_clustering() {
        let config = ClusteringConfig {
            k: 0,
            ..ClusteringConfig::default()
        };
        assert!(matches!(
            cluster_traders(&two_styles(), &config),
            Err(AnalysisError::InvalidConfig(_))
        ));
    }
}
