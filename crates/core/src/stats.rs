//! Descriptive statistics over `f64` samples.
//!
//! Functions return `None` on empty input instead of NaN so callers have to
//! decide how an empty group is reported.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Two-sided 95% normal quantile.
pub const Z_95: f64 = 1.96;

fn sorted(values: &[f64]) -> Vec<f64> {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    sorted
}

/// Lossy conversion used at the boundary between exact money sums and statistics.
#[must_use]
pub fn to_f64(value: Decimal) -> f64 {
    value.to_f64().unwrap_or(0.0)
}

#[must_use]
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Median; the mean of the two middle values for even-length input.
#[must_use]
pub fn median(values: &[f64]) -> Option<f64> {
    quantile(values, 0.5)
}

/// Exact median of money values, averaging the middle pair for even length.
///
/// Never overflows: when the middle pair's sum is out of range both values
/// share a sign, so their difference is halved instead.
#[must_use]
pub fn median_decimal(values: &[Decimal]) -> Option<Decimal> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort();
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        let (lo, hi) = (sorted[mid - 1], sorted[mid]);
        Some(
            lo.checked_add(hi)
                .map_or_else(|| lo + (hi - lo) / Decimal::TWO, |sum| sum / Decimal::TWO),
        )
    } else {
        Some(sorted[mid])
    }
}

/// Population standard deviation (divides by `n`).
#[must_use]
pub fn population_std(values: &[f64]) -> Option<f64> {
    let m = mean(values)?;
    let variance = values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / values.len() as f64;
    Some(variance.sqrt())
}

/// Quantile with linear interpolation between closest ranks.
///
/// Position `q * (n - 1)` in the sorted sample; `q` is clamped to `[0, 1]`.
#[must_use]
pub fn quantile(values: &[f64], q: f64) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(quantile_sorted(&sorted(values), q))
}

fn quantile_sorted(sorted: &[f64], q: f64) -> f64 {
    let pos = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lower = pos.floor() as usize;
    let upper = pos.ceil() as usize;
    let frac = pos - lower as f64;
    sorted[lower] + (sorted[upper] - sorted[lower]) * frac
}

/// Wilson score confidence interval for a proportion, clamped to `[0, 1]`.
#[must_use]
pub fn wilson_ci(successes: usize, n: usize, z: f64) -> (f64, f64) {
    if n == 0 {
        return (0.0, 0.0);
    }

    let n_f = n as f64;
    let p = successes as f64 / n_f;
    let z_sq = z * z;

    let denominator = 1.0 + z_sq / n_f;
    let center = p + z_sq / (2.0 * n_f);
    let spread = z * (p * (1.0 - p) / n_f + z_sq / (4.0 * n_f * n_f)).sqrt();

    (
        ((center - spread) / denominator).max(0.0),
        ((center + spread) / denominator).min(1.0),
    )
}

/// Box-plot summary of a sample.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FiveNumberSummary {
    pub count: usize,
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
    /// Smallest value within `q1 - 1.5 * IQR`.
    pub lower_whisker: f64,
    /// Largest value within `q3 + 1.5 * IQR`.
    pub upper_whisker: f64,
    /// Values beyond the whiskers.
    pub outliers: usize,
}

impl FiveNumberSummary {
    #[must_use]
    pub fn from_values(values: &[f64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }
        let sorted = sorted(values);
        let q1 = quantile_sorted(&sorted, 0.25);
        let q3 = quantile_sorted(&sorted, 0.75);
        let iqr = q3 - q1;
        let (fence_low, fence_high) = (q1 - 1.5 * iqr, q3 + 1.5 * iqr);

        let inside: Vec<f64> = sorted
            .iter()
            .copied()
            .filter(|v| *v >= fence_low && *v <= fence_high)
            .collect();

        Some(Self {
            count: sorted.len(),
            min: sorted[0],
            q1,
            median: quantile_sorted(&sorted, 0.5),
            q3,
            max: sorted[sorted.len() - 1],
            lower_whisker: inside.first().copied().unwrap_or(q1),
            upper_whisker: inside.last().copied().unwrap_or(q3),
            outliers: sorted.len() - inside.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    // ============================================================
    // Central Tendency Tests
    // ============================================================

    #[test]
    fn empty_input_has_no_statistics() {
        assert!(mean(&[]).is_none());
        assert!(median(&[]).is_none());
        assert!(population_std(&[]).is_none());
        assert!(quantile(&[], 0.5).is_none());
        assert!(FiveNumberSummary::from_values(&[]).is_none());
    }

    #[test]
    fn median_odd_and_even() {
        assert!((median(&[3.0, 1.0, 2.0]).unwrap() - 2.0).abs() < f64::EPSILON);
        assert!((median(&[4.0, 1.0, 3.0, 2.0]).unwrap() - 2.5).abs() < f64::EPSILON);
    }

    #[test]
    fn median_decimal_averages_middle_pair() {
        assert_eq!(median_decimal(&[dec!(10), dec!(30)]), Some(dec!(20)));
        assert_eq!(median_decimal(&[dec!(5), dec!(1), dec!(3)]), Some(dec!(3)));
        assert_eq!(median_decimal(&[]), None);
    }

    #[test]
    fn median_decimal_of_extreme_values_does_not_overflow() {
        assert_eq!(median_decimal(&[Decimal::MAX, Decimal::MAX]), Some(Decimal::MAX));
        assert_eq!(median_decimal(&[Decimal::MIN, Decimal::MIN]), Some(Decimal::MIN));
        assert_eq!(median_decimal(&[Decimal::MIN, Decimal::MAX]), Some(Decimal::ZERO));
    }

    #[test]
    fn population_std_divides_by_n() {
        // mean 5, squared deviations sum 32, n 8 -> variance 4
        let values = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert!((population_std(&values).unwrap() - 2.0).abs() < 1e-12);
    }

    // ============================================================
    // Quantile Tests
    // ============================================================

    #[test]
    fn quantile_interpolates_linearly() {
        let values = [1.0, 2.0, 3.0, 4.0, 5.0];
        assert!((quantile(&values, 0.05).unwrap() - 1.2).abs() < 1e-12);
        assert!((quantile(&values, 0.95).unwrap() - 4.8).abs() < 1e-12);
        assert!((quantile(&values, 0.0).unwrap() - 1.0).abs() < f64::EPSILON);
        assert!((quantile(&values, 1.0).unwrap() - 5.0).abs() < f64::EPSILON);
    }

    #[test]
    fn quantile_unsorted_input() {
        let values = [5.0, 1.0, 3.0, 2.0, 4.0];
        assert!((quantile(&values, 0.5).unwrap() - 3.0).abs() < f64::EPSILON);
    }

    #[test]
    fn quantile_single_value() {
        assert!((quantile(&[7.0], 0.05).unwrap() - 7.0).abs() < f64::EPSILON);
    }

    // ============================================================
    // Wilson Interval Tests
    // ============================================================

    #[test]
    fn wilson_ci_brackets_point_estimate() {
        let (lower, upper) = wilson_ci(60, 100, Z_95);
        assert!(lower < 0.6 && 0.6 < upper);
        assert!(lower > 0.49 && upper < 0.70);
    }

    #[test]
    fn wilson_ci_empty_sample() {
        assert_eq!(wilson_ci(0, 0, Z_95), (0.0, 0.0));
    }

    #[test]
    fn wilson_ci_stays_in_unit_interval() {
        let (lower, upper) = wilson_ci(5, 5, Z_95);
        assert!(lower >= 0.0 && upper <= 1.0);
    }

    // ============================================================
    // Box Summary Tests
    // ============================================================

    #[test]
    fn five_number_summary_flags_outliers() {
        let values = [1.0, 2.0, 3.0, 4.0, 5.0, 100.0];
        let summary = FiveNumberSummary::from_values(&values).unwrap();
        assert_eq!(summary.count, 6);
        assert_eq!(summary.outliers, 1);
        assert!((summary.upper_whisker - 5.0).abs() < f64::EPSILON);
        assert!((summary.max - 100.0).abs() < f64::EPSILON);
        assert!((summary.median - 3.5).abs() < f64::EPSILON);
    }
}
