//! Naive next-day signal test: does today's regime say anything about whether
//! an account profits on its next active day?

use trader_sentiment_core::stats::{wilson_ci, Z_95};
use trader_sentiment_core::{
    AnalysisError, AnalysisResult, ConditionalProbability, DailyObservation, LaggedObservation,
    PredictiveCheck, Sentiment,
};

/// Pairs each observation with the win flag of the same account's next observation.
///
/// Observations are ordered by (account, date). The last observation of each
/// account has no successor and is dropped. Gaps are not filled, so the
/// successor may be several calendar days later.
#[must_use]
pub fn lagged_observations(daily: &[DailyObservation]) -> Vec<LaggedObservation> {
    let mut ordered: Vec<&DailyObservation> = daily.iter().collect();
    ordered.sort_by(|a, b| (&a.account, a.date).cmp(&(&b.account, b.date)));

    ordered
        .windows(2)
        .filter(|pair| pair[0].account == pair[1].account)
        .map(|pair| LaggedObservation {
            observation: pair[0].clone(),
            next_date: pair[1].date,
            next_profit: pair[1].win,
        })
        .collect()
}

/// Compares regime-conditioned next-day profit rates with a majority-class baseline.
///
/// # Errors
/// Returns `NoSuccessorObservations` if `lagged` is empty.
pub fn predictive_check(lagged: &[LaggedObservation]) -> AnalysisResult<PredictiveCheck> {
    if lagged.is_empty() {
        return Err(AnalysisError::NoSuccessorObservations);
    }

    let samples = lagged.len();
    let profitable = lagged.iter().filter(|l| l.next_profit).count();
    let next_profit_rate = profitable as f64 / samples as f64;
    let baseline_accuracy = next_profit_rate.max(1.0 - next_profit_rate);

    let mut correct_by_regime = 0usize;
    let conditional: Vec<ConditionalProbability> = Sentiment::ALL
        .into_iter()
        .map(|sentiment| {
            let (n, wins) = lagged
                .iter()
                .filter(|l| l.observation.sentiment == sentiment)
                .fold((0usize, 0usize), |(n, wins), l| {
                    (n + 1, wins + usize::from(l.next_profit))
                });
            correct_by_regime += wins.max(n - wins);

            let (ci_lower, ci_upper) = wilson_ci(wins, n, Z_95);
            ConditionalProbability {
                sentiment,
                samples: n,
                probability: (n > 0).then(|| wins as f64 / n as f64),
                ci_lower,
                ci_upper,
            }
        })
        .collect();

    let regime_accuracy = correct_by_regime as f64 / samples as f64;
    let check = PredictiveCheck {
        samples,
        next_profit_rate,
        baseline_accuracy,
        conditional,
        regime_accuracy,
        lift: regime_accuracy - baseline_accuracy,
    };

    tracing::info!(
        samples,
        baseline = check.baseline_accuracy,
        regime_accuracy = check.regime_accuracy,
        "Computed predictive check"
    );
    Ok(check)
}
