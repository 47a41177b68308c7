//! Closing bullet points, worded from the computed statistics.

use trader_sentiment_core::{ClusterReport, PredictiveCheck, RegimeStats, Sentiment};

/// Relative difference above which a behavioral metric counts as shifted.
pub const BEHAVIOR_SHIFT_THRESHOLD: f64 = 0.10;
/// Relative median-PnL difference above which profitability counts as notably different.
pub const PROFITABILITY_THRESHOLD: f64 = 0.50;
/// Accuracy lift at or below which the regime signal counts as weak.
pub const WEAK_LIFT_THRESHOLD: f64 = 0.01;

/// One sentence per finding, in report order.
#[must_use]
pub fn generate_insights(
    regimes: &[RegimeStats],
    predictive: Option<&PredictiveCheck>,
    clustering: Option<&ClusterReport>,
) -> Vec<String> {
    let mut insights = Vec::new();

    let find = |s: Sentiment| regimes.iter().find(|r| r.sentiment == s);
    match (find(Sentiment::Fear), find(Sentiment::Greed)) {
        (Some(fear), Some(greed)) => {
            insights.push(behavior_shift(fear, greed));
            insights.push(profitability(fear, greed));
            insights.push(risk_versus_win_rate(fear, greed));
        }
        (Some(only), None) | (None, Some(only)) => insights.push(format!(
            "Only {} days are present in the overlap; regime comparisons are unavailable.",
            only.sentiment
        )),
        (None, None) => {}
    }

    if let Some(check) = predictive {
        insights.push(predictive_power(check));
    }
    if let Some(report) = clustering {
        insights.push(archetypes(report));
    }
    insights
}

/// `|a - b|` relative to the larger magnitude; zero when both are zero.
fn relative_difference(a: f64, b: f64) -> f64 {
    let scale = a.abs().max(b.abs());
    if scale == 0.0 {
        return 0.0;
    }
    (a - b).abs() / scale
}

fn behavior_shift(fear: &RegimeStats, greed: &RegimeStats) -> String {
    let frequency = relative_difference(fear.median_trade_count, greed.median_trade_count);
    let sizing = relative_difference(fear.median_size_usd, greed.median_size_usd);
    let detail = format!(
        "median trades per day {:.1} in Fear vs {:.1} in Greed, median daily size ${:.0} vs ${:.0}",
        fear.median_trade_count, greed.median_trade_count, fear.median_size_usd, greed.median_size_usd
    );

    match (frequency > BEHAVIOR_SHIFT_THRESHOLD, sizing > BEHAVIOR_SHIFT_THRESHOLD) {
        (true, true) => format!("Sentiment shifts trader behavior (frequency & sizing): {detail}."),
        (true, false) => format!("Sentiment shifts trading frequency more than sizing: {detail}."),
        (false, true) => format!("Sentiment shifts position sizing more than frequency: {detail}."),
        (false, false) => format!("Trader behavior is similar across regimes: {detail}."),
    }
}

fn profitability(fear: &RegimeStats, greed: &RegimeStats) -> String {
    let degree = if relative_difference(fear.median_pnl, greed.median_pnl) > PROFITABILITY_THRESHOLD {
        "notable"
    } else {
        "modest"
    };
    format!(
        "Profitability difference between regimes is {degree}: median daily PnL {:.2} in Fear vs {:.2} in Greed.",
        fear.median_pnl, greed.median_pnl
    )
}

fn risk_versus_win_rate(fear: &RegimeStats, greed: &RegimeStats) -> String {
    let risk = relative_difference(fear.median_abs_pnl, greed.median_abs_pnl);
    let win_rate = relative_difference(fear.win_rate, greed.win_rate);
    let detail = format!(
        "median |PnL| {:.2} vs {:.2}, win rate {:.1}% vs {:.1}%",
        fear.median_abs_pnl,
        greed.median_abs_pnl,
        fear.win_rate * 100.0,
        greed.win_rate * 100.0
    );

    if risk > win_rate {
        format!("Risk exposure changes more than win rate: {detail}.")
    } else {
        format!("Win rate changes more than risk exposure: {detail}.")
    }
}

fn predictive_power(check: &PredictiveCheck) -> String {
    if check.lift <= WEAK_LIFT_THRESHOLD {
        format!(
            "Sentiment alone provides weak predictive power: regime accuracy {:.3} vs baseline {:.3}.",
            check.regime_accuracy, check.baseline_accuracy
        )
    } else {
        format!(
            "Sentiment carries some next-day signal: regime accuracy {:.3} vs baseline {:.3} (lift {:+.3}).",
            check.regime_accuracy, check.baseline_accuracy, check.lift
        )
    }
}

fn archetypes(report: &ClusterReport) -> String {
    let counts = report
        .counts()
        .iter()
        .enumerate()
        .map(|(cluster, n)| format!("cluster {cluster}: {n}"))
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "Traders split into {} behavioral archetypes ({counts}) among {} of {} accounts kept after trimming.",
        report.k, report.accounts_clustered, report.accounts_total
    )
}
