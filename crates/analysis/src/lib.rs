pub mod aggregate;
pub mod align;
pub mod charts;
pub mod clustering;
pub mod features;
pub mod insights;
pub mod kmeans;
pub mod pipeline;
pub mod predictive;
pub mod regimes;
pub mod trend;

// Re-export pipeline stages for convenience
pub use aggregate::aggregate_daily;
pub use align::{align, Aligned, JoinedTrade};
pub use charts::{archetype_scatter, build_chart_data, regime_distributions};
pub use clustering::cluster_traders;
pub use features::{standardize, trader_features, trim_outliers, Standardized};
pub use insights::generate_insights;
pub use kmeans::{KMeans, KMeansFit};
pub use pipeline::{AnalysisOutput, SentimentAnalysis};
pub use predictive::{lagged_observations, predictive_check};
pub use regimes::regime_summary;
pub use trend::median_pnl_trend;
