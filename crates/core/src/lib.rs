//! Core types, errors, configuration and statistics for the trader sentiment analysis.

pub mod config;
pub mod config_loader;
pub mod error;
pub mod report;
pub mod report_formatter;
pub mod stats;
pub mod types;

pub use config::{AppConfig, ClusteringConfig, InputConfig, OutputConfig, OutputFormat};
pub use config_loader::{ConfigLoader, DEFAULT_CONFIG_PATH};
pub use error::{AnalysisError, AnalysisResult};
pub use report::{
    AlignmentReport, AnalysisReport, ChartData, ClusterAssignment, ClusterProfile, ClusterReport,
    ConditionalProbability, DataQuality, LoadReport, PredictiveCheck, RegimeDistribution,
    RegimeStats, ScatterPoint, SkippedSection, TrendPoint,
};
pub use report_formatter::ReportFormatter;
pub use stats::FiveNumberSummary;
pub use types::{
    DailyObservation, DateRange, LaggedObservation, Sentiment, SentimentRecord, TradeRecord,
    TraderFeatures,
};
