use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::{AnalysisError, AnalysisResult};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub inputs: InputConfig,
    pub clustering: ClusteringConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    /// Fear/Greed index CSV (`date`, `classification`).
    pub sentiment_path: PathBuf,
    /// Trade history CSV (`Account`, `Timestamp IST`, `Closed PnL`, `Size USD`).
    pub trades_path: PathBuf,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            sentiment_path: PathBuf::from("data/fear_greed_index.csv"),
            trades_path: PathBuf::from("data/historical_data.csv"),
        }
    }
}

/// Trader archetype clustering parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClusteringConfig {
    /// Number of archetypes.
    pub k: usize,
    /// Seed for centroid initialization and empty-cluster reseeding.
    pub seed: u64,
    pub max_iterations: usize,
    /// Lower trimming quantile applied to each feature.
    pub trim_lower: f64,
    /// Upper trimming quantile applied to each feature.
    pub trim_upper: f64,
    /// Relative tolerance of the centroid convergence check.
    pub rtol: f64,
    /// Absolute tolerance of the centroid convergence check.
    pub atol: f64,
}

impl Default for ClusteringConfig {
    fn default() -> Self {
        Self {
            k: 2,
            seed: 42,
            max_iterations: 100,
            trim_lower: 0.05,
            trim_upper: 0.95,
            rtol: 1e-5,
            atol: 1e-8,
        }
    }
}

impl ClusteringConfig {
    /// Checks parameter ranges.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if `k` or `max_iterations` is zero, the trimming
    /// quantiles are outside `[0, 1]` or inverted, or a tolerance is negative.
    pub fn validate(&self) -> AnalysisResult<()> {
        if self.k == 0 {
            return Err(AnalysisError::InvalidConfig("k must be at least 1".to_string()));
        }
        if self.max_iterations == 0 {
            return Err(AnalysisError::InvalidConfig(
                "max_iterations must be at least 1".to_string(),
            ));
        }
        let in_unit = |q: f64| q.is_finite() && (0.0..=1.0).contains(&q);
        if !in_unit(self.trim_lower) || !in_unit(self.trim_upper) {
            return Err(AnalysisError::InvalidConfig(format!(
                "trim quantiles must lie in [0, 1], got {} and {}",
                self.trim_lower, self.trim_upper
            )));
        }
        if self.trim_lower > self.trim_upper {
            return Err(AnalysisError::InvalidConfig(format!(
                "trim_lower ({}) exceeds trim_upper ({})",
                self.trim_lower, self.trim_upper
            )));
        }
        if !(self.rtol >= 0.0 && self.atol >= 0.0) {
            return Err(AnalysisError::InvalidConfig(
                "tolerances must be non-negative".to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory for chart-series CSVs; nothing is written when unset.
    pub export_dir: Option<PathBuf>,
    pub format: OutputFormat,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s.to_lowercase().as_str() {
            "text" | "txt" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            _ => Err(anyhow::anyhow!(
                "Invalid output format: '{}'. Valid values: text, json",
                s
            )),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Text => write!(f, "text"),
            Self::Json => write!(f, "json"),
        }
    }
}
