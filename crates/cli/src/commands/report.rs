//! Report CLI command.
//!
//! Runs the whole analysis over the two CSV inputs and prints the report as
//! boxed text or JSON. Chart series can also be written out as CSV files.

use anyhow::Result;
use clap::Args;
use std::path::PathBuf;
use trader_sentiment_analysis::SentimentAnalysis;
use trader_sentiment_core::{
    AppConfig, ConfigLoader, OutputFormat, ReportFormatter, DEFAULT_CONFIG_PATH,
};
use trader_sentiment_data::CsvExporter;

/// Arguments for the report command.
#[derive(Args, Debug, Clone)]
pub struct ReportArgs {
    /// Fear/Greed index CSV (overrides the config file)
    #[arg(long)]
    pub sentiment: Option<PathBuf>,

    /// Trade history CSV (overrides the config file)
    #[arg(long)]
    pub trades: Option<PathBuf>,

    /// Config file path; a missing file falls back to defaults
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
    pub config: PathBuf,

    /// K-means seed (overrides the config file)
    #[arg(long)]
    pub seed: Option<u64>,

    /// Output format: text or json
    #[arg(long)]
    pub format: Option<String>,

    /// Directory for chart-series CSV files
    #[arg(long)]
    pub export_dir: Option<PathBuf>,
}

impl ReportArgs {
    /// Applies command-line overrides on top of the loaded configuration.
    fn apply(&self, mut config: AppConfig) -> Result<AppConfig> {
        if let Some(path) = &self.sentiment {
            config.inputs.sentiment_path = path.clone();
        }
        if let Some(path) = &self.trades {
            config.inputs.trades_path = path.clone();
        }
        if let Some(seed) = self.seed {
            config.clustering.seed = seed;
        }
        if let Some(format) = &self.format {
            config.output.format = format.parse::<OutputFormat>()?;
        }
        if let Some(dir) = &self.export_dir {
            config.output.export_dir = Some(dir.clone());
        }
        Ok(config)
    }
}

/// Runs the report command.
///
/// # Errors
/// Returns an error if the configuration is invalid, an input cannot be
/// loaded, the datasets cannot be aligned, or the export fails.
pub fn run_report(args: ReportArgs) -> Result<()> {
    let config = args.apply(ConfigLoader::load_from(&args.config)?)?;

    tracing::info!(
        sentiment = %config.inputs.sentiment_path.display(),
        trades = %config.inputs.trades_path.display(),
        seed = config.clustering.seed,
        "Running sentiment analysis"
    );

    let output = SentimentAnalysis::new(config.clustering).run_from_paths(&config.inputs)?;

    match config.output.format {
        OutputFormat::Text => println!("{}", ReportFormatter::format(&output.report)),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&output.report)?),
    }

    if let Some(dir) = &config.output.export_dir {
        let written = CsvExporter::new(dir)?.export_all(&output.report, &output.daily)?;
        for path in written {
            tracing::info!("Wrote {}", path.display());
        }
    }

    Ok(())
}
