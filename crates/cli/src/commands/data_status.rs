//! Data status CLI command.
//!
//! Loads both inputs and aligns them without running any analysis. Used to
//! check how much data survives cleaning and the date intersection.

use anyhow::Result;
use clap::Args;
use std::path::PathBuf;
use trader_sentiment_analysis::align;
use trader_sentiment_core::{
    AlignmentReport, ConfigLoader, InputConfig, LoadReport, DEFAULT_CONFIG_PATH,
};
use trader_sentiment_data::{load_sentiment_index, load_trade_history};

/// Arguments for the data-status command.
#[derive(Args, Debug, Clone)]
pub struct DataStatusArgs {
    /// Fear/Greed index CSV (overrides the config file)
    #[arg(long)]
    pub sentiment: Option<PathBuf>,

    /// Trade history CSV (overrides the config file)
    #[arg(long)]
    pub trades: Option<PathBuf>,

    /// Config file path; a missing file falls back to defaults
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
    pub config: PathBuf,
}

impl DataStatusArgs {
    /// Input paths from the config, with command-line paths taking precedence.
    fn inputs(&self, mut inputs: InputConfig) -> InputConfig {
        if let Some(path) = &self.sentiment {
            inputs.sentiment_path = path.clone();
        }
        if let Some(path) = &self.trades {
            inputs.trades_path = path.clone();
        }
        inputs
    }
}

/// Runs the data-status command.
///
/// # Errors
/// Returns an error if the configuration is invalid, either file cannot be
/// loaded, or the datasets do not overlap.
pub fn run_data_status(args: DataStatusArgs) -> Result<()> {
    let inputs = args.inputs(ConfigLoader::load_from(&args.config)?.inputs);
    tracing::info!(
        sentiment = %inputs.sentiment_path.display(),
        trades = %inputs.trades_path.display(),
        "Checking data status"
    );

    let sentiments = load_sentiment_index(&inputs.sentiment_path)?;
    let trades = load_trade_history(&inputs.trades_path)?;

    let aligned = align(sentiments.records, trades.records)?;

    print!(
        "{}",
        format_status(&sentiments.report, &trades.report, &aligned.report)
    );
    Ok(())
}

fn format_status(sentiment: &LoadReport, trades: &LoadReport, alignment: &AlignmentReport) -> String {
    let mut out = String::new();
    let rule = "=".repeat(80);
    let thin = "-".repeat(80);

    out.push('\n');
    out.push_str(&format!("{rule}\nDATA STATUS REPORT\n{rule}\n\n"));
    out.push_str(&format!(
        "{:<18} {:>8} {:>8} {:>8} {:>14} {:>16} {:>14}\n",
        "Dataset", "Read", "Kept", "Kept %", "Invalid Date", "Invalid Numeric", "Blank Account"
    ));
    out.push_str(&format!("{thin}\n"));
    for (name, report) in [("Sentiment index", sentiment), ("Trade history", trades)] {
        out.push_str(&format!(
            "{:<18} {:>8} {:>8} {:>7.1}% {:>14} {:>16} {:>14}\n",
            name,
            report.rows_read,
            report.rows_kept,
            report.kept_ratio() * 100.0,
            report.invalid_date,
            report.invalid_numeric,
            report.invalid_account
        ));
    }
    out.push_str(&format!("{rule}\n\n"));

    out.push_str("DATE RANGES:\n");
    out.push_str(&format!("{}\n", "-".repeat(60)));
    out.push_str(&format!("  {:<23}: {}\n", "Sentiment index", alignment.sentiment_range));
    out.push_str(&format!("  {:<23}: {}\n", "Trade history", alignment.trade_range));
    out.push_str(&format!(
        "  {:<23}: {} ({} days)\n",
        "Overlap",
        alignment.overlap,
        alignment.overlap.num_days()
    ));
    out.push('\n');

    out.push_str("ALIGNMENT:\n");
    out.push_str(&format!("{}\n", "-".repeat(60)));
    out.push_str(&format!("  {:<23}: {}\n", "Matched trades", alignment.matched_trades));
    out.push_str(&format!("  {:<23}: {}\n", "Trades outside overlap", alignment.trades_outside_range));
    out.push_str(&format!("  {:<23}: {}\n", "Trades without reading", alignment.unmatched_trades));
    out.push_str(&format!("  {:<23}: {}\n", "Index rows outside", alignment.sentiment_outside_range));
    out.push_str(&format!("  {:<23}: {}\n", "Duplicate index dates", alignment.duplicate_sentiment_dates));
    out.push('\n');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn status_lists_counts_and_overlap() {
        let dir = TempDir::new().unwrap();
        let sentiment = dir.path().join("fg.csv");
        let trades = dir.path().join("trades.csv");
        fs::write(&sentiment, "date,classification\n2024-01-01,Fear\n2024-01-02,Greed\n").unwrap();
        fs::write(
            &trades,
            "Account,Timestamp IST,Closed PnL,Size USD\n\
             a,02-01-2024 10:00,5,100\n\
             a,03-01-2024 10:00,1,100\n\
             b,bad,1,100\n",
        )
        .unwrap();

        let sentiments = load_sentiment_index(&sentiment).unwrap();
        let loaded = load_trade_history(&trades).unwrap();
        let aligned = align(sentiments.records, loaded.records).unwrap();
        let text = format_status(&sentiments.report, &loaded.report, &aligned.report);

        assert!(text.contains("DATA STATUS REPORT"));
        assert!(text.contains("2024-01-02 .. 2024-01-02 (1 days)"));
        assert_eq!(aligned.report.trades_outside_range, 1);
        assert_eq!(loaded.report.invalid_date, 1);
        assert!(text.contains("66.7%"));
    }

    #[test]
    fn paths_fall_back_to_config_inputs() {
        let args = DataStatusArgs {
            sentiment: None,
            trades: None,
            config: PathBuf::from(DEFAULT_CONFIG_PATH),
        };
        let configured = InputConfig {
            sentiment_path: PathBuf::from("cfg/fg.csv"),
            trades_path: PathBuf::from("cfg/trades.csv"),
        };
        assert_eq!(args.inputs(configured.clone()), configured);

        let overridden = DataStatusArgs {
            trades: Some(PathBuf::from("cli/trades.csv")),
            ..args
        }
        .inputs(configured);
        assert_eq!(overridden.sentiment_path, PathBuf::from("cfg/fg.csv"));
        assert_eq!(overridden.trades_path, PathBuf::from("cli/trades.csv"));
    }

    #[test]
    fn config_file_supplies_input_paths() {
        let dir = TempDir::new().unwrap();
        let config = dir.path().join("Config.toml");
        fs::write(
            &config,
            "[inputs]\nsentiment_path = \"from-config/fg.csv\"\ntrades_path = \"from-config/trades.csv\"\n",
        )
        .unwrap();

        let args = DataStatusArgs {
            sentiment: None,
            trades: None,
            config: config.clone(),
        };
        let inputs = args.inputs(ConfigLoader::load_from(&config).unwrap().inputs);
        assert_eq!(inputs.sentiment_path, PathBuf::from("from-config/fg.csv"));
        assert_eq!(inputs.trades_path, PathBuf::from("from-config/trades.csv"));
    }
}
