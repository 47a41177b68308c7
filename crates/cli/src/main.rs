use clap::{Parser, Subcommand};

mod commands;

use commands::{DataStatusArgs, ReportArgs};

#[derive(Parser)]
#[command(name = "trader-sentiment")]
#[command(about = "Fear/Greed index vs Hyperliquid trader behavior analysis", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the full analysis and print the report
    Report(ReportArgs),
    /// Load and align the inputs, then show row counts and date ranges
    DataStatus(DataStatusArgs),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so stdout carries only the report
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Report(args) => commands::run_report(args),
        Commands::DataStatus(args) => commands::run_data_status(args),
    }
}
