use csv::Writer;
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use trader_sentiment_core::{
    AnalysisError, AnalysisReport, AnalysisResult, ClusterAssignment, DailyObservation,
    RegimeDistribution, TrendPoint,
};

pub const DAILY_OBSERVATIONS_FILE: &str = "daily_observations.csv";
pub const DISTRIBUTIONS_FILE: &str = "regime_distributions.csv";
pub const TREND_FILE: &str = "median_pnl_trend.csv";
pub const ARCHETYPES_FILE: &str = "trader_archetypes.csv";

/// Writes report tables and chart series as CSV files into one directory.
pub struct CsvExporter {
    dir: PathBuf,
}

impl CsvExporter {
    /// Creates the exporter, creating `dir` if needed.
    ///
    /// # Errors
    /// Returns an error if the directory cannot be created.
    pub fn new(dir: impl Into<PathBuf>) -> AnalysisResult<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    /// Writes every chart series of the report plus the daily observations.
    /// Returns the paths written.
    ///
    /// # Errors
    /// Returns an error if any file cannot be created or written.
    pub fn export_all(
        &self,
        report: &AnalysisReport,
        daily: &[DailyObservation],
    ) -> AnalysisResult<Vec<PathBuf>> {
        let mut written = vec![
            self.write_daily_observations(daily)?,
            self.write_distributions(&report.charts.distributions)?,
            self.write_trend(&report.charts.trend)?,
        ];
        if let Some(clustering) = &report.clustering {
            written.push(self.write_archetypes(&clustering.assignments)?);
        }
        tracing::info!(dir = %self.dir.display(), files = written.len(), "Exported chart data");
        Ok(written)
    }

    /// Format: account,date,sentiment,closed_pnl,size_usd,trade_count,win
    ///
    /// # Errors
    /// Returns an error if the file cannot be created or written.
    pub fn write_daily_observations(&self, daily: &[DailyObservation]) -> AnalysisResult<PathBuf> {
        let (path, mut writer) = self.create(DAILY_OBSERVATIONS_FILE)?;
        for observation in daily {
            writer
                .serialize(observation)
                .map_err(|e| write_error(&path, &e))?;
        }
        writer.flush()?;
        Ok(path)
    }

    /// One box-plot summary per (metric, sentiment).
    ///
    /// # Errors
    /// Returns an error if the file cannot be created or written.
    pub fn write_distributions(
        &self,
        distributions: &[RegimeDistribution],
    ) -> AnalysisResult<PathBuf> {
        let (path, mut writer) = self.create(DISTRIBUTIONS_FILE)?;
        writer
            .write_record([
                "metric",
                "sentiment",
                "count",
                "min",
                "lower_whisker",
                "q1",
                "median",
                "q3",
                "upper_whisker",
                "max",
                "outliers",
            ])
            .map_err(|e| write_error(&path, &e))?;

        for dist in distributions {
            let s = &dist.summary;
            writer
                .write_record(&[
                    dist.metric.clone(),
                    dist.sentiment.to_string(),
                    s.count.to_string(),
                    s.min.to_string(),
                    s.lower_whisker.to_string(),
                    s.q1.to_string(),
                    s.median.to_string(),
                    s.q3.to_string(),
                    s.upper_whisker.to_string(),
                    s.max.to_string(),
                    s.outliers.to_string(),
                ])
                .map_err(|e| write_error(&path, &e))?;
        }
        writer.flush()?;
        Ok(path)
    }

    /// Format: date,sentiment,median_pnl,accounts (sorted by date)
    ///
    /// # Errors
    /// Returns an error if the file cannot be created or written.
    pub fn write_trend(&self, trend: &[TrendPoint]) -> AnalysisResult<PathBuf> {
        let (path, mut writer) = self.create(TREND_FILE)?;
        for point in trend {
            writer.serialize(point).map_err(|e| write_error(&path, &e))?;
        }
        writer.flush()?;
        Ok(path)
    }

    /// Raw and standardized features with the assigned archetype.
    ///
    /// # Errors
    /// Returns an error if the file cannot be created or written.
    pub fn write_archetypes(&self, assignments: &[ClusterAssignment]) -> AnalysisResult<PathBuf> {
        let (path, mut writer) = self.create(ARCHETYPES_FILE)?;
        writer
            .write_record([
                "account",
                "median_pnl",
                "mean_trade_count",
                "median_size",
                "z_median_pnl",
                "z_mean_trade_count",
                "z_median_size",
                "cluster",
            ])
            .map_err(|e| write_error(&path, &e))?;

        for a in assignments {
            let mut row = vec![
                a.account.clone(),
                a.median_pnl.to_string(),
                a.mean_trade_count.to_string(),
                a.median_size.to_string(),
            ];
            row.extend(a.standardized.iter().map(ToString::to_string));
            row.push(a.cluster.to_string());
            writer
                .write_record(&row)
                .map_err(|e| write_error(&path, &e))?;
        }
        writer.flush()?;
        Ok(path)
    }

    fn create(&self, name: &str) -> AnalysisResult<(PathBuf, Writer<File>)> {
        let path = self.dir.join(name);
        let file = File::create(&path)?;
        Ok((path, Writer::from_writer(file)))
    }
}

fn write_error(path: &Path, err: &csv::Error) -> AnalysisError {
    AnalysisError::Parse {
        file: path.display().to_string(),
        message: err.to_string(),
    }
}
