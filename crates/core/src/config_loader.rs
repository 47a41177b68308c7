use crate::config::AppConfig;
use anyhow::Result;
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use std::path::Path;

/// Config file read when no other path is given.
pub const DEFAULT_CONFIG_PATH: &str = "config/Config.toml";

/// Prefix for environment overrides, e.g. `TRADER_SENTIMENT_CLUSTERING__SEED=7`.
pub const ENV_PREFIX: &str = "TRADER_SENTIMENT_";

pub struct ConfigLoader;

impl ConfigLoader {
    /// Layers built-in defaults, the TOML file at `path` and `TRADER_SENTIMENT_*`
    /// environment variables. A missing file is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be parsed or the merged values fail validation.
    pub fn load_from(path: impl AsRef<Path>) -> Result<AppConfig> {
        let path = path.as_ref();
        let config: AppConfig = Self::figment(path).extract()?;
        config.clustering.validate()?;
        tracing::debug!(path = %path.display(), seed = config.clustering.seed, "Loaded configuration");
        Ok(config)
    }

    fn figment(path: &Path) -> Figment {
        Figment::from(Serialized::defaults(AppConfig::default()))
            .merge(Toml::file(path))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
    }
}
