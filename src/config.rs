use std::path::Path;

use config::{Config, Environment, File};
use serde::Deserialize;
use validator::Validate;

use crate::error::Result;
use crate::utils::constants::{
    DEFAULT_CITIES, DEFAULT_FEED_URL, DEFAULT_FETCH_TIMEOUT_SECS, DEFAULT_STORE_TIMEOUT_SECS,
};

/// Runtime configuration for one pipeline run.
///
/// Values are layered lowest to highest: built-in defaults, an
/// optional TOML file (`aqi-warehouse.toml` in the working directory
/// unless a path is given), then `AQI_`-prefixed environment
/// variables. `AQI_CITIES` accepts a comma-separated list.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct PipelineConfig {
    /// Base URL of the air-quality feed.
    #[validate(url)]
    pub feed_url: String,

    /// API token sent with every feed request. The provider's public
    /// demo token is the default; real runs should supply their own.
    #[validate(length(min = 1))]
    pub api_token: String,

    /// PostgreSQL DSN of the warehouse. Not needed for preview runs.
    pub store_dsn: Option<String>,

    /// Cities to fetch, in request order.
    #[validate(length(min = 1))]
    pub cities: Vec<String>,

    #[validate(range(min = 1, max = 600))]
    pub fetch_timeout_secs: u64,

    #[validate(range(min = 1, max = 600))]
    pub store_timeout_secs: u64,
}

impl PipelineConfig {
    /// Load and validate the layered configuration.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = Config::builder()
            .set_default("feed_url", DEFAULT_FEED_URL)?
            .set_default("api_token", "demo")?
            .set_default("cities", DEFAULT_CITIES.to_vec())?
            .set_default("fetch_timeout_secs", DEFAULT_FETCH_TIMEOUT_SECS)?
            .set_default("store_timeout_secs", DEFAULT_STORE_TIMEOUT_SECS)?;

        builder = match path {
            Some(path) => builder.add_source(File::from(path)),
            None => builder.add_source(File::with_name("aqi-warehouse").required(false)),
        };

        let settings = builder
            .add_source(
                Environment::with_prefix("AQI")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("cities"),
            )
            .build()?;

        let config: Self = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::sync::{Mutex, MutexGuard};
    use tempfile::NamedTempFile;

    /// `load` reads every `AQI_`-prefixed variable from the
    /// process-global environment, so tests that load configuration
    /// must not run while another one has an override set.
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    fn env_guard() -> MutexGuard<'static, ()> {
        ENV_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn config_file(contents: &str) -> NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_defaults_fill_unset_values() {
        let _guard = env_guard();
        let file = config_file("");

        let config = PipelineConfig::load(Some(file.path())).unwrap();

        assert_eq!(config.feed_url, DEFAULT_FEED_URL);
        assert_eq!(config.api_token, "demo");
        assert!(config.store_dsn.is_none());
        assert_eq!(config.cities.len(), DEFAULT_CITIES.len());
        assert_eq!(config.fetch_timeout_secs, DEFAULT_FETCH_TIMEOUT_SECS);
    }

    #[test]
    fn test_file_overrides_defaults() {
        let _guard = env_guard();
        let file = config_file(
            r#"
            api_token = "secret"
            store_dsn = "postgresql://u:p@localhost:5432/aqi"
            cities = ["Denver", "Boston"]
            fetch_timeout_secs = 5
            "#,
        );

        let config = PipelineConfig::load(Some(file.path())).unwrap();

        assert_eq!(config.api_token, "secret");
        assert_eq!(config.store_dsn.as_deref(), Some("postgresql://u:p@localhost:5432/aqi"));
        assert_eq!(config.cities, vec!["Denver", "Boston"]);
        assert_eq!(config.fetch_timeout_secs, 5);
    }

    #[test]
    fn test_empty_city_list_rejected() {
        let _guard = env_guard();
        let file = config_file("cities = []");

        let err = PipelineConfig::load(Some(file.path())).unwrap_err();
        assert!(matches!(err, crate::error::PipelineError::Validation(_)));
    }

    #[test]
    fn test_invalid_feed_url_rejected() {
        let _guard = env_guard();
        let file = config_file(r#"feed_url = "not a url""#);

        assert!(PipelineConfig::load(Some(file.path())).is_err());
    }

    #[test]
    fn test_environment_overrides_file() {
        let _guard = env_guard();
        let file = config_file("store_timeout_secs = 10");
        std::env::set_var("AQI_STORE_TIMEOUT_SECS", "7");

        let config = PipelineConfig::load(Some(file.path())).unwrap();
        std::env::remove_var("AQI_STORE_TIMEOUT_SECS");

        assert_eq!(config.store_timeout_secs, 7);
    }
}
