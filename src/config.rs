use std::{path::PathBuf, time::Duration};

use anyhow::Context;
use serde::{Deserialize, de::DeserializeOwned};

pub const LEAGUE_URL: &str = "https://fbref.com/en/comps/9/Premier-League-Stats";
pub const SITE_ORIGIN: &str = "https://fbref.com";
/// Class carried by the tables we want, on both the league and squad pages.
pub const STATS_TABLE_MARKER: &str = "stats_table";
pub const SQUAD_PATH_MARKER: &str = "/squads/";
/// Trailing token on squad page slugs, e.g. `Manchester-City-Stats`.
pub const SQUAD_NAME_SUFFIX: &str = "-Stats";
pub const DEFAULT_REQUEST_DELAY: Duration = Duration::from_secs(5);
pub const OUTPUT_PATH: &str = "stats.csv";

/// The env vars that can tune a scraping run.
#[derive(Debug, Default, Deserialize)]
pub struct ScrapingEnv {
    request_delay_secs: Option<u64>,
}

#[derive(Debug, Clone)]
pub struct ScrapingConfig {
    pub league_url: String,
    pub site_origin: String,
    pub table_marker: String,
    pub squad_path_marker: String,
    pub squad_name_suffix: String,
    pub request_delay: Duration,
    pub output_path: PathBuf,
}

impl Default for ScrapingConfig {
    fn default() -> Self {
        Self {
            league_url: LEAGUE_URL.to_string(),
            site_origin: SITE_ORIGIN.to_string(),
            table_marker: STATS_TABLE_MARKER.to_string(),
            squad_path_marker: SQUAD_PATH_MARKER.to_string(),
            squad_name_suffix: SQUAD_NAME_SUFFIX.to_string(),
            request_delay: DEFAULT_REQUEST_DELAY,
            output_path: PathBuf::from(OUTPUT_PATH),
        }
    }
}

impl ScrapingConfig {
    pub fn new() -> anyhow::Result<Self> {
        let scraping_env = ScrapingEnv::load_from_env()?;
        Ok(Self::default().with_env(scraping_env))
    }

    pub fn with_env(mut self, env: ScrapingEnv) -> Self {
        if let Some(secs) = env.request_delay_secs {
            self.request_delay = Duration::from_secs(secs);
        }
        self
    }

    pub fn with_request_delay(mut self, request_delay: Duration) -> Self {
        self.request_delay = request_delay;
        self
    }
}

const ENV_PREFIX: &str = "SQUAD_STATS_";

// Extension trait.
pub trait LoadFromEnv: DeserializeOwned {
    fn load_from_env() -> anyhow::Result<Self> {
        // Don't throw an error if .env file doesn't exist.
        let _ = dotenv::dotenv();
        let config = envy::prefixed(ENV_PREFIX)
            .from_env::<Self>()
            .context("failed to load env variables into config struct")?;
        Ok(config)
    }
}

impl<T: DeserializeOwned> LoadFromEnv for T {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_premier_league_run() {
        let config = ScrapingConfig::default();
        assert_eq!(config.league_url, LEAGUE_URL);
        assert_eq!(config.request_delay, Duration::from_secs(5));
        assert_eq!(config.output_path, PathBuf::from("stats.csv"));
    }

    #[test]
    fn env_delay_overrides_default() {
        let env: ScrapingEnv = envy::prefixed(ENV_PREFIX)
            .from_iter(vec![(
                "SQUAD_STATS_REQUEST_DELAY_SECS".to_string(),
                "0".to_string(),
            )])
            .unwrap();
        let config = ScrapingConfig::default().with_env(env);
        assert_eq!(config.request_delay, Duration::ZERO);
    }

    #[test]
    fn missing_env_keeps_default_delay() {
        let config = ScrapingConfig::default().with_env(ScrapingEnv::default());
        assert_eq!(config.request_delay, DEFAULT_REQUEST_DELAY);
    }
}
