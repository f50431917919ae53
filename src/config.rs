use std::fs;
use std::path::PathBuf;

use camino::Utf8PathBuf;
use serde::{Deserialize, Serialize};

use crate::arxiv::{DEFAULT_BASE_URL, default_user_agent};
use crate::error::IngestError;

pub const DEFAULT_CONFIG_FILE: &str = "arxiv-ingest.json";
pub const DEFAULT_DB_PATH: &str = "db.json";
pub const DEFAULT_PAPER_CAP: usize = 30_000;
pub const DEFAULT_CYCLE_WAIT_SECS: f64 = 60.0;

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub db_path: Option<String>,
    #[serde(default)]
    pub production_mode: Option<bool>,
    #[serde(default)]
    pub paper_cap: Option<usize>,
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default)]
    pub cycle_wait_secs: Option<f64>,
    #[serde(default)]
    pub user_agent: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedConfig {
    pub db_path: Utf8PathBuf,
    pub production_mode: bool,
    pub paper_cap: usize,
    pub base_url: String,
    pub cycle_wait_secs: f64,
    pub user_agent: String,
}

pub struct ConfigLoader;

impl ConfigLoader {
    /// Reads `path`, or `arxiv-ingest.json` when no path is given. Only the
    /// implicit default file may be absent.
    pub fn resolve(path: Option<&str>) -> Result<ResolvedConfig, IngestError> {
        let config_path = match path {
            Some(path) => PathBuf::from(path),
            None => PathBuf::from(DEFAULT_CONFIG_FILE),
        };

        if path.is_none() && !config_path.exists() {
            return Self::resolve_config(Config::default());
        }

        let content = fs::read_to_string(&config_path)
            .map_err(|_| IngestError::ConfigRead(config_path.clone()))?;
        let config: Config = serde_json::from_str(&content)
            .map_err(|err| IngestError::ConfigParse(err.to_string()))?;

        Self::resolve_config(config)
    }

    pub fn resolve_config(config: Config) -> Result<ResolvedConfig, IngestError> {
        let cycle_wait_secs = config.cycle_wait_secs.unwrap_or(DEFAULT_CYCLE_WAIT_SECS);
        if !cycle_wait_secs.is_finite() || cycle_wait_secs < 0.0 {
            return Err(IngestError::ConfigParse(format!(
                "cycle_wait_secs must be a non-negative number, got {cycle_wait_secs}"
            )));
        }

        Ok(ResolvedConfig {
            db_path: Utf8PathBuf::from(config.db_path.unwrap_or_else(|| DEFAULT_DB_PATH.to_string())),
            production_mode: config.production_mode.unwrap_or(true),
            paper_cap: config.paper_cap.unwrap_or(DEFAULT_PAPER_CAP),
            base_url: config
                .base_url
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            cycle_wait_secs,
            user_agent: config.user_agent.unwrap_or_else(default_user_agent),
        })
    }
}
