use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};

use crate::{criteria::DEFAULT_LIMIT, export::ExportConfig, insight::InsightProviderId};

/// Where records are persisted.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct StoreConfig {
    /// JSON records file; defaults to `records.json` in the platform data directory.
    pub path: Option<PathBuf>,
}

/// Which insight generator to use and how to reach it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InsightConfig {
    /// "rules" or "http".
    pub provider: String,
    pub endpoint: Option<String>,
    pub api_key: Option<String>,
    pub timeout_secs: u64,
}

impl Default for InsightConfig {
    fn default() -> Self {
        Self {
            provider: InsightProviderId::Rules.to_string(),
            endpoint: None,
            api_key: None,
            timeout_secs: 30,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryConfig {
    pub default_limit: usize,
    pub default_stats_days: u32,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            default_limit: DEFAULT_LIMIT,
            default_stats_days: 7,
        }
    }
}

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// [insight]
/// provider = "http"
/// endpoint = "https://insights.example.com/v1/weather"
///
/// [export]
/// column_width = 24
/// filename_prefix = "observations_"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub store: StoreConfig,
    pub insight: InsightConfig,
    pub export: ExportConfig,
    pub query: QueryConfig,
}

impl Config {
    /// Return the configured insight provider as a strongly-typed id.
    pub fn insight_provider_id(&self) -> Result<InsightProviderId> {
        InsightProviderId::try_from(self.insight.provider.as_str())
    }

    pub fn set_insight_provider(&mut self, id: InsightProviderId) {
        self.insight.provider = id.as_str().to_string();
    }

    /// Point the HTTP generator at `endpoint` and make it the active provider.
    pub fn set_http_insight(&mut self, endpoint: String, api_key: Option<String>) {
        self.insight.endpoint = Some(endpoint);
        self.insight.api_key = api_key.filter(|k| !k.trim().is_empty());
        self.set_insight_provider(InsightProviderId::Http);
    }

    /// Load config from disk, or return defaults if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_toml(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        let cfg: Config = toml::from_str(contents)?;
        cfg.insight_provider_id()?;
        cfg.export.offset()?;
        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_file_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(&path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    fn project_dirs() -> Result<ProjectDirs> {
        ProjectDirs::from("dev", "weather-history", "weather-history")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))
    }

    pub fn config_file_path() -> Result<PathBuf> {
        Ok(Self::project_dirs()?.config_dir().join("config.toml"))
    }

    /// Records file: the configured path, or `records.json` in the platform data directory.
    pub fn store_path(&self) -> Result<PathBuf> {
        match &self.store.path {
            Some(path) => Ok(path.clone()),
            None => Ok(Self::project_dirs()?.data_dir().join("records.json")),
        }
    }
}
