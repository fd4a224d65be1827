use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::{
    advice::remote::{DEFAULT_ENDPOINT, DEFAULT_MODEL},
    error::JobError,
    provider::open_meteo::DEFAULT_BASE_URL,
};

const DEFAULT_LATITUDE: f64 = 31.565;
const DEFAULT_LONGITUDE: f64 = -93.484;
const DEFAULT_LOCATION: &str = "Many, LA";
const DEFAULT_TIMEOUT_SECS: u64 = 20;

/// Settings for the optional model-generated advice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AiConfig {
    pub enabled: bool,
    /// Bearer token for the chat-completion endpoint.
    pub token: Option<String>,
    pub model: String,
    pub endpoint: String,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            token: None,
            model: DEFAULT_MODEL.to_string(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
        }
    }
}

/// Top-level configuration, stored as TOML.
///
/// Example:
/// ```toml
/// latitude = 31.565
/// longitude = -93.484
/// location_name = "Many, LA"
/// webhook_url = "https://discord.com/api/webhooks/..."
///
/// [ai]
/// enabled = true
/// token = "..."
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub latitude: f64,
    pub longitude: f64,
    pub location_name: String,
    pub webhook_url: Option<String>,
    pub forecast_base_url: String,
    pub http_timeout_secs: u64,
    pub ai: AiConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            latitude: DEFAULT_LATITUDE,
            longitude: DEFAULT_LONGITUDE,
            location_name: DEFAULT_LOCATION.to_string(),
            webhook_url: None,
            forecast_base_url: DEFAULT_BASE_URL.to_string(),
            http_timeout_secs: DEFAULT_TIMEOUT_SECS,
            ai: AiConfig::default(),
        }
    }
}

/// Values supplied by the environment or command line; `None` keeps the file value.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub location_name: Option<String>,
    pub webhook_url: Option<String>,
    pub ai_enabled: Option<bool>,
    pub ai_token: Option<String>,
    pub ai_model: Option<String>,
    pub ai_endpoint: Option<String>,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

impl Config {
    /// Load config from the platform config dir, or defaults if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_file_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::config_file_path()?;
        self.save_to(&path)?;
        Ok(path)
    }

    /// Save config to `path`, creating parent directories as needed.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "runlayers", "runlayers")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Layer overrides on top of this config. Blank strings are ignored.
    pub fn apply(mut self, overrides: Overrides) -> Self {
        if let Some(lat) = overrides.latitude {
            self.latitude = lat;
        }
        if let Some(lon) = overrides.longitude {
            self.longitude = lon;
        }
        if let Some(name) = non_empty(overrides.location_name) {
            self.location_name = name;
        }
        if let Some(url) = non_empty(overrides.webhook_url) {
            self.webhook_url = Some(url);
        }
        if let Some(enabled) = overrides.ai_enabled {
            self.ai.enabled = enabled;
        }
        if let Some(token) = non_empty(overrides.ai_token) {
            self.ai.token = Some(token);
        }
        if let Some(model) = non_empty(overrides.ai_model) {
            self.ai.model = model;
        }
        if let Some(endpoint) = non_empty(overrides.ai_endpoint) {
            self.ai.endpoint = endpoint;
        }
        self
    }

    /// The webhook URL, which every non-dry run requires.
    pub fn webhook_url(&self) -> Result<&str, JobError> {
        self.webhook_url
            .as_deref()
            .filter(|url| !url.trim().is_empty())
            .ok_or_else(|| {
                JobError::Config(
                    "Missing DISCORD_WEBHOOK_URL environment variable.\n\
                     Hint: export it or run `runlayers configure`."
                        .to_string(),
                )
            })
    }

    pub fn validate(&self, require_webhook: bool) -> Result<(), JobError> {
        if !(-90.0..=90.0).contains(&self.latitude) {
            return Err(JobError::Config(format!(
                "latitude {} is outside -90..=90",
                self.latitude
            )));
        }
        if !(-180.0..=180.0).contains(&self.longitude) {
            return Err(JobError::Config(format!(
                "longitude {} is outside -180..=180",
                self.longitude
            )));
        }
        if self.location_name.trim().is_empty() {
            return Err(JobError::Config("location name must not be empty".into()));
        }
        if self.http_timeout_secs == 0 {
            return Err(JobError::Config("http_timeout_secs must be positive".into()));
        }
        if require_webhook {
            let url = self.webhook_url()?;
            reqwest::Url::parse(url)
                .map_err(|e| JobError::Config(format!("webhook URL is not a valid URL: {e}")))?;
        }
        Ok(())
    }

    /// Copy safe to print: secrets are masked.
    pub fn redacted(&self) -> Self {
        let mask = |v: &Option<String>| v.as_ref().map(|_| "********".to_string());
        let mut copy = self.clone();
        copy.webhook_url = mask(&self.webhook_url);
        copy.ai.token = mask(&self.ai.token);
        copy
    }
}
