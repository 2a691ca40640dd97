use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use std::{fs, path::PathBuf};
use tracing::debug;

pub const DEFAULT_EXCHANGERATE_URL: &str = "https://api.exchangerate-api.com";
pub const DEFAULT_COINGECKO_URL: &str = "https://api.coingecko.com";

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ExchangeRateProviderConfig {
    pub base_url: String,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct CoinGeckoProviderConfig {
    pub base_url: String,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ProvidersConfig {
    pub exchangerate: Option<ExchangeRateProviderConfig>,
    pub coingecko: Option<CoinGeckoProviderConfig>,
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        ProvidersConfig {
            exchangerate: Some(ExchangeRateProviderConfig {
                base_url: DEFAULT_EXCHANGERATE_URL.to_string(),
            }),
            coingecko: Some(CoinGeckoProviderConfig {
                base_url: DEFAULT_COINGECKO_URL.to_string(),
            }),
        }
    }
}

impl ProvidersConfig {
    pub fn exchangerate_url(&self) -> &str {
        self.exchangerate
            .as_ref()
            .map_or(DEFAULT_EXCHANGERATE_URL, |p| &p.base_url)
    }

    pub fn coingecko_url(&self) -> &str {
        self.coingecko
            .as_ref()
            .map_or(DEFAULT_COINGECKO_URL, |p| &p.base_url)
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct HttpConfig {
    /// Upper bound for a single rate request, in seconds.
    #[serde(default = "HttpConfig::default_timeout_secs")]
    pub timeout_secs: u64,
}

impl HttpConfig {
    fn default_timeout_secs() -> u64 {
        10
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        HttpConfig {
            timeout_secs: Self::default_timeout_secs(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub providers: ProvidersConfig,
    #[serde(default)]
    pub http: HttpConfig,
}

impl AppConfig {
    /// Loads the config from the default location, falling back to built-in
    /// defaults when no file has been set up.
    pub fn load() -> Result<Self> {
        debug!("Loading default config");
        let config_path = Self::default_config_path()?;
        if !config_path.exists() {
            debug!(path = %config_path.display(), "No config file, using defaults");
            return Ok(Self::default());
        }
        Self::load_from_path(&config_path)
    }

    pub fn default_config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("in", "rateconv", "rateconv")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.config_dir().join("config.yaml"))
    }

    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let config_str = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        // An empty document deserializes to null rather than an empty map
        if config_str.trim().is_empty() {
            return Ok(Self::default());
        }

        let config: Self = serde_yaml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;
        debug!("Successfully loaded config");
        Ok(config)
    }
}
