use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf, time::Duration};
use tracing::debug;

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ProviderConfig {
    pub base_url: String,
}

impl ProviderConfig {
    fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct ProvidersConfig {
    pub blockchain_info: ProviderConfig,
    pub blockcypher: ProviderConfig,
    pub blockchair: ProviderConfig,
    pub coingecko: ProviderConfig,
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        ProvidersConfig {
            blockchain_info: ProviderConfig::new("https://blockchain.info"),
            blockcypher: ProviderConfig::new("https://api.blockcypher.com"),
            blockchair: ProviderConfig::new("https://api.blockchair.com"),
            coingecko: ProviderConfig::new("https://api.coingecko.com"),
        }
    }
}

/// Upstream deadlines. The `_ms` fields take precedence over `_secs` when set.
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct TimeoutsConfig {
    pub balance_secs: u64,
    pub price_secs: u64,
    pub balance_ms: Option<u64>,
    pub price_ms: Option<u64>,
}

impl Default for TimeoutsConfig {
    fn default() -> Self {
        TimeoutsConfig {
            balance_secs: 10,
            price_secs: 5,
            balance_ms: None,
            price_ms: None,
        }
    }
}

impl TimeoutsConfig {
    pub fn balance(&self) -> Duration {
        self.balance_ms
            .map_or(Duration::from_secs(self.balance_secs), Duration::from_millis)
    }

    pub fn price(&self) -> Duration {
        self.price_ms
            .map_or(Duration::from_secs(self.price_secs), Duration::from_millis)
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct CacheConfig {
    pub balance_capacity: usize,
    pub balance_ttl_secs: u64,
    pub price_ttl_secs: u64,
    pub price_capacity: Option<usize>,
}

impl Default for CacheConfig {
    fn default() -> Self {
        CacheConfig {
            balance_capacity: 128,
            balance_ttl_secs: 5 * 60,
            price_ttl_secs: 60,
            price_capacity: None,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct AppConfig {
    pub providers: ProvidersConfig,
    pub timeouts: TimeoutsConfig,
    pub cache: CacheConfig,
    pub user_agent: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            providers: ProvidersConfig::default(),
            timeouts: TimeoutsConfig::default(),
            cache: CacheConfig::default(),
            user_agent: format!("coinpeek/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl AppConfig {
    /// Loads the config from the default location, falling back to defaults
    /// when no file has been created yet.
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
        let proj_dirs = ProjectDirs::from("io", "coinpeek", "coinpeek")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.config_dir().join("config.yaml"))
    }

    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let config_str = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Self = serde_yaml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;
        debug!("Successfully loaded config");
        Ok(config)
    }

    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).context("Failed to serialize config")
    }
}
