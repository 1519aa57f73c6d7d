use crate::error::{Result, TodozError};
use crate::persistence::DEFAULT_KEY;
use crate::seed::{DEFAULT_SEED_LIMIT, DEFAULT_SEED_URL};
use crate::store::is_valid_key;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_FILENAME: &str = "config.json";
const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 10;

pub const SEED_URL_ENV: &str = "TODOZ_SEED_URL";
pub const HOME_ENV: &str = "TODOZ_HOME";

/// Where the config and the storage slots live: `$TODOZ_HOME` if set,
/// otherwise the platform data directory.
pub fn data_dir() -> Result<PathBuf> {
    if let Some(home) = std::env::var_os(HOME_ENV) {
        if !home.is_empty() {
            return Ok(PathBuf::from(home));
        }
    }
    ProjectDirs::from("com", "todoz", "todoz")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .ok_or_else(|| TodozError::Config("Could not determine data directory".to_string()))
}

/// Configuration for todoz, stored in `<data dir>/config.json`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TodozConfig {
    /// Endpoint queried for the initial list on a first run
    #[serde(default = "default_seed_url")]
    pub seed_url: String,

    /// Maximum number of seed records kept
    #[serde(default = "default_seed_limit")]
    pub seed_limit: usize,

    /// Whole-request timeout for the seed fetch
    #[serde(default = "default_fetch_timeout")]
    pub fetch_timeout_secs: u64,

    /// Storage slot holding the list
    #[serde(default = "default_storage_key")]
    pub storage_key: String,
}

fn default_seed_url() -> String {
    DEFAULT_SEED_URL.to_string()
}

fn default_seed_limit() -> usize {
    DEFAULT_SEED_LIMIT
}

fn default_fetch_timeout() -> u64 {
    DEFAULT_FETCH_TIMEOUT_SECS
}

fn default_storage_key() -> String {
    DEFAULT_KEY.to_string()
}

impl Default for TodozConfig {
    fn default() -> Self {
        Self {
            seed_url: default_seed_url(),
            seed_limit: default_seed_limit(),
            fetch_timeout_secs: default_fetch_timeout(),
            storage_key: default_storage_key(),
        }
    }
}

/// Keys accepted by [`TodozConfig::set`] and [`TodozConfig::get`].
pub const CONFIG_KEYS: &[&str] = &["seed-url", "seed-limit", "fetch-timeout", "storage-key"];

impl TodozConfig {
    /// Load config from the given directory, or return defaults if not found
    pub fn load<P: AsRef<Path>>(config_dir: P) -> Result<Self> {
        let config_path = config_dir.as_ref().join(CONFIG_FILENAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path).map_err(TodozError::Io)?;
        let config: TodozConfig =
            serde_json::from_str(&content).map_err(TodozError::Serialization)?;
        Ok(config)
    }

    /// Save config to the given directory
    pub fn save<P: AsRef<Path>>(&self, config_dir: P) -> Result<()> {
        let config_dir = config_dir.as_ref();

        if !config_dir.exists() {
            fs::create_dir_all(config_dir).map_err(TodozError::Io)?;
        }

        let config_path = config_dir.join(CONFIG_FILENAME);
        let content = serde_json::to_string_pretty(self).map_err(TodozError::Serialization)?;
        fs::write(config_path, content).map_err(TodozError::Io)?;
        Ok(())
    }

    /// Apply environment overrides on top of whatever was loaded.
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(url) = std::env::var(SEED_URL_ENV) {
            if !url.trim().is_empty() {
                self.seed_url = url;
            }
        }
        self
    }

    pub fn get(&self, key: &str) -> Result<String> {
        match key {
            "seed-url" => Ok(self.seed_url.clone()),
            "seed-limit" => Ok(self.seed_limit.to_string()),
            "fetch-timeout" => Ok(self.fetch_timeout_secs.to_string()),
            "storage-key" => Ok(self.storage_key.clone()),
            other => Err(unknown_key(other)),
        }
    }

    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "seed-url" => {
                if !(value.starts_with("http://") || value.starts_with("https://")) {
                    return Err(TodozError::Config(format!(
                        "seed-url must be an http(s) URL, got {:?}",
                        value
                    )));
                }
                self.seed_url = value.to_string();
            }
            "seed-limit" => self.seed_limit = parse_positive(key, value)? as usize,
            "fetch-timeout" => self.fetch_timeout_secs = parse_positive(key, value)?,
            "storage-key" => {
                if !is_valid_key(value) {
                    return Err(TodozError::Config(format!(
                        "storage-key may only contain letters, digits, '-' and '_', got {:?}",
                        value
                    )));
                }
                self.storage_key = value.to_string();
            }
            other => return Err(unknown_key(other)),
        }
        Ok(())
    }
}

fn parse_positive(key: &str, value: &str) -> Result<u64> {
    match value.parse::<u64>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(TodozError::Config(format!(
            "{} must be a positive integer, got {:?}",
            key, value
        ))),
    }
}

fn unknown_key(key: &str) -> TodozError {
    TodozError::Config(format!(
        "Unknown config key: {} (expected one of: {})",
        key,
        CONFIG_KEYS.join(", ")
    ))
}
