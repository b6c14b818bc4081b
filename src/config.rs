// File: ./src/config.rs
// Handles configuration loading, saving, and defaults.
use crate::context::AppContext;
use crate::store::{DEFAULT_QUOTA_BYTES, FileStore};
use anyhow::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;

fn default_status_timeout() -> u64 {
    3000
}
fn default_preview_chars() -> usize {
    20
}
fn default_quota() -> u64 {
    DEFAULT_QUOTA_BYTES
}
fn default_log_level() -> String {
    "info".to_string()
}
fn default_true() -> bool {
    true
}

#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
pub struct Config {
    /// How long confirmation messages stay on the status line.
    #[serde(default = "default_status_timeout")]
    pub status_timeout_ms: u64,
    /// Characters of a task quoted in confirmation messages.
    #[serde(default = "default_preview_chars")]
    pub preview_chars: usize,
    #[serde(default = "default_quota")]
    pub storage_quota_bytes: u64,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default = "default_true")]
    pub mouse: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            status_timeout_ms: 3000,
            preview_chars: 20,
            storage_quota_bytes: DEFAULT_QUOTA_BYTES,
            log_level: "info".to_string(),
            mouse: true,
        }
    }
}

impl Config {
    /// Load the configuration from disk using an explicit context.
    /// Returns a contextualized error if reading or parsing fails.
    pub fn load(ctx: &dyn AppContext) -> Result<Self> {
        let path = ctx.get_config_file_path()?;

        if !path.exists() {
            return Err(anyhow::anyhow!("Config file not found"));
        }

        let contents = fs::read_to_string(&path).map_err(|e| {
            anyhow::anyhow!("Failed to read config file '{}': {}", path.display(), e)
        })?;

        let config: Config = toml::from_str(&contents).map_err(|e| {
            anyhow::anyhow!("Failed to parse config file '{}': {}", path.display(), e)
        })?;

        Ok(config)
    }

    /// Loads the config, writing the defaults on first start.
    pub fn load_or_init(ctx: &dyn AppContext) -> Result<Self> {
        match Self::load(ctx) {
            Ok(cfg) => Ok(cfg),
            Err(e) if Self::is_missing_config_error(&e) => {
                let cfg = Config::default();
                if let Err(e) = cfg.save(ctx) {
                    log::warn!("Could not write default config: {:#}", e);
                }
                Ok(cfg)
            }
            Err(e) => Err(e),
        }
    }

    /// Whether an error from `load` means the file simply does not exist.
    pub fn is_missing_config_error(err: &Error) -> bool {
        if err.to_string().contains("Config file not found") {
            return true;
        }

        for cause in err.chain() {
            if let Some(io_err) = cause.downcast_ref::<std::io::Error>()
                && io_err.kind() == std::io::ErrorKind::NotFound
            {
                return true;
            }
        }

        false
    }

    pub fn save(&self, ctx: &dyn AppContext) -> Result<()> {
        let path = ctx.get_config_file_path()?;
        FileStore::with_lock(&path, || {
            let toml_str = toml::to_string_pretty(self)?;
            FileStore::atomic_write(&path, toml_str)?;
            Ok(())
        })?;
        Ok(())
    }

    pub fn log_level_filter(&self) -> log::LevelFilter {
        self.log_level.parse().unwrap_or(log::LevelFilter::Info)
    }
}
