//! Persisted application configuration.

use anyhow::Context;
use retouch_ai::gemini::{DEFAULT_API_BASE, DEFAULT_MODEL, DEFAULT_TIMEOUT_SECS};
use retouch_ai::GeminiConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::editor::SwipeGesture;

/// Application configuration persisted to disk
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Image model used for every edit.
    #[serde(default = "default_model")]
    pub model: String,

    #[serde(default = "default_api_base")]
    pub api_base: String,

    #[serde(default = "default_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Where downloads land. Defaults to the current directory.
    #[serde(default)]
    pub output_dir: Option<PathBuf>,

    #[serde(default = "default_swipe_min_horizontal")]
    pub swipe_min_horizontal: f32,

    #[serde(default = "default_swipe_max_vertical")]
    pub swipe_max_vertical: f32,
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

fn default_api_base() -> String {
    DEFAULT_API_BASE.to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

fn default_swipe_min_horizontal() -> f32 {
    SwipeGesture::default().min_horizontal
}

fn default_swipe_max_vertical() -> f32 {
    SwipeGesture::default().max_vertical
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            api_base: default_api_base(),
            request_timeout_secs: default_timeout_secs(),
            output_dir: None,
            swipe_min_horizontal: default_swipe_min_horizontal(),
            swipe_max_vertical: default_swipe_max_vertical(),
        }
    }
}

impl AppConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }

    pub fn swipe_gesture(&self) -> SwipeGesture {
        SwipeGesture {
            min_horizontal: self.swipe_min_horizontal,
            max_vertical: self.swipe_max_vertical,
        }
    }

    pub fn output_dir(&self) -> PathBuf {
        self.output_dir.clone().unwrap_or_else(|| PathBuf::from("."))
    }

    /// Service settings from this file plus the key from the environment.
    pub fn gemini_config(&self, api_key: impl Into<String>) -> GeminiConfig {
        let mut config = GeminiConfig::new(api_key);
        config.model = self.model.clone();
        config.api_base = self.api_base.clone();
        config.timeout = self.timeout();
        config
    }
}

/// Result of loading the config file.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedConfig {
    pub config: AppConfig,
    /// Set when the file existed but could not be used and defaults were taken.
    pub reset_reason: Option<String>,
}

/// `<config dir>/retouch/config.json`
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("retouch")
        .join("config.json")
}

/// Load the config, falling back to defaults. Never fails.
pub fn load_config(path: impl AsRef<Path>) -> LoadedConfig {
    let path = path.as_ref();
    if !path.exists() {
        debug!("No config at {}, using defaults", path.display());
        return LoadedConfig {
            config: AppConfig::default(),
            reset_reason: None,
        };
    }

    let parsed = fs::read_to_string(path)
        .with_context(|| format!("read config file: {}", path.display()))
        .and_then(|data| serde_json::from_str::<AppConfig>(&data).context("parse config json"));

    match parsed {
        Ok(config) => {
            info!("Loaded config from {}", path.display());
            LoadedConfig {
                config,
                reset_reason: None,
            }
        }
        Err(err) => {
            let reason = format!("{:#}", err);
            warn!("Config reset to defaults: {}", reason);
            LoadedConfig {
                config: AppConfig::default(),
                reset_reason: Some(reason),
            }
        }
    }
}

pub fn save_config(path: impl AsRef<Path>, config: &AppConfig) -> anyhow::Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("create parent dir: {}", parent.display()))?;
    }
    let json = serde_json::to_string_pretty(config).context("serialize config to json")?;
    fs::write(path, json).with_context(|| format!("write config file: {}", path.display()))?;
    Ok(())
}
