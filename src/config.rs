use crate::constants::{API_KEY_ENV_VAR, DEFAULT_MODEL, GEMINI_API_BASE_URL, PLACEHOLDER_API_KEY};
use crate::errors::{CareError, CareResult};
use serde::{Deserialize, Serialize};
use std::{
    env, fs,
    path::{Path, PathBuf},
};

const LOG_LEVELS: [&str; 6] = ["off", "error", "warn", "info", "debug", "trace"];

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api_key: Option<String>,
    pub model: String,
    pub api_base_url: String,
    pub request_timeout_secs: Option<u64>,
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            api_base_url: GEMINI_API_BASE_URL.to_string(),
            request_timeout_secs: None,
            log_level: "info".to_string(),
        }
    }
}

impl Config {
    /// The API key, unless it is missing, blank, or the sample placeholder.
    pub fn usable_api_key(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty() && *key != PLACEHOLDER_API_KEY)
    }

    pub fn has_usable_api_key(&self) -> bool {
        self.usable_api_key().is_some()
    }

    /// Layers key sources over the file value: environment, then explicit override.
    pub fn apply_api_key_sources(&mut self, env_key: Option<String>, override_key: Option<String>) {
        for key in [env_key, override_key].into_iter().flatten() {
            if !key.trim().is_empty() {
                self.api_key = Some(key.trim().to_string());
            }
        }
    }
}

/// Default location: `<config dir>/carechat/config.json`.
pub fn default_config_path() -> CareResult<PathBuf> {
    let config_dir = dirs::config_dir()
        .ok_or_else(|| CareError::config_error("Could not determine config directory"))?;

    Ok(config_dir.join("carechat").join("config.json"))
}

/// Reads the config file, or returns defaults when it does not exist.
pub fn load_config(path: &Path) -> CareResult<Config> {
    if !path.exists() {
        return Ok(Config::default());
    }

    let config_str = fs::read_to_string(path)
        .map_err(|e| CareError::config_error(format!("Failed to read config file: {}", e)))?;

    let config: Config = serde_json::from_str(&config_str)
        .map_err(|e| CareError::config_error(format!("Failed to parse config: {}", e)))?;

    validate_config(&config)?;
    Ok(config)
}

/// Loads the file and layers `GEMINI_API_KEY` and `override_key` on top.
pub fn resolve_config(path: &Path, override_key: Option<String>) -> CareResult<Config> {
    let mut config = load_config(path)?;
    config.apply_api_key_sources(env::var(API_KEY_ENV_VAR).ok(), override_key);
    Ok(config)
}

pub fn save_config(path: &Path, config: &Config) -> CareResult<()> {
    validate_config(config)?;

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| {
            CareError::config_error(format!("Failed to create config directory: {}", e))
        })?;
    }

    let config_str = serde_json::to_string_pretty(config)
        .map_err(|e| CareError::config_error(format!("Failed to serialize config: {}", e)))?;

    fs::write(path, config_str)
        .map_err(|e| CareError::config_error(format!("Failed to write config file: {}", e)))?;

    Ok(())
}

/// Stores a new API key in the config file, leaving every other saved setting as it was.
pub fn save_api_key(path: &Path, api_key: &str) -> CareResult<()> {
    let mut stored = load_config(path)?;
    stored.api_key = Some(api_key.trim().to_string());
    save_config(path, &stored)
}

pub fn validate_config(config: &Config) -> CareResult<()> {
    if config.model.trim().is_empty() {
        return Err(CareError::config_error("Model name is required"));
    }

    if config.api_base_url.trim().is_empty() {
        return Err(CareError::config_error("API base URL is required"));
    }

    if config.request_timeout_secs == Some(0) {
        return Err(CareError::config_error(
            "request_timeout_secs must be greater than 0",
        ));
    }

    if !LOG_LEVELS.contains(&config.log_level.to_lowercase().as_str()) {
        return Err(CareError::config_error(format!(
            "Unknown log level: {}",
            config.log_level
        )));
    }

    Ok(())
}
