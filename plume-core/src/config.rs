use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::client::DEFAULT_API_URL;
use crate::error::{PlumeError, Result};

pub const ENV_API_KEY: &str = "PLUME_API_KEY";
pub const ENV_API_URL: &str = "PLUME_API_URL";
pub const ENV_CONFIG_DIR: &str = "PLUME_CONFIG_DIR";

/// The two externally supplied values the core needs. The key is never
/// hard-coded; the URL defaults to the Gemini flash endpoint.
#[derive(Debug, Clone)]
pub struct Config {
    pub api_key: String,
    pub api_url: String,
}

#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    api_key: Option<String>,
    api_url: Option<String>,
}

impl Config {
    /// Environment first, then `config.json` in the plume config directory.
    pub fn load() -> Result<Self> {
        let file = match config_dir() {
            Some(dir) => read_config_file(&dir.join("config.json"))?,
            None => None,
        };
        let file = file.unwrap_or_default();

        let api_key = env_value(ENV_API_KEY)
            .or(file.api_key)
            .ok_or(PlumeError::MissingApiKey)?;
        let api_url = env_value(ENV_API_URL)
            .or(file.api_url)
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());

        Ok(Self { api_key, api_url })
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let file = read_config_file(path)?.unwrap_or_default();
        let api_key = file.api_key.ok_or(PlumeError::MissingApiKey)?;
        let api_url = file
            .api_url
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());
        Ok(Self { api_key, api_url })
    }
}

/// `$PLUME_CONFIG_DIR` when set, otherwise `<os config dir>/plume`.
pub fn config_dir() -> Option<PathBuf> {
    if let Some(dir) = env_value(ENV_CONFIG_DIR) {
        return Some(PathBuf::from(dir));
    }
    dirs::config_dir().map(|dir| dir.join("plume"))
}

fn env_value(name: &str) -> Option<String> {
    env::var(name).ok().filter(|value| !value.is_empty())
}

fn read_config_file(path: &Path) -> Result<Option<ConfigFile>> {
    if !path.exists() {
        return Ok(None);
    }
    let raw = fs::read_to_string(path).map_err(|source| PlumeError::ConfigIo {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&raw)
        .map(Some)
        .map_err(|source| PlumeError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })
}
