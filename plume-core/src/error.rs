use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PlumeError {
    #[error("network error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("model not found, check the API configuration")]
    ModelNotFound,

    #[error("API error: {0}")]
    HttpStatus(u16),

    #[error("invalid API response")]
    MalformedResponse,

    #[error("no API key configured, set PLUME_API_KEY or add api_key to the config file")]
    MissingApiKey,

    #[error("i/o error on {path}: {source}")]
    ConfigIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config file {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("i/o error on {path}: {source}")]
    ThemeIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, PlumeError>;
