use std::fmt;
use std::fs;
use std::path::PathBuf;

use crate::config;
use crate::error::{PlumeError, Result};

/// Display theme preference, the only value the widget persists.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ThemePreference {
    #[default]
    Light,
    Dark,
}

impl ThemePreference {
    pub fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }

    /// Anything that is not exactly "dark" reads as light.
    fn parse(raw: &str) -> Self {
        if raw.trim() == "dark" {
            Self::Dark
        } else {
            Self::Light
        }
    }
}

impl fmt::Display for ThemePreference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Light => write!(f, "light"),
            Self::Dark => write!(f, "dark"),
        }
    }
}

/// One-word preference file under the plume config directory.
#[derive(Debug, Clone)]
pub struct ThemeStore {
    path: PathBuf,
}

impl ThemeStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn at_default_location() -> Option<Self> {
        config::config_dir().map(|dir| Self::new(dir.join("theme")))
    }

    pub fn load(&self) -> ThemePreference {
        match fs::read_to_string(&self.path) {
            Ok(raw) => ThemePreference::parse(&raw),
            Err(_) => ThemePreference::Light,
        }
    }

    pub fn save(&self, theme: ThemePreference) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|source| PlumeError::ThemeIo {
                path: self.path.clone(),
                source,
            })?;
        }
        fs::write(&self.path, theme.to_string()).map_err(|source| PlumeError::ThemeIo {
            path: self.path.clone(),
            source,
        })
    }

    pub fn toggle(&self) -> Result<ThemePreference> {
        let next = self.load().toggled();
        self.save(next)?;
        Ok(next)
    }
}
