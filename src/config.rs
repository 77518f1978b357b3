// ABOUTME: Optional user configuration for default key directory, digest length and log level
// ABOUTME: Loaded from a TOML file; every field falls back to a built-in default

use crate::ssh::keystore::DEFAULT_DIGEST_LENGTH;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::Level;

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub keys: KeysConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct KeysConfig {
    /// Where `convert yaml` writes key files when `-k` is not given
    pub directory: String,
    /// Hex characters of the key digest used in key file names
    pub digest_length: usize,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
}

impl Default for KeysConfig {
    fn default() -> Self {
        KeysConfig {
            directory: "./ssh".to_string(),
            digest_length: DEFAULT_DIGEST_LENGTH,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        LoggingConfig {
            level: "warn".to_string(),
        }
    }
}

impl Config {
    pub fn load_from_str(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse configuration")
    }

    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read configuration file: {}", path.display()))?;
        Self::load_from_str(&content)
    }

    /// Loads `explicit` if given, else the default location when it exists, else defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let mut config = match explicit {
            Some(path) => Self::load_from_file(path)?,
            None => match Self::default_config_path() {
                Ok(path) if path.exists() => Self::load_from_file(&path)?,
                _ => Self::default(),
            },
        };

        config.expand_path()?;
        config.validate()?;
        Ok(config)
    }

    pub fn default_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Failed to determine config directory")?;
        Ok(config_dir.join("shoji").join("config.toml"))
    }

    pub fn expand_path(&mut self) -> Result<()> {
        self.keys.directory = expand_tilde(&self.keys.directory)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.keys.directory.is_empty() {
            anyhow::bail!("Key directory cannot be empty");
        }

        if !(1..=64).contains(&self.keys.digest_length) {
            anyhow::bail!("digest_length must be between 1 and 64");
        }

        self.log_level()?;

        Ok(())
    }

    pub fn log_level(&self) -> Result<Level> {
        self.logging
            .level
            .parse::<Level>()
            .map_err(|_| anyhow::anyhow!("Unknown log level: {}", self.logging.level))
    }
}

fn expand_tilde(path: &str) -> Result<String> {
    if let Some(rest) = path.strip_prefix("~/") {
        let home = dirs::home_dir()
            .context("Failed to determine home directory")?;
        Ok(home.join(rest).to_string_lossy().into_owned())
    } else {
        Ok(path.to_string())
    }
}
