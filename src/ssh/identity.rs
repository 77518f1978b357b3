// ABOUTME: Resolves IdentityFile references to the literal private key content
// ABOUTME: Supports $HOME and ~ expansion or reading every key from one flat folder

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

pub struct IdentityResolver {
    key_folder: Option<PathBuf>,
    home: Option<PathBuf>,
}

impl IdentityResolver {
    /// Resolves paths as written in the config, expanding `$HOME` and `~`.
    pub fn from_paths() -> Self {
        Self {
            key_folder: None,
            home: None,
        }
    }

    /// Reads every key by file name from `folder`, ignoring the directories in the config.
    pub fn from_folder(folder: impl Into<PathBuf>) -> Self {
        Self {
            key_folder: Some(folder.into()),
            home: None,
        }
    }

    #[cfg(test)]
    pub fn with_home(mut self, home: impl Into<PathBuf>) -> Self {
        self.home = Some(home.into());
        self
    }

    pub fn key_path(&self, reference: &str) -> Result<PathBuf> {
        match &self.key_folder {
            Some(folder) => {
                // Nested directories inside the key folder are not supported
                let file_name = Path::new(reference)
                    .file_name()
                    .with_context(|| format!("IdentityFile has no file name: {}", reference))?;
                Ok(folder.join(file_name))
            }
            None => self.expand_home(reference),
        }
    }

    pub fn resolve(&self, reference: &str) -> Result<String> {
        let path = self.key_path(reference)?;
        tracing::debug!("Reading identity file {}", path.display());

        let bytes = fs::read(&path)
            .with_context(|| format!("Failed to read identity file: {}", path.display()))?;

        // Binary (e.g. DER) keys cannot be carried in the YAML text fields
        String::from_utf8(bytes).map_err(|_| {
            anyhow::anyhow!(
                "Identity file is not a text key (invalid UTF-8): {}",
                path.display()
            )
        })
    }

    fn expand_home(&self, reference: &str) -> Result<PathBuf> {
        let rest = if reference == "~" || reference == "$HOME" {
            Some("")
        } else {
            reference
                .strip_prefix("~/")
                .or_else(|| reference.strip_prefix("$HOME/"))
        };

        match rest {
            Some(rest) => Ok(self.home_dir()?.join(rest)),
            None => Ok(PathBuf::from(reference)),
        }
    }

    fn home_dir(&self) -> Result<PathBuf> {
        match &self.home {
            Some(home) => Ok(home.clone()),
            None => dirs::home_dir().context("Failed to determine home directory"),
        }
    }
}
