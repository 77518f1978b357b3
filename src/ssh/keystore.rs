// ABOUTME: Content-addressed store that writes each distinct private key to one file
// ABOUTME: File names are derived from user, host and a SHA-256 prefix of the key content

use anyhow::{Context, Result};
use sha2::{Digest, Sha256};
use std::collections::{HashMap, HashSet};
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

#[cfg(unix)]
use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};

pub const DEFAULT_DIGEST_LENGTH: usize = 8;
const KEY_FILE_MODE: u32 = 0o600;

/// Writes key material under `directory`, once per distinct content.
///
/// The cache lives for one conversion run only.
#[derive(Debug)]
pub struct KeyStore {
    directory: PathBuf,
    digest_length: usize,
    by_content: HashMap<String, PathBuf>,
    assigned: HashSet<PathBuf>,
}

impl KeyStore {
    /// Creates the key directory (and its parents) if it does not exist yet.
    pub fn create(directory: &Path, digest_length: usize) -> Result<Self> {
        fs::create_dir_all(directory)
            .with_context(|| format!("Failed to create key directory: {}", directory.display()))?;

        Ok(Self {
            directory: directory.to_path_buf(),
            digest_length: digest_length.clamp(1, 64),
            by_content: HashMap::new(),
            assigned: HashSet::new(),
        })
    }

    /// Returns the file holding `identity`, writing it on first sight.
    pub fn store(&mut self, host: &str, user: Option<&str>, identity: &str) -> Result<PathBuf> {
        if let Some(path) = self.by_content.get(identity) {
            tracing::debug!("Reusing key file {} for host {}", path.display(), host);
            return Ok(path.clone());
        }

        let path = self.unused_path(&key_file_stem(host, user, identity, self.digest_length));
        write_key_file(&path, identity)?;
        tracing::debug!("Wrote key file {} for host {}", path.display(), host);

        self.assigned.insert(path.clone());
        self.by_content.insert(identity.to_string(), path.clone());
        Ok(path)
    }

    pub fn files_written(&self) -> usize {
        self.by_content.len()
    }

    // Distinct keys whose digest prefixes collide get a numeric suffix
    fn unused_path(&self, stem: &str) -> PathBuf {
        let mut path = self.directory.join(format!("{}.key", stem));
        let mut suffix = 2;
        while self.assigned.contains(&path) {
            tracing::warn!("Key file name {} already used by another key", path.display());
            path = self.directory.join(format!("{}-{}.key", stem, suffix));
            suffix += 1;
        }
        path
    }
}

pub fn content_digest(identity: &str) -> String {
    format!("{:x}", Sha256::digest(identity.as_bytes()))
}

/// Keeps the host name only if every character is filesystem safe.
pub fn sanitize_host(host: &str) -> &str {
    let safe = host
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_');
    if safe { host } else { "" }
}

pub fn key_file_stem(host: &str, user: Option<&str>, identity: &str, digest_length: usize) -> String {
    let digest = content_digest(identity);
    let prefix = &digest[..digest_length.clamp(1, digest.len())];

    match user.filter(|user| !user.is_empty()) {
        Some(user) => format!("{}-{}-{}", user, sanitize_host(host), prefix),
        None => format!("{}-{}", sanitize_host(host), prefix),
    }
}

fn write_key_file(path: &Path, identity: &str) -> Result<()> {
    let write = || -> io::Result<()> {
        let mut options = OpenOptions::new();
        options.write(true).create(true).truncate(true);

        #[cfg(unix)]
        options.mode(KEY_FILE_MODE);

        let mut file = options.open(path)?;
        file.write_all(identity.as_bytes())?;

        // The mode above only applies to newly created files
        #[cfg(unix)]
        fs::set_permissions(path, fs::Permissions::from_mode(KEY_FILE_MODE))?;

        Ok(())
    };

    write().with_context(|| format!("Failed to write key file: {}", path.display()))
}
