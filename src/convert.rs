// ABOUTME: The two conversion operations: SSH config to YAML and YAML back to SSH config plus key files
// ABOUTME: Each reads its input, drives the model, and writes to a file or standard output

use crate::ssh::{IdentityResolver, KeyStore, parse_ssh_config, render_ssh_config};
use crate::yaml;
use anyhow::{Context, Result};
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

#[cfg(unix)]
use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};

// The YAML document embeds private keys
const YAML_FILE_MODE: u32 = 0o600;
// OpenSSH rejects group or world writable config files
const SSH_CONFIG_FILE_MODE: u32 = 0o644;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destination {
    File(PathBuf),
    Stdout,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConversionSummary {
    pub hosts: usize,
    pub key_files: usize,
    pub warnings: Vec<String>,
}

/// Reads an SSH config and its keys and writes one YAML document.
///
/// With `key_folder`, every IdentityFile is looked up by file name in that folder.
pub fn ssh_to_yaml(
    input: &Path,
    key_folder: Option<&Path>,
    destination: &Destination,
) -> Result<ConversionSummary> {
    let resolver = match key_folder {
        Some(folder) => IdentityResolver::from_folder(folder),
        None => IdentityResolver::from_paths(),
    };
    ssh_to_yaml_with(input, &resolver, destination)
}

pub fn ssh_to_yaml_with(
    input: &Path,
    resolver: &IdentityResolver,
    destination: &Destination,
) -> Result<ConversionSummary> {
    let parsed = parse_ssh_config(input, resolver)?;
    if parsed.document.is_empty() {
        tracing::warn!("No Host blocks found in {}", input.display());
    }
    let output = yaml::to_yaml_string(&parsed.document)?;
    write_output(destination, &output, YAML_FILE_MODE)?;

    let summary = ConversionSummary {
        hosts: parsed.document.len(),
        key_files: parsed
            .document
            .hosts
            .iter()
            .filter(|host| host.identity().is_some())
            .count(),
        warnings: parsed.warnings,
    };
    tracing::info!(
        "Converted {} host(s) from {} to YAML",
        summary.hosts,
        input.display()
    );
    Ok(summary)
}

/// Reads a YAML document, writes its keys under `keys_dir` and emits the SSH config.
pub fn yaml_to_ssh(
    input: &Path,
    keys_dir: &Path,
    digest_length: usize,
    destination: &Destination,
) -> Result<ConversionSummary> {
    let document = yaml::load_yaml_file(input)?;

    let mut store = KeyStore::create(keys_dir, digest_length)?;
    let output = render_ssh_config(&document, &mut store)?;
    write_output(destination, &output, SSH_CONFIG_FILE_MODE)?;

    let summary = ConversionSummary {
        hosts: document.len(),
        key_files: store.files_written(),
        warnings: Vec::new(),
    };
    tracing::info!(
        "Converted {} host(s) from {}, wrote {} key file(s) to {}",
        summary.hosts,
        input.display(),
        summary.key_files,
        keys_dir.display()
    );
    Ok(summary)
}

fn write_output(destination: &Destination, content: &str, mode: u32) -> Result<()> {
    match destination {
        Destination::Stdout => {
            let mut stdout = io::stdout().lock();
            stdout
                .write_all(content.as_bytes())
                .and_then(|_| stdout.flush())
                .context("Failed to write to standard output")
        }
        Destination::File(path) => write_file(path, content, mode)
            .with_context(|| format!("Failed to write output file: {}", path.display())),
    }
}

fn write_file(path: &Path, content: &str, mode: u32) -> io::Result<()> {
    let existing = fs::metadata(path).ok();

    let mut options = OpenOptions::new();
    options.write(true).create(true).truncate(true);

    #[cfg(unix)]
    options.mode(mode);

    let mut file = options.open(path)?;
    file.write_all(content.as_bytes())?;

    // An existing file may only lose permission bits, never gain them
    #[cfg(unix)]
    {
        let target = match &existing {
            Some(metadata) => metadata.permissions().mode() & 0o777 & mode,
            None => mode,
        };
        fs::set_permissions(path, fs::Permissions::from_mode(target))?;
    }

    #[cfg(not(unix))]
    let _ = (existing, mode);

    Ok(())
}
