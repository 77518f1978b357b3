// ABOUTME: Line-oriented SSH config parser producing the ordered host document
// ABOUTME: Models User, Hostname, Port and IdentityFile; every other directive passes through verbatim

use crate::model::{ConfigDocument, HostEntry};
use crate::ssh::identity::IdentityResolver;
use anyhow::{Context, Result, bail};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedConfig {
    pub document: ConfigDocument,
    pub warnings: Vec<String>,
}

pub fn parse_ssh_config(path: &Path, resolver: &IdentityResolver) -> Result<ParsedConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read SSH config file: {}", path.display()))?;

    parse_ssh_config_content(&content, resolver)
        .with_context(|| format!("Failed to convert SSH config file: {}", path.display()))
}

pub fn parse_ssh_config_content(content: &str, resolver: &IdentityResolver) -> Result<ParsedConfig> {
    let mut parsed = ParsedConfig::default();

    for (index, line) in content.lines().enumerate() {
        let line_number = index + 1;
        let line = line.trim();

        // Skip empty lines and comments
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        // Runs of spaces or tabs separate tokens, so `Host a  b` yields the name `a b`
        let parts: Vec<&str> = line.split_whitespace().collect();
        let key = parts[0].to_lowercase();

        if key == "include" {
            let warning = format!(
                "line {}: Include is not supported, ignoring \"{}\"",
                line_number, line
            );
            tracing::warn!("{}", warning);
            parsed.warnings.push(warning);
            continue;
        }

        if parts.len() < 2 {
            continue;
        }

        if key == "host" {
            parsed.document.hosts.push(HostEntry::new(parts[1..].join(" ")));
            continue;
        }

        let Some(host) = parsed.document.hosts.last_mut() else {
            bail!(
                "line {}: {} appears before any Host declaration",
                line_number,
                parts[0]
            );
        };

        match key.as_str() {
            "user" => host.user = Some(parts[1].to_string()),
            "hostname" => host.hostname = Some(parts[1].to_string()),
            "port" => host.port = Some(parts[1].to_string()),
            "identityfile" => {
                let identity = resolver
                    .resolve(parts[1])
                    .with_context(|| format!("line {}: IdentityFile {}", line_number, parts[1]))?;
                host.identity = Some(identity);
            }
            _ => host.push_data_line(line),
        }
    }

    tracing::debug!("Parsed {} host(s) from SSH config", parsed.document.len());
    Ok(parsed)
}
