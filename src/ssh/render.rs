// ABOUTME: Rebuilds SSH config text from the host document
// ABOUTME: Emits Host, User, IdentityFile, Hostname, Port, then passthrough lines, in that fixed order

use crate::model::{ConfigDocument, HostEntry};
use crate::ssh::keystore::KeyStore;
use anyhow::Result;
use std::fmt::Write;
use std::path::Path;

/// Writes each distinct identity into `store` and returns the config text referencing those files.
pub fn render_ssh_config(document: &ConfigDocument, store: &mut KeyStore) -> Result<String> {
    let mut output = String::new();

    for host in &document.hosts {
        let identity_file = match host.identity() {
            Some(identity) => Some(store.store(&host.name, host.user.as_deref(), identity)?),
            None => None,
        };
        render_host(&mut output, host, identity_file.as_deref());
    }

    Ok(output)
}

pub fn render_host(output: &mut String, host: &HostEntry, identity_file: Option<&Path>) {
    if !host.name.is_empty() {
        let _ = writeln!(output, "Host {}", host.name);
    }
    if let Some(user) = non_empty(&host.user) {
        let _ = writeln!(output, "\tUser {}", user);
    }
    if let Some(path) = identity_file {
        let _ = writeln!(output, "\tIdentityFile {}", path.display());
    }
    if let Some(hostname) = non_empty(&host.hostname) {
        let _ = writeln!(output, "\tHostname {}", hostname);
    }
    if let Some(port) = non_empty(&host.port) {
        let _ = writeln!(output, "\tPort {}", port);
    }
    for line in host.data.lines().filter(|line| !line.trim().is_empty()) {
        let _ = writeln!(output, "\t{}", line.trim());
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|value| !value.is_empty())
}
