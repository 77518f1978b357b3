// ABOUTME: YAML encoding and decoding of the host document
// ABOUTME: Thin wrapper over serde_yaml with file-aware error context

use crate::model::ConfigDocument;
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

pub fn to_yaml_string(document: &ConfigDocument) -> Result<String> {
    serde_yaml::to_string(document).context("Failed to encode hosts as YAML")
}

pub fn from_yaml_str(content: &str) -> Result<ConfigDocument> {
    serde_yaml::from_str(content).context("Failed to parse YAML document")
}

pub fn load_yaml_file(path: &Path) -> Result<ConfigDocument> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read YAML file: {}", path.display()))?;

    from_yaml_str(&content).with_context(|| format!("Invalid YAML file: {}", path.display()))
}
