// ABOUTME: Shared data model for SSH host blocks and the YAML document that carries them
// ABOUTME: Field names follow the YAML schema (Hosts, Name, User, Port, Identity, Hostname, Data)

use serde::{Deserialize, Deserializer, Serialize};

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct ConfigDocument {
    #[serde(rename = "Hosts", alias = "hosts", default)]
    pub hosts: Vec<HostEntry>,
}

/// One `Host` block of an SSH config.
///
/// `identity` holds the private key content itself, never a path.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct HostEntry {
    #[serde(rename = "Name", alias = "name", default)]
    pub name: String,

    #[serde(
        rename = "User",
        alias = "user",
        default,
        deserialize_with = "empty_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub user: Option<String>,

    #[serde(
        rename = "Port",
        alias = "port",
        default,
        deserialize_with = "empty_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub port: Option<String>,

    #[serde(
        rename = "Identity",
        alias = "identity",
        default,
        deserialize_with = "empty_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub identity: Option<String>,

    #[serde(
        rename = "Hostname",
        alias = "hostname",
        default,
        deserialize_with = "empty_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub hostname: Option<String>,

    // Every directive not modeled above, one line each, newline terminated
    #[serde(
        rename = "Data",
        alias = "data",
        default,
        skip_serializing_if = "String::is_empty"
    )]
    pub data: String,
}

impl ConfigDocument {
    pub fn len(&self) -> usize {
        self.hosts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hosts.is_empty()
    }
}

impl HostEntry {
    pub fn new(name: String) -> Self {
        Self {
            name,
            ..Self::default()
        }
    }

    /// Appends a passthrough directive line, keeping declaration order.
    pub fn push_data_line(&mut self, line: &str) {
        self.data.push_str(line);
        self.data.push('\n');
    }

    pub fn identity(&self) -> Option<&str> {
        self.identity.as_deref().filter(|identity| !identity.is_empty())
    }
}

// Files written by older tooling serialize every field, empty or not
fn empty_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|value| !value.is_empty()))
}
