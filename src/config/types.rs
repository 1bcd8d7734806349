use serde::{Deserialize, Serialize};

/// Root configuration container.
///
/// One primary server is required; a secondary can be kept configured and
/// toggled on or off without losing its settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Which configured server starts out selected.
    #[serde(default)]
    pub active: ActiveSelector,
    #[serde(default)]
    pub primary: PrimaryInstance,
    #[serde(default)]
    pub secondary: Option<SecondaryInstance>,
}

/// Selector for the server that is active at startup.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActiveSelector {
    #[default]
    Primary,
    Secondary,
}

/// The required server entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrimaryInstance {
    /// Display name, unique among configured servers.
    #[serde(default = "default_primary_name")]
    pub name: String,
    /// Base URL of the server (e.g., "http://localhost:8989").
    #[serde(default)]
    pub url: String,
    /// Static API key forwarded on every request.
    #[serde(default)]
    pub api_key: String,
}

/// The optional second server entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecondaryInstance {
    #[serde(default = "default_secondary_name")]
    pub name: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub api_key: String,
    /// The entry is ignored entirely unless explicitly enabled.
    #[serde(default)]
    pub enabled: bool,
}

fn default_primary_name() -> String {
    "Primary".to_string()
}

fn default_secondary_name() -> String {
    "Secondary".to_string()
}

impl Default for PrimaryInstance {
    fn default() -> Self {
        Self {
            name: default_primary_name(),
            url: String::new(),
            api_key: String::new(),
        }
    }
}

impl Default for SecondaryInstance {
    fn default() -> Self {
        Self {
            name: default_secondary_name(),
            url: String::new(),
            api_key: String::new(),
            enabled: false,
        }
    }
}

impl SecondaryInstance {
    /// Fully configured means both URL and API key are present.
    pub fn is_fully_configured(&self) -> bool {
        !self.url.trim().is_empty() && !self.api_key.trim().is_empty()
    }
}
