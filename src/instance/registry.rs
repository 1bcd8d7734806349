use thiserror::Error;

use crate::config::{ActiveSelector, Config};

/// Errors raised while resolving instances from configuration.
#[derive(Debug, Clone, Error)]
pub enum ConfigurationError {
    /// The required primary entry is missing its URL or API key.
    #[error("Primary instance is not configured: {reason}")]
    PrimaryNotConfigured { reason: String },
    /// A lookup or switch named an instance that does not exist.
    #[error("Instance '{name}' not found")]
    InstanceNotFound { name: String },
}

/// One configured backend server.
///
/// Built once at configuration-load time and immutable afterwards.
/// Identity is the name, unique within the registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instance {
    pub name: String,
    /// Normalized base URL, guaranteed free of trailing slashes.
    pub base_url: String,
    pub api_key: String,
    /// Whether configuration marks this instance active at startup.
    pub is_default: bool,
}

impl Instance {
    fn new(name: &str, url: &str, api_key: &str, is_default: bool) -> Self {
        Self {
            name: name.to_string(),
            base_url: normalize_base_url(url),
            api_key: api_key.trim().to_string(),
            is_default,
        }
    }

    /// A request can only be issued against an instance carrying both a
    /// URL and an API key.
    pub fn is_usable(&self) -> bool {
        !self.base_url.is_empty() && !self.api_key.is_empty()
    }
}

/// Strip trailing slashes so endpoint concatenation never doubles one.
fn normalize_base_url(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}

/// Resolved, ordered set of instances. Primary always first.
#[derive(Debug, Clone)]
pub struct InstanceRegistry {
    instances: Vec<Instance>,
}

impl InstanceRegistry {
    /// Resolve the registry from static configuration.
    ///
    /// The secondary is appended only when it is fully configured and
    /// explicitly enabled; a half-filled secondary entry is skipped rather
    /// than rejected.
    pub fn from_config(config: &Config) -> Result<Self, ConfigurationError> {
        let primary = &config.primary;
        if primary.url.trim().is_empty() {
            return Err(ConfigurationError::PrimaryNotConfigured {
                reason: "missing URL".to_string(),
            });
        }
        if primary.api_key.trim().is_empty() {
            return Err(ConfigurationError::PrimaryNotConfigured {
                reason: "missing API key".to_string(),
            });
        }

        let secondary_active = config
            .secondary
            .as_ref()
            .map(|s| s.enabled && s.is_fully_configured() && config.active == ActiveSelector::Secondary)
            .unwrap_or(false);

        let mut instances = vec![Instance::new(
            &primary.name,
            &primary.url,
            &primary.api_key,
            !secondary_active,
        )];

        if let Some(secondary) = &config.secondary {
            if secondary.enabled && secondary.is_fully_configured() {
                instances.push(Instance::new(
                    &secondary.name,
                    &secondary.url,
                    &secondary.api_key,
                    secondary_active,
                ));
            } else if secondary.enabled {
                tracing::warn!(
                    name = %secondary.name,
                    "Secondary instance enabled but not fully configured, skipping"
                );
            }
        }

        Ok(Self { instances })
    }

    /// All resolved instances, primary first.
    pub fn instances(&self) -> &[Instance] {
        &self.instances
    }

    /// The instance configuration marks active: the secondary if and only
    /// if it is enabled and selected, else the primary.
    pub fn active(&self) -> &Instance {
        self.instances
            .iter()
            .find(|i| i.is_default)
            .unwrap_or(&self.instances[0])
    }

    /// Look up an instance by name.
    pub fn get(&self, name: &str) -> Result<&Instance, ConfigurationError> {
        self.instances
            .iter()
            .find(|i| i.name == name)
            .ok_or_else(|| ConfigurationError::InstanceNotFound {
                name: name.to_string(),
            })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.instances.iter().any(|i| i.name == name)
    }
}
