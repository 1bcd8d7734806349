//! Shared test utilities and mock infrastructure.

#![allow(dead_code)]

pub mod mock_server;

use std::path::PathBuf;
use std::sync::Arc;

use anysonarr::api::SonarrClient;
use anysonarr::config::{ActiveSelector, Config, PrimaryInstance, SecondaryInstance};
use anysonarr::instance::{InstanceRegistry, SelectionState};
use anysonarr::notify::RecordingNotifier;
use tempfile::TempDir;

/// Config with a single primary pointing at `url`.
pub fn single_instance_config(url: &str) -> Config {
    Config {
        active: ActiveSelector::Primary,
        primary: PrimaryInstance {
            name: "Main".to_string(),
            url: url.to_string(),
            api_key: "test-key".to_string(),
        },
        secondary: None,
    }
}

/// Config with a primary and an enabled secondary.
pub fn two_instance_config(primary_url: &str, secondary_url: &str) -> Config {
    Config {
        active: ActiveSelector::Primary,
        primary: PrimaryInstance {
            name: "Main".to_string(),
            url: primary_url.to_string(),
            api_key: "main-key".to_string(),
        },
        secondary: Some(SecondaryInstance {
            name: "4K".to_string(),
            url: secondary_url.to_string(),
            api_key: "uhd-key".to_string(),
            enabled: true,
        }),
    }
}

pub fn selection_for(config: &Config) -> SelectionState {
    SelectionState::new(InstanceRegistry::from_config(config).expect("valid test config"))
}

/// Client wired to a recording notifier, returned alongside it.
pub fn recording_client() -> (SonarrClient, Arc<RecordingNotifier>) {
    let notifier = Arc::new(RecordingNotifier::new());
    (SonarrClient::new(notifier.clone()), notifier)
}

/// Write a config file into a temp dir and return both.
pub fn temp_config_file(content: &str) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config_path = temp_dir.path().join("config.toml");
    std::fs::write(&config_path, content).expect("Failed to write config");
    (temp_dir, config_path)
}
