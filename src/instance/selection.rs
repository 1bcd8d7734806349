//! Session-scoped instance selection with explicit switching.
//!
//! The selection is the only mutable shared state in the crate. It starts
//! at the configured active instance, changes only through [`SelectionState::switch`],
//! and is never persisted.

use std::sync::{Arc, RwLock};
use std::time::SystemTime;

use crate::instance::registry::{ConfigurationError, Instance, InstanceRegistry};

/// Log entry for an instance switch event.
#[derive(Debug, Clone)]
pub struct SwitchLogEntry {
    /// When the switch occurred.
    pub timestamp: SystemTime,
    /// The previously selected instance.
    pub old_instance: String,
    /// The newly selected instance.
    pub new_instance: String,
}

/// Shared handle to the currently selected instance.
///
/// Many concurrent readers (every tracked read and write resolves the
/// selection at request time), exclusive writes on switch.
#[derive(Clone)]
pub struct SelectionState {
    inner: Arc<RwLock<SelectionInner>>,
}

struct SelectionInner {
    registry: InstanceRegistry,
    selected: String,
    switch_log: Vec<SwitchLogEntry>,
}

impl SelectionState {
    /// Create selection state pointing at the registry's active instance.
    pub fn new(registry: InstanceRegistry) -> Self {
        let selected = registry.active().name.clone();
        Self {
            inner: Arc::new(RwLock::new(SelectionInner {
                registry,
                selected,
                switch_log: Vec::new(),
            })),
        }
    }

    /// Name of the currently selected instance.
    pub fn selected_name(&self) -> String {
        self.inner
            .read()
            .expect("selection lock poisoned")
            .selected
            .clone()
    }

    /// The currently selected instance.
    pub fn current(&self) -> Instance {
        let state = self.inner.read().expect("selection lock poisoned");
        state
            .registry
            .get(&state.selected)
            .expect("selected instance present in registry")
            .clone()
    }

    /// All configured instances, primary first.
    pub fn instances(&self) -> Vec<Instance> {
        self.inner
            .read()
            .expect("selection lock poisoned")
            .registry
            .instances()
            .to_vec()
    }

    /// Switch to a different instance by name.
    ///
    /// Validates the target exists; a no-op when already selected. The
    /// registry is never modified, so state is unchanged on error.
    pub fn switch(&self, name: &str) -> Result<(), ConfigurationError> {
        let mut state = self.inner.write().expect("selection lock poisoned");

        if !state.registry.contains(name) {
            return Err(ConfigurationError::InstanceNotFound {
                name: name.to_string(),
            });
        }

        if state.selected == name {
            return Ok(());
        }

        let entry = SwitchLogEntry {
            timestamp: SystemTime::now(),
            old_instance: state.selected.clone(),
            new_instance: name.to_string(),
        };
        state.switch_log.push(entry);

        let old = std::mem::replace(&mut state.selected, name.to_string());

        tracing::info!(
            old_instance = %old,
            new_instance = %name,
            "Instance switched"
        );

        Ok(())
    }

    /// The switch history for this session, oldest first.
    pub fn switch_log(&self) -> Vec<SwitchLogEntry> {
        self.inner
            .read()
            .expect("selection lock poisoned")
            .switch_log
            .clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ActiveSelector, Config, PrimaryInstance, SecondaryInstance};

    fn two_instance_state() -> SelectionState {
        let config = Config {
            active: ActiveSelector::Primary,
            primary: PrimaryInstance {
                name: "Main".to_string(),
                url: "http://main:8989".to_string(),
                api_key: "abc".to_string(),
            },
            secondary: Some(SecondaryInstance {
                name: "4K".to_string(),
                url: "http://uhd:8989".to_string(),
                api_key: "def".to_string(),
                enabled: true,
            }),
        };
        SelectionState::new(InstanceRegistry::from_config(&config).unwrap())
    }

    #[test]
    fn starts_at_registry_active() {
        let state = two_instance_state();
        assert_eq!(state.selected_name(), "Main");
        assert_eq!(state.current().base_url, "http://main:8989");
    }

    #[test]
    fn switch_changes_current() {
        let state = two_instance_state();
        state.switch("4K").unwrap();
        assert_eq!(state.selected_name(), "4K");
        assert_eq!(state.current().base_url, "http://uhd:8989");
    }

    #[test]
    fn switch_to_unknown_fails_and_keeps_state() {
        let state = two_instance_state();
        assert!(matches!(
            state.switch("nope"),
            Err(ConfigurationError::InstanceNotFound { .. })
        ));
        assert_eq!(state.selected_name(), "Main");
    }

    #[test]
    fn switch_to_same_is_noop_without_log_entry() {
        let state = two_instance_state();
        state.switch("Main").unwrap();
        assert!(state.switch_log().is_empty());
    }

    #[test]
    fn switch_log_records_transitions() {
        let state = two_instance_state();
        state.switch("4K").unwrap();
        state.switch("Main").unwrap();

        let log = state.switch_log();
        assert_eq!(log.len(), 2);
        assert_eq!(log[0].old_instance, "Main");
        assert_eq!(log[0].new_instance, "4K");
        assert_eq!(log[1].old_instance, "4K");
        assert_eq!(log[1].new_instance, "Main");
    }
}
