//! Instance resolution and session-scoped selection.

mod registry;
mod selection;

pub use registry::{ConfigurationError, Instance, InstanceRegistry};
pub use selection::{SelectionState, SwitchLogEntry};
