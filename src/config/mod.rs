//! Static configuration: the two server entries and the startup selector.

mod loader;
mod types;

pub use loader::ConfigError;
pub use types::{ActiveSelector, Config, PrimaryInstance, SecondaryInstance};
