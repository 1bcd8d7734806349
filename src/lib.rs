//! Multi-instance client core for a Sonarr media server.
//!
//! Resolves configured server instances, dispatches authenticated v3 API
//! requests against the selected one, and keeps listings fresh through
//! tracked reads with a download-driven polling timer. A front-end (here a
//! small CLI) renders the snapshots and issues the one-shot operations.

pub mod api;
pub mod config;
pub mod format;
pub mod instance;
pub mod logging;
pub mod notify;
pub mod query;
