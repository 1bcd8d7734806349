//! Authenticated access to the v3 REST API of a server instance.

mod client;
mod error;
pub mod models;

pub use client::SonarrClient;
pub use error::ApiError;
