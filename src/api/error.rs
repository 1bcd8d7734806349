use thiserror::Error;

/// Errors from requests against a server instance.
#[derive(Debug, Error)]
pub enum ApiError {
    /// A request was attempted with no usable instance. Raised before any
    /// network call.
    #[error("No usable instance: {reason}")]
    InvalidInstance { reason: String },

    /// Network or DNS level failure from the transport.
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The server answered with a non-success status.
    #[error("Server returned {status}: {body}")]
    Status { status: u16, body: String },
}

impl ApiError {
    /// HTTP status code, when the server produced one.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            ApiError::Transport(e) => e.status().map(|s| s.as_u16()),
            ApiError::InvalidInstance { .. } => None,
        }
    }
}
