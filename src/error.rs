//! Error type shared by the Deepgram client, session and settings.
//!
//! Errors carry human-readable text only; callers render the message.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, DashboardError>;

#[derive(Debug, Error)]
pub enum DashboardError {
    /// A data operation ran before a credential was supplied.
    #[error("Deepgram client not initialized. Call initialize first.")]
    Uninitialized,

    /// The HTTP stack could not be constructed.
    #[error("Failed to initialize Deepgram client: {0}")]
    Initialization(String),

    /// The proxy or provider answered with a non-success status.
    #[error("{context}: {status_text}")]
    Provider {
        context: &'static str,
        status: u16,
        status_text: String,
    },

    /// The request never produced a response.
    #[error("Network error: {0}")]
    Network(String),

    /// A response body did not have the expected shape.
    #[error("Failed to parse API response: {0}")]
    MalformedResponse(String),

    #[error("No Deepgram project found for this API key")]
    NoProjects,

    #[error("Project {0} is not accessible with this API key")]
    ProjectNotFound(String),

    /// A project or request id that cannot be used as a URL path segment.
    #[error("Invalid identifier {0:?}")]
    InvalidId(String),

    #[error("Start date must not be after end date")]
    InvalidRange,

    #[error("Page limit must be greater than zero")]
    InvalidLimit,

    #[error("Settings error: {0}")]
    Settings(String),

    #[error("Failed to render output: {0}")]
    Output(String),
}

impl DashboardError {
    /// HTTP status of a provider failure, if this is one.
    pub fn status(&self) -> Option<u16> {
        match self {
            DashboardError::Provider { status, .. } => Some(*status),
            _ => None,
        }
    }
}
