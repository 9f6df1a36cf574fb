//! Usage summaries and request logs for the Deepgram speech-to-text API.
//!
//! The [`deepgram`] client talks to Deepgram through the `/api/deepgram`
//! development proxy (or directly), [`session`] holds the credential for a
//! dashboard session, and [`path_format`] prepares request paths for display.

pub mod cli;
pub mod credential;
pub mod date_range;
pub mod deepgram;
pub mod error;
pub mod pager;
pub mod path_format;
pub mod session;
pub mod settings;

pub use cli::run;
pub use credential::Credential;
pub use deepgram::{
    ApiEndpoint, ClientOptions, DeepgramClient, ProjectSelection, RequestPage, RequestRecord,
    UsageSummary,
};
pub use error::{DashboardError, Result};
pub use path_format::{format_api_path, parse_path_components, FormattedPath, PathComponents};
pub use session::DashboardSession;
