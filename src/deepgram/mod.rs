//! Deepgram management API integration.
//!
//! This module provides:
//! - API client for the projects, usage and requests endpoints
//! - Data structures for usage summaries and request logs
//! - The HTTP transport seam the client is built on
//!
//! Every call first resolves the project id, then issues the data call.
//! Failures are returned immediately; nothing is retried or cached.

mod client;
mod transport;
mod types;

pub use client::{
    sum_usage, ApiEndpoint, ClientOptions, DeepgramClient, ProjectSelection,
    DEFAULT_PAGE_LIMIT, DEFAULT_PROXY_ORIGIN,
};
pub use transport::{HttpResponse, HttpTransport, ReqwestTransport};
pub use types::{
    Project, RequestPage, RequestRecord, UsageRecord, UsageSummary,
};
