//! Deepgram management API client.
//!
//! Requests go through the development proxy at `{origin}/api/deepgram`,
//! which turns the `x-api-key` header into Deepgram's `Authorization: Token`
//! scheme. Direct mode talks to Deepgram itself with that header.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

use super::transport::{HttpTransport, ReqwestTransport};
use super::types::{
    ProjectsResponse, RequestPage, RequestRecord, UsageRecord, UsageResponse, UsageSummary,
};
use crate::credential::Credential;
use crate::error::{DashboardError, Result};

pub const DEFAULT_PROXY_ORIGIN: &str = "http://localhost:5173";
const PROXY_PREFIX: &str = "/api/deepgram";
const DEEPGRAM_BASE_URL: &str = "https://api.deepgram.com";

/// Default number of requests per page.
pub const DEFAULT_PAGE_LIMIT: u32 = 100;

/// Where API calls are sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiEndpoint {
    /// Same-origin proxy mounted at `/api/deepgram` on `origin`
    Proxy { origin: String },
    /// api.deepgram.com, authenticated with `Authorization: Token`
    Direct,
}

impl ApiEndpoint {
    fn base_url(&self) -> String {
        match self {
            ApiEndpoint::Proxy { origin } => {
                format!("{}{}", origin.trim_end_matches('/'), PROXY_PREFIX)
            }
            ApiEndpoint::Direct => DEEPGRAM_BASE_URL.to_string(),
        }
    }
}

impl Default for ApiEndpoint {
    fn default() -> Self {
        ApiEndpoint::Proxy {
            origin: DEFAULT_PROXY_ORIGIN.to_string(),
        }
    }
}

/// Which project of the account the client works against.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ProjectSelection {
    /// The first project Deepgram lists
    #[default]
    First,
    /// A specific project id, which must be visible to the key
    Id(String),
}

#[derive(Debug, Clone, Default)]
pub struct ClientOptions {
    pub endpoint: ApiEndpoint,
    pub project: ProjectSelection,
    pub request_timeout: Option<Duration>,
}

/// Client bound to one credential.
///
/// Cheap to clone; clones share the HTTP transport. Nothing is cached: the
/// project id is looked up again for every usage or requests call.
#[derive(Clone)]
pub struct DeepgramClient {
    credential: Credential,
    options: ClientOptions,
    base_url: String,
    transport: Arc<dyn HttpTransport>,
}

impl DeepgramClient {
    /// Create a client for `credential`. Makes no network call.
    pub fn initialize(credential: Credential, options: ClientOptions) -> Result<Self> {
        let transport = ReqwestTransport::new(options.request_timeout)?;
        Ok(Self::with_transport(credential, options, Arc::new(transport)))
    }

    pub fn with_transport(
        credential: Credential,
        options: ClientOptions,
        transport: Arc<dyn HttpTransport>,
    ) -> Self {
        let base_url = options.endpoint.base_url();
        log::info!(
            "DeepgramClient: initialized for key {} via {}",
            credential.masked(),
            base_url
        );
        Self {
            credential,
            options,
            base_url,
            transport,
        }
    }

    pub fn credential(&self) -> &Credential {
        &self.credential
    }

    pub fn options(&self) -> &ClientOptions {
        &self.options
    }

    /// Summed usage between two instants, reported per UTC calendar day.
    ///
    /// The instants are used as given; callers normalize them to day
    /// boundaries beforehand (see [`crate::date_range::DateRange`]).
    pub async fn get_usage(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> Result<UsageSummary> {
        if start > end {
            return Err(DashboardError::InvalidRange);
        }

        let project_id = self.resolve_project_id().await?;
        let start_date = start.format("%Y-%m-%d").to_string();
        let end_date = end.format("%Y-%m-%d").to_string();

        let url = self.endpoint_url(
            &["v1", "projects", project_id.as_str(), "usage"],
            Some(&format!("start={}&end={}", start_date, end_date)),
        )?;
        let usage: UsageResponse = self.get_json(&url, "Deepgram API Error").await?;

        let (requests_count, hours) = sum_usage(&usage.results);
        log::debug!(
            "DeepgramClient: usage {}..{}: {} requests, {:.3} hours over {} records",
            start_date,
            end_date,
            requests_count,
            hours,
            usage.results.len()
        );

        Ok(UsageSummary {
            requests_count,
            hours,
            start_date,
            end_date,
        })
    }

    /// One page of the requests log ending at `end`. Pages are zero-based and
    /// returned exactly as Deepgram orders them.
    pub async fn get_requests(&self, end: DateTime<Utc>, page: u32, limit: u32) -> Result<RequestPage> {
        if limit == 0 {
            return Err(DashboardError::InvalidLimit);
        }

        let project_id = self.resolve_project_id().await?;
        let url = self.endpoint_url(
            &["v1", "projects", project_id.as_str(), "requests"],
            Some(&format!(
                "end={}&page={}&limit={}",
                format_timestamp(end),
                page,
                limit
            )),
        )?;
        let requests: RequestPage = self.get_json(&url, "Deepgram API Error").await?;

        log::debug!(
            "DeepgramClient: requests page {} returned {} of limit {}",
            page,
            requests.requests.len(),
            limit
        );
        Ok(requests)
    }

    /// Full record for one request.
    pub async fn get_request_detail(&self, project_id: &str, request_id: &str) -> Result<RequestRecord> {
        let url = self.endpoint_url(&["v1", "projects", project_id, "requests", request_id], None)?;
        self.get_json(&url, "Deepgram API Error").await
    }

    /// Project the client operates against, looked up on every call.
    pub(crate) async fn resolve_project_id(&self) -> Result<String> {
        let url = self.endpoint_url(&["v1", "projects"], None)?;
        let listing: ProjectsResponse = self.get_json(&url, "Failed to get projects").await?;

        match &self.options.project {
            ProjectSelection::First => listing
                .projects
                .into_iter()
                .next()
                .map(|p| p.project_id)
                .ok_or(DashboardError::NoProjects),
            ProjectSelection::Id(wanted) => listing
                .projects
                .into_iter()
                .find(|p| p.project_id == *wanted)
                .map(|p| p.project_id)
                .ok_or_else(|| DashboardError::ProjectNotFound(wanted.clone())),
        }
    }

    /// Base URL plus `segments`, each percent-encoded as a single path segment.
    fn endpoint_url(&self, segments: &[&str], query: Option<&str>) -> Result<String> {
        if let Some(bad) = segments.iter().find(|s| matches!(**s, "" | "." | "..")) {
            return Err(DashboardError::InvalidId(bad.to_string()));
        }
        let invalid = || DashboardError::Settings(format!("Invalid API base URL {}", self.base_url));

        let mut url = Url::parse(&self.base_url).map_err(|_| invalid())?;
        url.path_segments_mut()
            .map_err(|_| invalid())?
            .pop_if_empty()
            .extend(segments);
        url.set_query(query);
        Ok(url.into())
    }

    fn headers(&self) -> Vec<(&'static str, String)> {
        let auth = match self.options.endpoint {
            ApiEndpoint::Proxy { .. } => ("x-api-key", self.credential.expose().to_string()),
            ApiEndpoint::Direct => (
                "Authorization",
                format!("Token {}", self.credential.expose()),
            ),
        };
        vec![auth, ("Content-Type", "application/json".to_string())]
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str, context: &'static str) -> Result<T> {
        let response = self.transport.get(url, &self.headers()).await?;

        if !response.is_success() {
            log::error!(
                "DeepgramClient: {} ({}): {}",
                context,
                response.status,
                response.body
            );
            return Err(DashboardError::Provider {
                context,
                status: response.status,
                status_text: response.status_text,
            });
        }

        serde_json::from_str(&response.body)
            .map_err(|e| DashboardError::MalformedResponse(e.to_string()))
    }
}

/// Total requests and hours across daily usage records.
pub fn sum_usage(records: &[UsageRecord]) -> (u64, f64) {
    records.iter().fold((0, 0.0), |(requests, hours), r| {
        (requests + r.requests, hours + r.total_hours)
    })
}

/// ISO-8601 in UTC with milliseconds, e.g. `2024-05-01T23:59:59.999Z`.
fn format_timestamp(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}
