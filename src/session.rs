//! Dashboard session: the credential lifecycle plus the data operations.
//!
//! A session starts without a client. `initialize` builds one from a
//! credential, `reset` drops it again. Data operations before `initialize`
//! fail with [`DashboardError::Uninitialized`] and never touch the network.

use chrono::{DateTime, Utc};
use std::sync::Arc;

use crate::credential::Credential;
use crate::date_range::DateRange;
use crate::deepgram::{
    ClientOptions, DeepgramClient, HttpTransport, RequestPage, RequestRecord, UsageSummary,
};
use crate::error::{DashboardError, Result};

pub struct DashboardSession {
    options: ClientOptions,
    transport: Option<Arc<dyn HttpTransport>>,
    client: Option<DeepgramClient>,
}

impl DashboardSession {
    pub fn new(options: ClientOptions) -> Self {
        Self {
            options,
            transport: None,
            client: None,
        }
    }

    /// Session whose clients all share `transport` instead of building their own.
    pub fn with_transport(options: ClientOptions, transport: Arc<dyn HttpTransport>) -> Self {
        Self {
            options,
            transport: Some(transport),
            client: None,
        }
    }

    /// Store `credential` for all later calls. Blank keys are refused; any
    /// other key is accepted as-is and only checked by the first request.
    pub fn initialize(&mut self, credential: Credential) -> Result<()> {
        if credential.is_blank() {
            return Err(DashboardError::Initialization(
                "API key must not be empty".to_string(),
            ));
        }

        let client = match &self.transport {
            Some(transport) => {
                DeepgramClient::with_transport(credential, self.options.clone(), transport.clone())
            }
            None => DeepgramClient::initialize(credential, self.options.clone())?,
        };
        self.client = Some(client);
        Ok(())
    }

    /// Initialize from `DEEPGRAM_API_KEY` when it is set. Returns whether a
    /// key was found.
    pub fn initialize_from_env(&mut self) -> Result<bool> {
        match Credential::from_env() {
            Some(credential) => {
                self.initialize(credential)?;
                log::info!("Session: API key loaded from environment");
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Forget the credential.
    pub fn reset(&mut self) {
        if self.client.take().is_some() {
            log::info!("Session: API key cleared");
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.client.is_some()
    }

    pub fn client(&self) -> Result<&DeepgramClient> {
        self.client.as_ref().ok_or(DashboardError::Uninitialized)
    }

    pub async fn usage(&self, range: &DateRange) -> Result<UsageSummary> {
        self.client()?.get_usage(range.start, range.end).await
    }

    pub async fn requests(&self, end: DateTime<Utc>, page: u32, limit: u32) -> Result<RequestPage> {
        self.client()?.get_requests(end, page, limit).await
    }

    /// Detail for a request of the session's project.
    pub async fn request_detail(&self, request_id: &str) -> Result<RequestRecord> {
        let client = self.client()?;
        let project_id = client.resolve_project_id().await?;
        client.get_request_detail(&project_id, request_id).await
    }
}
