//! Page navigation over the requests log.
//!
//! Page 0 holds the newest requests before the window end; higher pages go
//! further back. Deepgram never reports a page count, so "older" is only
//! offered after a full page.

use chrono::{DateTime, Utc};

use crate::date_range::RequestWindow;
use crate::deepgram::{RequestPage, DEFAULT_PAGE_LIMIT};
use crate::error::{DashboardError, Result};
use crate::session::DashboardSession;

#[derive(Debug, Clone)]
pub struct RequestsPager {
    end: DateTime<Utc>,
    page: u32,
    limit: u32,
    current: Option<RequestPage>,
}

impl RequestsPager {
    pub fn new(end: DateTime<Utc>) -> Self {
        Self {
            end,
            page: 0,
            limit: DEFAULT_PAGE_LIMIT,
            current: None,
        }
    }

    pub fn with_limit(end: DateTime<Utc>, limit: u32) -> Result<Self> {
        if limit == 0 {
            return Err(DashboardError::InvalidLimit);
        }
        Ok(Self {
            limit,
            ..Self::new(end)
        })
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    pub fn window(&self) -> RequestWindow {
        RequestWindow::ending_at(self.end)
    }

    /// The last loaded page, newest request first.
    pub fn current(&self) -> Option<&RequestPage> {
        self.current.as_ref()
    }

    /// Jump straight to `page` without checking that it exists.
    pub fn jump_to(&mut self, page: u32) {
        self.page = page;
        self.current = None;
    }

    /// Move the window to a new end instant and go back to the first page.
    pub fn set_end(&mut self, end: DateTime<Utc>) {
        self.end = end;
        self.page = 0;
        self.current = None;
    }

    /// Fetch the current page and sort it newest first.
    ///
    /// A failed load leaves no page loaded.
    pub async fn load(&mut self, session: &DashboardSession) -> Result<&RequestPage> {
        self.current = None;
        let mut page = session.requests(self.end, self.page, self.limit).await?;
        page.sort_newest_first();
        Ok(&*self.current.insert(page))
    }

    pub fn has_newer(&self) -> bool {
        self.page > 0
    }

    /// True only when the loaded page came back full and is not the last
    /// addressable page.
    pub fn has_older(&self) -> bool {
        self.page < u32::MAX
            && self
                .current
                .as_ref()
                .is_some_and(|page| page.requests.len() >= self.limit as usize)
    }

    /// Step to the next newer page. Returns false on page 0.
    pub fn newer(&mut self) -> bool {
        if !self.has_newer() {
            return false;
        }
        self.page -= 1;
        self.current = None;
        true
    }

    /// Step to the next older page. Returns false when the loaded page was
    /// not full.
    pub fn older(&mut self) -> bool {
        if !self.has_older() {
            return false;
        }
        let Some(next) = self.page.checked_add(1) else {
            return false;
        };
        self.page = next;
        self.current = None;
        true
    }
}
