//! Day-boundary helpers for usage ranges and the requests window.
//!
//! All boundaries are UTC: a usage query covers whole calendar days, from
//! 00:00:00.000 on the first day to 23:59:59.999 on the last.

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use serde::Serialize;

use crate::error::{DashboardError, Result};

/// Length of the default usage range ending today.
pub const DEFAULT_RANGE_DAYS: i64 = 7;

/// Span covered by one requests view.
pub const REQUEST_WINDOW_HOURS: i64 = 24;

pub fn start_of_day(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc()
}

pub fn end_of_day(date: NaiveDate) -> DateTime<Utc> {
    start_of_day(date) + Duration::days(1) - Duration::milliseconds(1)
}

/// Inclusive range of instants handed to the usage query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl DateRange {
    /// Whole days from `from` through `to`.
    pub fn for_days(from: NaiveDate, to: NaiveDate) -> Result<Self> {
        if from > to {
            return Err(DashboardError::InvalidRange);
        }
        Ok(Self {
            start: start_of_day(from),
            end: end_of_day(to),
        })
    }

    /// A single picked day. Both bounds sit at the end of that day, so the
    /// usage query covers exactly that calendar date.
    pub fn single_day(date: NaiveDate) -> Self {
        let end = end_of_day(date);
        Self { start: end, end }
    }

    /// The last `days` days up to and including `today`.
    pub fn last_days(days: i64, today: NaiveDate) -> Self {
        let from = today - Duration::days(days.max(0));
        Self {
            start: start_of_day(from),
            end: end_of_day(today),
        }
    }
}

/// The 24 hours of requests shown for a chosen end instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RequestWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl RequestWindow {
    pub fn ending_at(end: DateTime<Utc>) -> Self {
        Self {
            start: end - Duration::hours(REQUEST_WINDOW_HOURS),
            end,
        }
    }
}
