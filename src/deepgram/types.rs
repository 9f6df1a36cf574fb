//! Data structures for Deepgram usage and request logs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Treat an explicit `null` like a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// Aggregated usage for a date range, ready for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageSummary {
    /// Total number of API requests in the range
    pub requests_count: u64,
    /// Total hours of audio processed in the range
    pub hours: f64,
    /// First day of the range (YYYY-MM-DD, UTC)
    pub start_date: String,
    /// Last day of the range (YYYY-MM-DD, UTC)
    pub end_date: String,
}

/// A single logged API call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestRecord {
    pub request_id: String,
    /// RFC 3339 timestamp as reported by Deepgram
    pub created: String,
    pub path: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub api_key_id: String,
    /// Raw response payload; may embed its own `code`
    #[serde(default)]
    pub response: Value,
    #[serde(default, deserialize_with = "null_as_default")]
    pub code: u16,
    #[serde(default)]
    pub deployment: Option<String>,
    #[serde(default)]
    pub callback: Option<String>,
}

impl RequestRecord {
    /// Status code to display: the one embedded in the response payload when
    /// present and non-zero, otherwise the record's own `code`.
    pub fn status_code(&self) -> u16 {
        self.response
            .get("code")
            .and_then(Value::as_u64)
            .filter(|code| *code != 0)
            .and_then(|code| u16::try_from(code).ok())
            .unwrap_or(self.code)
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.code)
    }

    /// Parsed `created` timestamp, if it is valid RFC 3339.
    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(&self.created)
            .ok()
            .map(|dt| dt.with_timezone(&Utc))
    }
}

/// One page of the requests log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestPage {
    /// Zero-based page index
    pub page: u32,
    pub limit: u32,
    pub requests: Vec<RequestRecord>,
}

impl RequestPage {
    /// Sort requests by `created`, newest first. Records with an unparseable
    /// timestamp sink to the end in their original order.
    pub fn sort_newest_first(&mut self) {
        self.requests
            .sort_by_key(|r| std::cmp::Reverse(r.created_at()));
    }
}

// ============================================================================
// Deepgram API Response Types
// ============================================================================

/// Response from /v1/projects
#[derive(Debug, Deserialize)]
pub struct ProjectsResponse {
    pub projects: Vec<Project>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Project {
    pub project_id: String,
    #[serde(default)]
    pub name: Option<String>,
}

/// Response from /v1/projects/{id}/usage
#[derive(Debug, Deserialize)]
pub struct UsageResponse {
    pub results: Vec<UsageRecord>,
}

/// Daily usage aggregate.
#[derive(Debug, Clone, Deserialize)]
pub struct UsageRecord {
    #[serde(default)]
    pub start: Option<String>,
    #[serde(default)]
    pub end: Option<String>,
    #[serde(default)]
    pub hours: f64,
    #[serde(default)]
    pub total_hours: f64,
    #[serde(default)]
    pub requests: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(id: &str, created: &str) -> RequestRecord {
        RequestRecord {
            request_id: id.to_string(),
            created: created.to_string(),
            path: "/v1/listen".to_string(),
            api_key_id: "key".to_string(),
            response: Value::Null,
            code: 200,
            deployment: None,
            callback: None,
        }
    }

    #[test]
    fn status_code_prefers_embedded_response_code() {
        let mut r = record("a", "2024-05-01T10:00:00Z");
        r.response = json!({ "code": 400, "details": "bad audio" });
        assert_eq!(r.status_code(), 400);

        r.response = json!({ "code": 0 });
        assert_eq!(r.status_code(), 200);

        r.response = json!({ "duration": 1.2 });
        assert_eq!(r.status_code(), 200);
    }

    #[test]
    fn deserializes_record_with_missing_optional_fields() {
        let r: RequestRecord = serde_json::from_value(json!({
            "request_id": "req-1",
            "created": "2024-05-01T10:00:00.123Z",
            "path": "/v1/listen?model=nova-2",
            "code": 200,
            "deployment": null
        }))
        .unwrap();

        assert_eq!(r.api_key_id, "");
        assert!(r.deployment.is_none());
        assert!(r.callback.is_none());
        assert!(r.response.is_null());
        assert!(r.is_success());
    }

    #[test]
    fn sorts_newest_first_with_invalid_timestamps_last() {
        let mut page = RequestPage {
            page: 0,
            limit: 100,
            requests: vec![
                record("old", "2024-05-01T08:00:00Z"),
                record("bad", "not a date"),
                record("new", "2024-05-01T12:00:00.500Z"),
                record("mid", "2024-05-01T10:00:00Z"),
            ],
        };

        page.sort_newest_first();

        let ids: Vec<&str> = page.requests.iter().map(|r| r.request_id.as_str()).collect();
        assert_eq!(ids, vec!["new", "mid", "old", "bad"]);
    }

    #[test]
    fn null_code_and_key_id_fall_back_to_defaults() {
        let r: RequestRecord = serde_json::from_value(json!({
            "request_id": "req-2",
            "created": "2024-05-01T10:00:00Z",
            "path": "/v1/listen",
            "api_key_id": null,
            "response": null,
            "code": null
        }))
        .unwrap();

        assert_eq!(r.api_key_id, "");
        assert_eq!(r.code, 0);
        assert_eq!(r.status_code(), 0);
        assert!(!r.is_success());
    }

    #[test]
    fn usage_summary_serializes_camel_case() {
        let summary = UsageSummary {
            requests_count: 5,
            hours: 2.0,
            start_date: "2024-05-01".to_string(),
            end_date: "2024-05-07".to_string(),
        };
        let value = serde_json::to_value(&summary).unwrap();
        assert_eq!(value["requestsCount"], 5);
        assert_eq!(value["startDate"], "2024-05-01");
    }
}
