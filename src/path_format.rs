//! Display helpers for request paths shown in the requests table.

use serde::Serialize;

/// Paths longer than this are shortened for display.
const MAX_PATH_LENGTH: usize = 40;

/// How far past the midpoint a slash may sit and still be used as the cut.
const SLASH_SEARCH_WINDOW: usize = 10;

/// Shortened path for a table cell plus the full path for its tooltip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormattedPath {
    pub display_path: String,
    pub tooltip: String,
}

/// Base path, its segments and decoded query parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PathComponents {
    pub base_path: String,
    pub segments: Vec<String>,
    pub query_params: QueryParams,
}

/// Query parameters in first-occurrence order.
///
/// Repeated keys are folded into one entry whose value joins every
/// occurrence with `", "`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct QueryParams(Vec<(String, String)>);

impl QueryParams {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    fn append(&mut self, key: String, value: String) {
        match self.0.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => {
                existing.push_str(", ");
                existing.push_str(&value);
            }
            None => self.0.push((key, value)),
        }
    }
}

/// Shorten a long API path for display, preferring to cut just after a
/// slash near the middle.
pub fn format_api_path(path: &str) -> FormattedPath {
    let chars: Vec<char> = path.chars().collect();
    let len = chars.len();

    let display_path = if len <= MAX_PATH_LENGTH {
        path.to_string()
    } else {
        let half = MAX_PATH_LENGTH / 2;
        let midpoint = len / 2;
        let tail: String = chars[len - half..].iter().collect();

        let slash = chars[midpoint..]
            .iter()
            .position(|c| *c == '/')
            .map(|offset| midpoint + offset)
            .filter(|pos| *pos < midpoint + SLASH_SEARCH_WINDOW);

        let head: String = match slash {
            Some(pos) => chars[..=pos].iter().collect(),
            None => chars[..half].iter().collect(),
        };
        format!("{}...{}", head, tail)
    };

    FormattedPath {
        display_path,
        tooltip: path.to_string(),
    }
}

/// Split a request path into its segments and decoded query parameters.
pub fn parse_path_components(path: &str) -> PathComponents {
    let (base_path, query) = match path.split_once('?') {
        Some((base, query)) => (base, Some(query)),
        None => (path, None),
    };

    let segments = base_path
        .split('/')
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect();

    let mut query_params = QueryParams::default();
    if let Some(query) = query {
        for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
            query_params.append(key.into_owned(), value.into_owned());
        }
    }

    PathComponents {
        base_path: base_path.to_string(),
        segments,
        query_params,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_path_is_unchanged() {
        let formatted = format_api_path("/v1/short");
        assert_eq!(formatted.display_path, "/v1/short");
        assert_eq!(formatted.tooltip, "/v1/short");
    }

    #[test]
    fn path_of_exactly_forty_chars_is_unchanged() {
        let path = format!("/{}", "a".repeat(39));
        assert_eq!(format_api_path(&path).display_path, path);
    }

    #[test]
    fn long_path_without_nearby_slash_truncates_middle() {
        let path = "/v1/projects/abcdefghijklmnopqrstuvwxyz0123456789/requests";
        let formatted = format_api_path(path);

        assert_eq!(formatted.tooltip, path);
        assert!(formatted.display_path.len() <= 20 + 3 + 20);
        assert!(formatted.display_path.ends_with(&path[path.len() - 20..]));
        assert_eq!(formatted.display_path, "/v1/projects/abcdefg...z0123456789/requests");
    }

    #[test]
    fn long_path_cuts_after_slash_near_midpoint() {
        // 50 chars, midpoint 25, slash at index 27
        let path = format!("/{}/{}", "a".repeat(26), "b".repeat(22));
        assert_eq!(path.len(), 50);

        let formatted = format_api_path(&path);
        let expected = format!("{}...{}", &path[..28], &path[30..]);
        assert_eq!(formatted.display_path, expected);
    }

    #[test]
    fn slash_too_far_past_midpoint_is_ignored() {
        // 60 chars, midpoint 30, first slash after it at index 45
        let path = format!("/{}/{}", "a".repeat(44), "b".repeat(14));
        assert_eq!(path.len(), 60);

        let formatted = format_api_path(&path);
        let expected = format!("{}...{}", &path[..20], &path[40..]);
        assert_eq!(formatted.display_path, expected);
    }

    #[test]
    fn non_ascii_paths_are_measured_in_chars() {
        // 31 chars but 61 bytes
        let short = format!("/{}", "é".repeat(30));
        assert_eq!(format_api_path(&short).display_path, short);

        let long = format!("/v1/{}", "é".repeat(40));
        let formatted = format_api_path(&long);
        assert_eq!(
            formatted.display_path,
            format!("/v1/{}...{}", "é".repeat(16), "é".repeat(20))
        );
        assert_eq!(formatted.tooltip, long);
    }

    #[test]
    fn parses_segments_and_repeated_query_keys() {
        let parsed = parse_path_components("/a/b?x=1&x=2&y=3");

        assert_eq!(parsed.base_path, "/a/b");
        assert_eq!(parsed.segments, vec!["a", "b"]);
        assert_eq!(parsed.query_params.get("x"), Some("1, 2"));
        assert_eq!(parsed.query_params.get("y"), Some("3"));

        let keys: Vec<&str> = parsed.query_params.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["x", "y"]);
    }

    #[test]
    fn decodes_query_values() {
        let parsed =
            parse_path_components("/v1/listen?model=nova-2&callback=https%3A%2F%2Fexample.com%2Fhook");
        assert_eq!(
            parsed.query_params.get("callback"),
            Some("https://example.com/hook")
        );
    }

    #[test]
    fn path_without_query_has_no_params() {
        let parsed = parse_path_components("//v1//listen/");
        assert_eq!(parsed.base_path, "//v1//listen/");
        assert_eq!(parsed.segments, vec!["v1", "listen"]);
        assert!(parsed.query_params.is_empty());
    }

    #[test]
    fn key_without_value_maps_to_empty_string() {
        let parsed = parse_path_components("/v1/listen?punctuate&diarize=true");
        assert_eq!(parsed.query_params.get("punctuate"), Some(""));
        assert_eq!(parsed.query_params.get("diarize"), Some("true"));
        assert_eq!(parsed.query_params.len(), 2);
    }
}
