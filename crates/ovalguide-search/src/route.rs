use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

use crate::types::SearchHit;

static CLASS_CODE_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z]+\s*[0-9]").expect("static regex"));

static CLASS_CODE_PARTS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)^([a-zA-Z]+)\s*([0-9].*)$").expect("static regex"));

/// Navigation target handed to the host router.
///
/// Holds the raw (decoded) identifier; encoding happens in [`Route::path`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Professor(String),
    Class(String),
    Search(String),
}

impl Route {
    pub fn for_hit(hit: &SearchHit) -> Self {
        match hit {
            SearchHit::Professor { id, .. } => Route::Professor(id.clone()),
            SearchHit::Class { id, .. } => Route::Class(id.clone()),
        }
    }

    pub fn path(&self) -> String {
        match self {
            Route::Professor(id) => format!("/professors/{}", encode_segment(id)),
            Route::Class(id) => format!("/classes/{}", encode_segment(id)),
            Route::Search(query) => format!("/search?q={}", encode_segment(query)),
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

/// Percent-encode a path segment without double-encoding.
///
/// Input that is already percent-encoded is decoded once first; input that
/// fails to decode is encoded as-is. Same reserved set as a browser's
/// `encodeURIComponent`: `! ' ( ) *` stay literal.
pub fn encode_segment(raw: &str) -> String {
    let source = match urlencoding::decode(raw) {
        Ok(decoded) if decoded.as_ref() != raw => decoded.into_owned(),
        _ => raw.to_string(),
    };

    URI_COMPONENT_MARKS
        .iter()
        .fold(urlencoding::encode(&source).into_owned(), |encoded, (escape, mark)| {
            encoded.replace(escape, mark)
        })
}

const URI_COMPONENT_MARKS: [(&str, &str); 5] = [
    ("%21", "!"),
    ("%27", "'"),
    ("%28", "("),
    ("%29", ")"),
    ("%2A", "*"),
];

/// Letters, optional whitespace, then a digit ("cs2201", "CS 2201 intro")
pub fn looks_like_class_code(input: &str) -> bool {
    CLASS_CODE_PREFIX.is_match(input.trim())
}

/// "cs2201" -> "CS 2201", "Math   101" -> "MATH 101"
pub fn normalize_class_code(input: &str) -> String {
    let trimmed = input.trim();
    CLASS_CODE_PARTS
        .replace(trimmed, "$1 $2")
        .to_uppercase()
}

/// Resolve an explicit submit into a destination.
///
/// Order: the active hit, then a course-code shaped query, then the
/// generic results page once the query reaches `min_chars`.
pub fn resolve_submit(query: &str, active: Option<&SearchHit>, min_chars: usize) -> Option<Route> {
    if let Some(hit) = active {
        return Some(Route::for_hit(hit));
    }

    let trimmed = query.trim();
    if looks_like_class_code(trimmed) {
        Some(Route::Class(normalize_class_code(trimmed)))
    } else if trimmed.chars().count() >= min_chars {
        Some(Route::Search(trimmed.to_string()))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_paths() {
        assert_eq!(
            Route::Professor("jordan-harper".into()).path(),
            "/professors/jordan-harper"
        );
        assert_eq!(Route::Class("CS 2201".into()).path(), "/classes/CS%202201");
        assert_eq!(
            Route::Search("data structures".into()).to_string(),
            "/search?q=data%20structures"
        );
    }

    #[test]
    fn test_encode_segment_avoids_double_encoding() {
        assert_eq!(encode_segment("CS 2201"), "CS%202201");
        assert_eq!(encode_segment("CS%202201"), "CS%202201");
        assert_eq!(encode_segment("a/b?c"), "a%2Fb%3Fc");
    }

    #[test]
    fn test_encode_segment_leaves_uri_marks() {
        assert_eq!(encode_segment("o'brien"), "o'brien");
        assert_eq!(encode_segment("intro (honors)!*"), "intro%20(honors)!*");
        assert_eq!(encode_segment("o%27brien"), "o'brien");
        assert_eq!(
            Route::Professor("o'brien".into()).path(),
            "/professors/o'brien"
        );
    }

    #[test]
    fn test_encode_segment_keeps_malformed_escapes() {
        assert_eq!(encode_segment("100%"), "100%25");
        assert_eq!(encode_segment("%FF"), "%25FF");
    }

    #[test]
    fn test_class_code_detection() {
        assert!(looks_like_class_code("cs2201"));
        assert!(looks_like_class_code("  CS 2201 "));
        assert!(looks_like_class_code("math 101 honors"));
        assert!(!looks_like_class_code("data structures"));
        assert!(!looks_like_class_code("2201"));
        assert!(!looks_like_class_code("ada lovelace"));
    }

    #[test]
    fn test_normalize_class_code() {
        assert_eq!(normalize_class_code("cs2201"), "CS 2201");
        assert_eq!(normalize_class_code(" Math   101 "), "MATH 101");
        assert_eq!(normalize_class_code("cs 2201 honors"), "CS 2201 HONORS");
    }

    #[test]
    fn test_submit_prefers_active_hit() {
        let hit = SearchHit::professor("ada", "Ada Lovelace", "Math", Some(4.9));
        assert_eq!(
            resolve_submit("cs2201", Some(&hit), 3),
            Some(Route::Professor("ada".into()))
        );
    }

    #[test]
    fn test_submit_class_code_without_results() {
        let route = resolve_submit("cs2201", None, 3).unwrap();
        assert_eq!(route, Route::Class("CS 2201".into()));
        assert_eq!(route.path(), "/classes/CS%202201");
    }

    #[test]
    fn test_submit_free_text_goes_to_search_page() {
        let route = resolve_submit("data structures", None, 3).unwrap();
        assert_eq!(route.path(), "/search?q=data%20structures");
    }

    #[test]
    fn test_submit_below_threshold_does_nothing() {
        assert_eq!(resolve_submit("  ab ", None, 3), None);
        assert_eq!(resolve_submit("", None, 3), None);
    }
}
