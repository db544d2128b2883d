use serde::{Deserialize, Serialize};

use crate::error::SearchError;

/// Which page a hit links to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HitKind {
    Professor,
    Class,
}

impl HitKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            HitKind::Professor => "professor",
            HitKind::Class => "class",
        }
    }
}

/// One ranked entry returned by the Search Service.
///
/// Tagged on the wire by `kind`. Ratings may be absent or `null`; unknown
/// extra fields are ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum SearchHit {
    Professor {
        /// Professor slug
        id: String,
        title: String,
        subtitle: String,
        #[serde(default)]
        overall: Option<f64>,
    },
    Class {
        /// Course code, e.g. "CS 2201"
        id: String,
        title: String,
        subtitle: String,
        #[serde(default)]
        difficulty: Option<f64>,
    },
}

impl SearchHit {
    pub fn professor(id: &str, title: &str, subtitle: &str, overall: Option<f64>) -> Self {
        SearchHit::Professor {
            id: id.to_string(),
            title: title.to_string(),
            subtitle: subtitle.to_string(),
            overall,
        }
    }

    pub fn class(id: &str, title: &str, subtitle: &str, difficulty: Option<f64>) -> Self {
        SearchHit::Class {
            id: id.to_string(),
            title: title.to_string(),
            subtitle: subtitle.to_string(),
            difficulty,
        }
    }

    pub fn kind(&self) -> HitKind {
        match self {
            SearchHit::Professor { .. } => HitKind::Professor,
            SearchHit::Class { .. } => HitKind::Class,
        }
    }

    pub fn id(&self) -> &str {
        match self {
            SearchHit::Professor { id, .. } | SearchHit::Class { id, .. } => id,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            SearchHit::Professor { title, .. } | SearchHit::Class { title, .. } => title,
        }
    }

    pub fn subtitle(&self) -> &str {
        match self {
            SearchHit::Professor { subtitle, .. } | SearchHit::Class { subtitle, .. } => subtitle,
        }
    }

    /// The kind-specific rating: overall score for professors, difficulty for classes
    pub fn metric(&self) -> Option<f64> {
        match self {
            SearchHit::Professor { overall, .. } => *overall,
            SearchHit::Class { difficulty, .. } => *difficulty,
        }
    }

    fn check(&self) -> Result<(), SearchError> {
        match self.metric() {
            Some(value) if !value.is_finite() => Err(SearchError::Schema(format!(
                "{} '{}' has a non-finite rating",
                self.kind().as_str(),
                self.id()
            ))),
            _ => Ok(()),
        }
    }
}

/// Body of `GET /api/search`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse {
    pub items: Vec<SearchHit>,
}

/// Parse and validate a Search Service body into an ordered result set.
///
/// Any shape mismatch is reported as [`SearchError::Schema`]; the order of
/// `items` is preserved exactly.
pub fn parse_search_response(body: &[u8]) -> Result<Vec<SearchHit>, SearchError> {
    let response: SearchResponse =
        serde_json::from_slice(body).map_err(|e| SearchError::Schema(e.to_string()))?;

    for hit in &response.items {
        hit.check()?;
    }

    Ok(response.items)
}
