use thiserror::Error;

/// Failure taxonomy for a single search lookup.
///
/// Every variant is handled identically by the session (empty results,
/// closed dropdown). Cancellation is not a variant: a superseded
/// request is dropped, never reported.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SearchError {
    #[error("search request failed: {0}")]
    Transport(String),

    #[error("search service returned {status}: {message}")]
    Status { status: u16, message: String },

    #[error("search response did not match expected shape: {0}")]
    Schema(String),

    #[error("no search endpoint available")]
    NoEndpoints,
}

impl SearchError {
    /// 401/403 from the service, the signal to fall back to a public endpoint
    pub fn is_auth_rejection(&self) -> bool {
        matches!(self, SearchError::Status { status: 401 | 403, .. })
    }
}

impl From<reqwest::Error> for SearchError {
    fn from(err: reqwest::Error) -> Self {
        SearchError::Transport(err.to_string())
    }
}
