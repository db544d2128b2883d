use async_trait::async_trait;

use crate::error::SearchError;
use crate::types::SearchHit;

/// Search Service trait - abstraction over the HTTP backend, endpoint chains and test doubles
#[async_trait]
pub trait SearchService: Send + Sync {
    /// Look up a trimmed query, returning hits in service ranking order
    async fn search(&self, query: &str) -> Result<Vec<SearchHit>, SearchError>;

    /// Endpoint description for logging
    fn endpoint(&self) -> &str;
}
