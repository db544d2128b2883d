use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;

use super::provider::SearchService;
use crate::error::SearchError;
use crate::types::SearchHit;

const DEFAULT_MAX_AUTH_FAILURES: usize = 3;

/// Endpoint chain with auth fallback.
/// Tries endpoints in order; a 401/403 moves on to the next one, any other
/// failure is returned as-is. Endpoints that keep rejecting are skipped.
pub struct EndpointChain {
    endpoints: Vec<Arc<dyn SearchService>>,
    rejections: DashMap<String, usize>,
    max_auth_failures: usize,
}

impl EndpointChain {
    pub fn new(endpoints: Vec<Arc<dyn SearchService>>) -> Self {
        Self {
            endpoints,
            rejections: DashMap::new(),
            max_auth_failures: DEFAULT_MAX_AUTH_FAILURES,
        }
    }

    pub fn with_max_auth_failures(mut self, max: usize) -> Self {
        self.max_auth_failures = max.max(1);
        self
    }

    /// Endpoints still worth trying; the last endpoint is never skipped
    fn available_endpoints(&self) -> Vec<Arc<dyn SearchService>> {
        let last = self.endpoints.len().saturating_sub(1);
        self.endpoints
            .iter()
            .enumerate()
            .filter(|(i, e)| {
                *i == last
                    || self
                        .rejections
                        .get(e.endpoint())
                        .map(|count| *count < self.max_auth_failures)
                        .unwrap_or(true)
            })
            .map(|(_, e)| e.clone())
            .collect()
    }

    fn track_rejection(&self, endpoint: &str) {
        *self.rejections.entry(endpoint.to_string()).or_insert(0) += 1;
    }

    fn reset_rejections(&self, endpoint: &str) {
        self.rejections.remove(endpoint);
    }
}

#[async_trait]
impl SearchService for EndpointChain {
    async fn search(&self, query: &str) -> Result<Vec<SearchHit>, SearchError> {
        let available = self.available_endpoints();
        let mut last_error = None;

        for (i, endpoint) in available.iter().enumerate() {
            match endpoint.search(query).await {
                Ok(hits) => {
                    self.reset_rejections(endpoint.endpoint());
                    if i > 0 {
                        tracing::debug!(
                            endpoint = endpoint.endpoint(),
                            "Search served by fallback endpoint"
                        );
                    }
                    return Ok(hits);
                }
                Err(e) if e.is_auth_rejection() => {
                    tracing::debug!(
                        endpoint = endpoint.endpoint(),
                        error = %e,
                        "Search endpoint rejected credentials, trying next"
                    );
                    self.track_rejection(endpoint.endpoint());
                    last_error = Some(e);
                }
                Err(e) => return Err(e),
            }
        }

        Err(last_error.unwrap_or(SearchError::NoEndpoints))
    }

    fn endpoint(&self) -> &str {
        self.endpoints
            .first()
            .map(|e| e.endpoint())
            .unwrap_or("chain")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Endpoint answering with a fixed status (or hits), counting calls
    struct MockEndpoint {
        name: String,
        status: Option<u16>,
        calls: AtomicUsize,
    }

    impl MockEndpoint {
        fn ok(name: &str) -> Arc<Self> {
            Arc::new(Self {
                name: name.into(),
                status: None,
                calls: AtomicUsize::new(0),
            })
        }

        fn failing(name: &str, status: u16) -> Arc<Self> {
            Arc::new(Self {
                name: name.into(),
                status: Some(status),
                calls: AtomicUsize::new(0),
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl SearchService for MockEndpoint {
        async fn search(&self, query: &str) -> Result<Vec<SearchHit>, SearchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match self.status {
                Some(status) => Err(SearchError::Status {
                    status,
                    message: format!("{} failed", self.name),
                }),
                None => Ok(vec![SearchHit::class(query, &self.name, "", None)]),
            }
        }

        fn endpoint(&self) -> &str {
            &self.name
        }
    }

    #[tokio::test]
    async fn test_member_endpoint_preferred() {
        let member = MockEndpoint::ok("member");
        let public = MockEndpoint::ok("public");
        let chain = EndpointChain::new(vec![member.clone(), public.clone()]);

        let hits = chain.search("cs").await.unwrap();

        assert_eq!(hits[0].title(), "member");
        assert_eq!(public.calls(), 0);
    }

    #[tokio::test]
    async fn test_falls_back_on_unauthorized() {
        let member = MockEndpoint::failing("member", 401);
        let public = MockEndpoint::ok("public");
        let chain = EndpointChain::new(vec![member.clone(), public.clone()]);

        let hits = chain.search("cs").await.unwrap();

        assert_eq!(hits[0].title(), "public");
        assert_eq!(member.calls(), 1);
    }

    #[tokio::test]
    async fn test_non_auth_error_is_not_retried() {
        let member = MockEndpoint::failing("member", 500);
        let public = MockEndpoint::ok("public");
        let chain = EndpointChain::new(vec![member, public.clone()]);

        let err = chain.search("cs").await.unwrap_err();

        assert!(matches!(err, SearchError::Status { status: 500, .. }));
        assert_eq!(public.calls(), 0);
    }

    #[tokio::test]
    async fn test_repeatedly_rejecting_endpoint_is_skipped() {
        let member = MockEndpoint::failing("member", 403);
        let public = MockEndpoint::ok("public");
        let chain =
            EndpointChain::new(vec![member.clone(), public.clone()]).with_max_auth_failures(2);

        for _ in 0..4 {
            chain.search("cs").await.unwrap();
        }

        assert_eq!(member.calls(), 2);
        assert_eq!(public.calls(), 4);
    }

    #[tokio::test]
    async fn test_last_endpoint_rejection_is_returned() {
        let only = MockEndpoint::failing("only", 401);
        let chain = EndpointChain::new(vec![only]);

        let err = chain.search("cs").await.unwrap_err();
        assert!(err.is_auth_rejection());
    }

    #[tokio::test]
    async fn test_empty_chain() {
        let chain = EndpointChain::new(vec![]);
        assert_eq!(chain.search("cs").await.unwrap_err(), SearchError::NoEndpoints);
        assert_eq!(chain.endpoint(), "chain");
    }
}
