pub mod failover;
pub mod http;
pub mod provider;

use std::sync::Arc;

use anyhow::Result;

use crate::config::SearchConfig;

pub use failover::EndpointChain;
pub use http::{error_message, HttpSearchService};
pub use provider::SearchService;

/// Build the Search Service client from config.
/// With a member endpoint configured, it is tried first and the public one is the fallback.
pub fn build_service(config: &SearchConfig) -> Result<Arc<dyn SearchService>> {
    config.validate()?;

    let public = HttpSearchService::new(
        &config.api_url,
        &config.search_path,
        config.request_timeout(),
        config.connect_timeout(),
    )?;

    let Some(ref member_path) = config.member_search_path else {
        return Ok(Arc::new(public));
    };

    let mut member = HttpSearchService::new(
        &config.api_url,
        member_path,
        config.request_timeout(),
        config.connect_timeout(),
    )?;
    if let Some(ref token) = config.auth_token {
        member = member.with_auth_token(token);
    }

    tracing::debug!(
        member = member.url(),
        public = public.url(),
        "Using member search endpoint with public fallback"
    );

    Ok(Arc::new(
        EndpointChain::new(vec![Arc::new(member), Arc::new(public)])
            .with_max_auth_failures(config.max_auth_failures),
    ))
}
