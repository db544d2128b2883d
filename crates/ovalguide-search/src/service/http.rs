use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::header::ACCEPT;
use reqwest::{Client, ClientBuilder};
use serde_json::Value;

use super::provider::SearchService;
use crate::error::SearchError;
use crate::types::{parse_search_response, SearchHit};

const MAX_ERROR_MESSAGE_LEN: usize = 200;

/// Search Service client speaking `GET {api_url}{path}?q=...`
pub struct HttpSearchService {
    client: Client,
    url: String,
    auth_token: Option<String>,
}

impl HttpSearchService {
    pub fn new(
        api_url: &str,
        path: &str,
        request_timeout: Duration,
        connect_timeout: Duration,
    ) -> Result<Self> {
        let client = ClientBuilder::new()
            .timeout(request_timeout)
            .connect_timeout(connect_timeout)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self {
            client,
            url: join_url(api_url, path),
            auth_token: None,
        })
    }

    pub fn with_auth_token(mut self, token: &str) -> Self {
        self.auth_token = Some(token.to_string());
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl SearchService for HttpSearchService {
    async fn search(&self, query: &str) -> Result<Vec<SearchHit>, SearchError> {
        let mut request = self
            .client
            .get(&self.url)
            .query(&[("q", query)])
            .header(ACCEPT, "application/json");

        if let Some(ref token) = self.auth_token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let fallback = status.canonical_reason().unwrap_or("request failed");
            return Err(SearchError::Status {
                status: status.as_u16(),
                message: error_message(&body, fallback),
            });
        }

        let body = response.bytes().await?;
        parse_search_response(&body)
    }

    fn endpoint(&self) -> &str {
        &self.url
    }
}

fn join_url(api_url: &str, path: &str) -> String {
    format!(
        "{}/{}",
        api_url.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

/// Best human-readable message from an error body.
///
/// Checks `detail`, `message`, `error`, then the first string in `errors`;
/// plain-text bodies are used verbatim (truncated).
pub fn error_message(body: &str, fallback: &str) -> String {
    match serde_json::from_str::<Value>(body) {
        Ok(Value::String(text)) => text,
        Ok(Value::Object(map)) => ["detail", "message", "error"]
            .iter()
            .find_map(|key| map.get(*key).and_then(Value::as_str))
            .or_else(|| {
                map.get("errors")
                    .and_then(Value::as_array)
                    .and_then(|errors| errors.first())
                    .and_then(Value::as_str)
            })
            .unwrap_or(fallback)
            .to_string(),
        Ok(_) => fallback.to_string(),
        Err(_) => {
            let text = body.trim();
            if text.is_empty() {
                fallback.to_string()
            } else {
                text.chars().take(MAX_ERROR_MESSAGE_LEN).collect()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_url_handles_slashes() {
        assert_eq!(
            join_url("http://localhost:8080/", "/api/search"),
            "http://localhost:8080/api/search"
        );
        assert_eq!(
            join_url("http://localhost:8080", "api/search"),
            "http://localhost:8080/api/search"
        );
    }

    #[test]
    fn test_error_message_field_precedence() {
        assert_eq!(
            error_message(r#"{"detail": "d", "message": "m"}"#, "x"),
            "d"
        );
        assert_eq!(error_message(r#"{"message": "m", "error": "e"}"#, "x"), "m");
        assert_eq!(error_message(r#"{"error": "e"}"#, "x"), "e");
        assert_eq!(
            error_message(r#"{"errors": ["first", "second"]}"#, "x"),
            "first"
        );
    }

    #[test]
    fn test_error_message_fallbacks() {
        assert_eq!(error_message(r#""plain json string""#, "x"), "plain json string");
        assert_eq!(error_message(r#"{"errors": [1]}"#, "Bad Request"), "Bad Request");
        assert_eq!(error_message("", "Not Found"), "Not Found");
        assert_eq!(error_message("  upstream down  ", "x"), "upstream down");
        assert_eq!(error_message(&"z".repeat(500), "x").len(), MAX_ERROR_MESSAGE_LEN);
    }

    #[test]
    fn test_client_url() {
        let service = HttpSearchService::new(
            "http://localhost:8080",
            "/api/search",
            Duration::from_secs(1),
            Duration::from_secs(1),
        )
        .unwrap();
        assert_eq!(service.url(), "http://localhost:8080/api/search");
        assert_eq!(service.endpoint(), service.url());
    }
}
