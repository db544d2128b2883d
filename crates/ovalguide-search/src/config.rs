use std::time::Duration;

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

/// Search client settings, the `[search]` table of `ovalguide.toml`
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct SearchConfig {
    /// Base URL of the backend hosting the Search Service
    #[serde(default = "default_api_url")]
    pub api_url: String,

    #[serde(default = "default_search_path")]
    pub search_path: String,

    /// Member endpoint tried before `search_path`, e.g. "/api/auth/search"
    #[serde(default)]
    pub member_search_path: Option<String>,

    /// Bearer token sent to the member endpoint
    #[serde(default)]
    pub auth_token: Option<String>,

    #[serde(default = "default_min_chars")]
    pub min_chars: usize,

    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,

    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,

    /// Consecutive 401/403 answers before the member endpoint is skipped
    #[serde(default = "default_max_auth_failures")]
    pub max_auth_failures: usize,
}

fn default_api_url() -> String {
    "http://localhost:8080".to_string()
}

fn default_search_path() -> String {
    "/api/search".to_string()
}

fn default_min_chars() -> usize {
    3
}

fn default_debounce_ms() -> u64 {
    400
}

fn default_request_timeout() -> u64 {
    10
}

fn default_connect_timeout() -> u64 {
    5
}

fn default_max_auth_failures() -> usize {
    3
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            search_path: default_search_path(),
            member_search_path: None,
            auth_token: None,
            min_chars: default_min_chars(),
            debounce_ms: default_debounce_ms(),
            request_timeout_secs: default_request_timeout(),
            connect_timeout_secs: default_connect_timeout(),
            max_auth_failures: default_max_auth_failures(),
        }
    }
}

impl SearchConfig {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn validate(&self) -> Result<()> {
        if self.api_url.trim().is_empty() {
            bail!("search.api_url must not be empty");
        }
        if self.min_chars == 0 {
            bail!("search.min_chars must be at least 1");
        }
        if !self.search_path.starts_with('/') {
            bail!("search.search_path must start with '/': {}", self.search_path);
        }
        if let Some(ref member) = self.member_search_path {
            if !member.starts_with('/') {
                bail!("search.member_search_path must start with '/': {}", member);
            }
        }
        Ok(())
    }
}
