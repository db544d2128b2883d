use anyhow::{Context, Result};
use ovalguide_search::SearchConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::cli::Cli;

const API_URL_ENV: &str = "OVALGUIDE_API_URL";
const TOKEN_ENV: &str = "OVALGUIDE_TOKEN";

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub search: SearchConfig,
}

impl Config {
    /// Apply environment variables, then command-line overrides
    pub fn apply_overrides(&mut self, cli: &Cli) {
        self.apply_env(|key| std::env::var(key).ok());
        self.apply_cli(cli);
    }

    /// Non-empty values from `lookup` replace whatever the file set
    fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let set = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        if let Some(url) = set(API_URL_ENV) {
            self.search.api_url = url;
        }
        if let Some(token) = set(TOKEN_ENV) {
            self.search.auth_token = Some(token);
        }
    }

    fn apply_cli(&mut self, cli: &Cli) {
        if let Some(ref url) = cli.api_url {
            self.search.api_url = url.clone();
        }
        if let Some(min_chars) = cli.min_chars {
            self.search.min_chars = min_chars;
        }
        if let Some(debounce_ms) = cli.debounce_ms {
            self.search.debounce_ms = debounce_ms;
        }
    }
}

/// Expand `~` in a user-supplied path
pub fn expand_path(path: &Path) -> PathBuf {
    PathBuf::from(shellexpand::tilde(&path.to_string_lossy()).into_owned())
}

/// Load config from file or use defaults.
/// Not validated here: overrides may still repair it.
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    let Some(path) = path else {
        return Ok(Config::default());
    };

    let path = expand_path(path);
    let content =
        fs::read_to_string(&path).context(format!("Failed to read config file: {:?}", path))?;

    toml::from_str(&content).context("Failed to parse TOML config")
}
