use anyhow::Result;
use std::path::Path;

use crate::config::expand_path;

const DEFAULT_CONFIG: &str = r#"# The Oval Guide search configuration

[search]
# Backend hosting GET /api/search?q=...
api_url = "http://localhost:8080"
search_path = "/api/search"

# Member endpoint tried first; 401/403 falls back to search_path.
# member_search_path = "/api/auth/search"
# auth_token = ""            # or set OVALGUIDE_TOKEN

min_chars = 3
debounce_ms = 400
request_timeout_secs = 10
connect_timeout_secs = 5
max_auth_failures = 3
"#;

/// Initialize a new config file
pub fn run_init(path: &Path) -> Result<()> {
    let path = expand_path(path);
    if path.exists() {
        anyhow::bail!("Config already exists at {:?}", path);
    }
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(&path, DEFAULT_CONFIG)?;
    println!("Created config at {:?}", path);
    Ok(())
}
