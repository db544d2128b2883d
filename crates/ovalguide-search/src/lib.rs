pub mod config;
pub mod error;
pub mod render;
pub mod route;
pub mod service;
pub mod session;
pub mod state;
pub mod types;

pub use config::SearchConfig;
pub use error::SearchError;
pub use render::{badge, DropdownView, HitRow};
pub use route::{encode_segment, looks_like_class_code, normalize_class_code, resolve_submit, Route};
pub use service::{build_service, EndpointChain, HttpSearchService, SearchService};
pub use session::SearchSession;
pub use state::{Effect, Event, Key, RequestToken, SearchState};
pub use types::{parse_search_response, HitKind, SearchHit, SearchResponse};

/// Initialize structured JSON logging (stderr, so terminal output stays clean)
pub fn init_logging() {
    use tracing_subscriber::{fmt, EnvFilter};

    fmt()
        .json()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::from_default_env())
        .init();
}
