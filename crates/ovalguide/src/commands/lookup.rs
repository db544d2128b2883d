use anyhow::Result;
use ovalguide_search::{build_service, Event, Key, SearchConfig, SearchSession};
use tracing::info;

/// Type `query` into a fresh session, let it settle, press Enter
pub async fn execute(query: String, config: &SearchConfig) -> Result<()> {
    let service = build_service(config)?;
    let mut session = SearchSession::from_config(service, config);

    info!(query = %query, endpoint = config.api_url.as_str(), "Looking up");

    session.dispatch(Event::Input(query));
    let route = match session.settle().await {
        Some(route) => Some(route),
        None => session.dispatch(Event::Key(Key::Enter)),
    };
    session.shutdown();

    if let Some(route) = route {
        println!("{}", route);
    }

    Ok(())
}
