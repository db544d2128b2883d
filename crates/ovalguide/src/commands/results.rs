use anyhow::Result;
use ovalguide_search::{badge, build_service, Route, SearchConfig};
use tracing::warn;

/// Full result list for a query, like the search results page
pub async fn execute(query: String, config: &SearchConfig) -> Result<()> {
    let query = query.trim();
    if query.is_empty() {
        println!("No results found.");
        return Ok(());
    }

    let service = build_service(config)?;

    let hits = match service.search(query).await {
        Ok(hits) => hits,
        Err(e) => {
            warn!(query, error = %e, "Search results unavailable");
            Vec::new()
        }
    };

    if hits.is_empty() {
        println!("No results found.");
        return Ok(());
    }

    println!("Search results for \u{201c}{}\u{201d}\n", query);
    for hit in &hits {
        let route = Route::for_hit(hit);
        match badge(hit) {
            Some(badge) => println!("  {} [{}]", hit.title(), badge),
            None => println!("  {}", hit.title()),
        }
        println!("    {}  {}", hit.subtitle(), route);
    }

    Ok(())
}
