//! Reading saved search results.

use std::path::Path;

use anyhow::{Context, Result};
use route_core::Route;

/// Parse saved results: either a bare array of routes or a full search
/// response body with a `routes` field.
pub fn parse_routes(body: &str) -> Result<Vec<Route>> {
    let value: serde_json::Value = serde_json::from_str(body).context("Malformed json")?;
    if value.is_array() {
        return serde_json::from_value(value).context("Malformed route list");
    }
    route_client::parse_search_response(body)
}

pub fn load_routes(path: &Path) -> Result<Vec<Route>> {
    let body = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    let routes = parse_routes(&body).with_context(|| format!("parsing {}", path.display()))?;
    tracing::debug!(path = %path.display(), count = routes.len(), "loaded routes");
    Ok(routes)
}
