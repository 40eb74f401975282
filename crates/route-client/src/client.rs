//! Client for the route search endpoint.

use anyhow::Result;
use route_core::{FilterCriteria, Route};
use serde::Deserialize;

/// Client for a route search server.
pub struct SearchClient {
    base_url: String,
    client: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    routes: Option<Vec<Route>>,
}

impl SearchClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Find routes matching `criteria`.
    pub async fn search(&self, criteria: &FilterCriteria) -> Result<Vec<Route>> {
        let url = format!("{}/search_routes", self.base_url);
        tracing::debug!(%url, icao = %criteria.icao, "searching routes");

        let response = self.client.post(&url).json(criteria).send().await?;
        if !response.status().is_success() {
            anyhow::bail!("Route search failed: {}", response.status());
        }

        let body = response.text().await?;
        let routes = parse_search_response(&body)?;
        tracing::info!(count = routes.len(), "route search complete");
        Ok(routes)
    }
}

/// Extract the `routes` array from a search response body.
pub fn parse_search_response(body: &str) -> Result<Vec<Route>> {
    let response: SearchResponse =
        serde_json::from_str(body).map_err(|err| anyhow::anyhow!("Malformed json: {err}"))?;
    response
        .routes
        .ok_or_else(|| anyhow::anyhow!("Malformed json: missing routes"))
}
