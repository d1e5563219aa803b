//! Route seed file loading.

use std::path::Path;

use anyhow::{Context, Result};
use api_types::RouteDocument;
use where_is_bus_tracking::Route;

use crate::views::route_from_document;

/// Read a JSON array of route documents from `path`.
pub fn load_routes(path: &Path) -> Result<Vec<Route>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read route file {}", path.display()))?;

    parse_routes(&text).with_context(|| format!("Invalid route file {}", path.display()))
}

pub fn parse_routes(text: &str) -> Result<Vec<Route>> {
    let documents: Vec<RouteDocument> =
        serde_json::from_str(text).context("Route file is not a JSON array of routes")?;

    documents
        .into_iter()
        .map(|doc| route_from_document(doc).map_err(anyhow::Error::from))
        .collect()
}
