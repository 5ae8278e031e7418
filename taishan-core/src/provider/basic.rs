use anyhow::{Context, Result, bail};

use crate::{extract::extract_embedded_json, model::BasicWeather};

/// Decode the station snapshot page served by the basic endpoint.
pub fn parse_basic(body: &str) -> Result<BasicWeather> {
    if body.trim().is_empty() {
        bail!("Empty response body.");
    }

    let json = extract_embedded_json(body).context("Basic weather page has no embedded payload")?;

    serde_json::from_str(json).context("Failed to parse basic weather JSON")
}
