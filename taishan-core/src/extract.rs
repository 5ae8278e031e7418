//! Pulls JSON documents out of script-like provider pages.

use regex::Regex;
use std::sync::LazyLock;
use thiserror::Error;

use crate::provider::truncate_body;

/// `var dataSK = {...};`
static VAR_ASSIGNMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"var\s+\w+\s*=\s*(\{.*\})\s*;?").unwrap());

static JSON_SCRIPT_TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?s)<script\s+type="application/json">(.*?)</script>"#).unwrap()
});

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ExtractError {
    #[error("input does not contain a `var name = {{...}};` assignment")]
    NoVarAssignment,

    #[error("input does not contain a <script type=\"application/json\"> block")]
    NoJsonScript,
}

/// Returns the `{...}` object assigned in `var name = {...};`.
pub fn extract_var_payload(input: &str) -> Result<&str, ExtractError> {
    VAR_ASSIGNMENT
        .captures(input)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
        .ok_or(ExtractError::NoVarAssignment)
}

pub fn extract_script_payload(input: &str) -> Result<&str, ExtractError> {
    JSON_SCRIPT_TAG
        .captures(input)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
        .ok_or(ExtractError::NoJsonScript)
}

/// Tries the `var` assignment form first, then a JSON script tag.
pub fn extract_embedded_json(input: &str) -> Result<&str, ExtractError> {
    extract_var_payload(input)
        .or_else(|_| extract_script_payload(input))
        .inspect_err(|_| {
            tracing::error!("Input does not match the expected format: {}", truncate_body(input));
        })
}
