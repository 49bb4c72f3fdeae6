//! Client configuration parsed from environment variables.

use std::path::PathBuf;

use crate::error::ConfigError;

pub const DEFAULT_API_BASE_URL: &str = "http://127.0.0.1:8001/api";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LivriaConfig {
    /// Backend API root without a trailing slash.
    pub api_base_url: String,
    /// JSON file backing persistent storage. In-memory storage when `None`.
    pub storage_path: Option<PathBuf>,
}

impl Default for LivriaConfig {
    fn default() -> Self {
        Self { api_base_url: DEFAULT_API_BASE_URL.to_string(), storage_path: None }
    }
}

impl LivriaConfig {
    /// Build typed client config from environment variables.
    ///
    /// Optional:
    /// - `LIVRIA_API_BASE_URL`: default `http://127.0.0.1:8001/api`
    /// - `LIVRIA_STORAGE_PATH`: JSON file for persisted session keys
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is not an absolute http(s) URL.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let api_base_url = parse_base_url(lookup("LIVRIA_API_BASE_URL").as_deref())?;
        let storage_path = lookup("LIVRIA_STORAGE_PATH")
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .map(PathBuf::from);

        Ok(Self { api_base_url, storage_path })
    }
}

fn parse_base_url(raw: Option<&str>) -> Result<String, ConfigError> {
    let value = raw.map_or(DEFAULT_API_BASE_URL, str::trim);
    let invalid = |reason: String| ConfigError::InvalidBaseUrl { value: value.to_string(), reason };

    let url = reqwest::Url::parse(value).map_err(|e| invalid(e.to_string()))?;
    match url.scheme() {
        "http" | "https" => {}
        other => return Err(invalid(format!("unsupported scheme {other}"))),
    }

    Ok(value.trim_end_matches('/').to_string())
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
