//! Service configuration parsed from environment variables.

use crate::graph::{EmptyFamilyPolicy, ViewMode};
use crate::state::DEFAULT_VIEW_CAPACITY;

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 15;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 5;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing required env var {0}")]
    Missing(&'static str),
    #[error("invalid value for {var}: '{value}'")]
    Invalid { var: &'static str, value: String },
}

/// Where and how to reach the family REST API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FamilyApiConfig {
    pub base_url: String,
    pub token: Option<String>,
    pub request_timeout_secs: u64,
    pub connect_timeout_secs: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub port: u16,
    pub family_api: FamilyApiConfig,
    pub default_view_mode: ViewMode,
    pub empty_family: EmptyFamilyPolicy,
    /// Most family views kept in memory.
    pub view_capacity: usize,
}

impl AppConfig {
    /// Build typed config from environment variables.
    ///
    /// Required:
    /// - `FAMILY_API_BASE_URL`
    ///
    /// Optional:
    /// - `FAMILY_API_TOKEN`: bearer token forwarded to the family API
    /// - `FAMILY_API_REQUEST_TIMEOUT_SECS`: default 15
    /// - `FAMILY_API_CONNECT_TIMEOUT_SECS`: default 5
    /// - `PORT`: default 3000
    /// - `DEFAULT_VIEW_MODE`: `compact` (default) or `expanded`
    /// - `EMPTY_FAMILY_POLICY`: `sample` (default) or `empty`
    /// - `VIEW_CACHE_CAPACITY`: default 1024, at least 1
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is missing or a value does not parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        let base_url = std::env::var("FAMILY_API_BASE_URL")
            .map_err(|_| ConfigError::Missing("FAMILY_API_BASE_URL"))?
            .trim_end_matches('/')
            .to_string();
        let token = std::env::var("FAMILY_API_TOKEN")
            .ok()
            .filter(|t| !t.trim().is_empty());

        let family_api = FamilyApiConfig {
            base_url,
            token,
            request_timeout_secs: env_parse_u64("FAMILY_API_REQUEST_TIMEOUT_SECS", DEFAULT_REQUEST_TIMEOUT_SECS),
            connect_timeout_secs: env_parse_u64("FAMILY_API_CONNECT_TIMEOUT_SECS", DEFAULT_CONNECT_TIMEOUT_SECS),
        };

        let port = match std::env::var("PORT") {
            Ok(raw) => raw
                .parse::<u16>()
                .map_err(|_| ConfigError::Invalid { var: "PORT", value: raw })?,
            Err(_) => DEFAULT_PORT,
        };

        Ok(Self {
            port,
            family_api,
            default_view_mode: parse_view_mode(std::env::var("DEFAULT_VIEW_MODE").ok().as_deref())?,
            empty_family: parse_empty_family(std::env::var("EMPTY_FAMILY_POLICY").ok().as_deref())?,
            view_capacity: env_parse_usize("VIEW_CACHE_CAPACITY", DEFAULT_VIEW_CAPACITY).max(1),
        })
    }
}

fn env_parse_u64(key: &str, default: u64) -> u64 {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse::<u64>().ok())
        .unwrap_or(default)
}

fn env_parse_usize(key: &str, default: usize) -> usize {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse::<usize>().ok())
        .unwrap_or(default)
}

fn parse_view_mode(raw: Option<&str>) -> Result<ViewMode, ConfigError> {
    match raw.unwrap_or("compact") {
        "compact" => Ok(ViewMode::Compact),
        "expanded" => Ok(ViewMode::Expanded),
        other => Err(ConfigError::Invalid { var: "DEFAULT_VIEW_MODE", value: other.to_string() }),
    }
}

fn parse_empty_family(raw: Option<&str>) -> Result<EmptyFamilyPolicy, ConfigError> {
    match raw.unwrap_or("sample") {
        "sample" => Ok(EmptyFamilyPolicy::Sample),
        "empty" => Ok(EmptyFamilyPolicy::Empty),
        other => Err(ConfigError::Invalid { var: "EMPTY_FAMILY_POLICY", value: other.to_string() }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
