//! Family source — where family records come from.
//!
//! DESIGN
//! ======
//! `FamilySource` is the seam between graph loading and the family REST API.
//! `HttpFamilySource` is a thin reqwest wrapper for `GET /families/{id}`.
//! Decoding lives in the pure `parse_family` so it can be tested without a
//! server. The API answers either with the bare record or with the record
//! wrapped in a `{"data": ...}` envelope; both are accepted.

use std::time::Duration;

use reqwest::header::AUTHORIZATION;
use serde::Deserialize;
use tracing::debug;

use super::{FamilyId, FamilyRecord, FamilyWire, ShapeError};
use crate::config::FamilyApiConfig;
use crate::error::ErrorCode;

// =============================================================================
// ERROR
// =============================================================================

/// Errors produced while fetching a family record.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// The underlying HTTP client could not be constructed.
    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),

    /// The request never produced a response (connect, timeout, body read).
    #[error("family request failed: {0}")]
    Request(String),

    /// The family API answered with a non-success status.
    #[error("family API returned status {status}: {body}")]
    Status { status: u16, body: String },

    /// The response body was not a family record.
    #[error("family response decode failed: {0}")]
    Decode(String),

    /// The record decoded but lacks a required collection.
    #[error(transparent)]
    Shape(#[from] ShapeError),
}

impl ErrorCode for FetchError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::HttpClientBuild(_) => "E_HTTP_CLIENT_BUILD",
            Self::Request(_) => "E_FAMILY_REQUEST",
            Self::Status { .. } => "E_FAMILY_STATUS",
            Self::Decode(_) => "E_FAMILY_DECODE",
            Self::Shape(e) => e.error_code(),
        }
    }

    fn retryable(&self) -> bool {
        matches!(self, Self::Request(_) | Self::Status { status: 429 | 500..=599, .. })
    }
}

// =============================================================================
// SOURCE TRAIT
// =============================================================================

/// Anything that can produce a family record by id.
#[async_trait::async_trait]
pub trait FamilySource: Send + Sync {
    async fn get_family(&self, family_id: FamilyId) -> Result<FamilyRecord, FetchError>;
}

// =============================================================================
// HTTP CLIENT
// =============================================================================

pub struct HttpFamilySource {
    http: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl HttpFamilySource {
    /// Build a client against the configured family API.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: &FamilyApiConfig) -> Result<Self, FetchError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .build()
            .map_err(|e| FetchError::HttpClientBuild(e.to_string()))?;
        Ok(Self { http, base_url: config.base_url.clone(), token: config.token.clone() })
    }

    fn family_url(&self, family_id: FamilyId) -> String {
        format!("{}/families/{family_id}", self.base_url)
    }
}

#[async_trait::async_trait]
impl FamilySource for HttpFamilySource {
    async fn get_family(&self, family_id: FamilyId) -> Result<FamilyRecord, FetchError> {
        let url = self.family_url(family_id);
        debug!(%url, "fetching family");

        let mut request = self.http.get(&url);
        if let Some(token) = &self.token {
            request = request.header(AUTHORIZATION, format!("Bearer {token}"));
        }

        let response = request
            .send()
            .await
            .map_err(|e| FetchError::Request(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| FetchError::Request(e.to_string()))?;

        if !status.is_success() {
            return Err(FetchError::Status { status: status.as_u16(), body: text });
        }

        parse_family(&text)
    }
}

// =============================================================================
// PARSING
// =============================================================================

#[derive(Deserialize)]
#[serde(untagged)]
enum Envelope {
    Wrapped { data: FamilyWire },
    Bare(FamilyWire),
}

pub(crate) fn parse_family(json: &str) -> Result<FamilyRecord, FetchError> {
    let envelope: Envelope = serde_json::from_str(json).map_err(|e| FetchError::Decode(e.to_string()))?;
    let wire = match envelope {
        Envelope::Wrapped { data } | Envelope::Bare(data) => data,
    };
    Ok(FamilyRecord::try_from(wire)?)
}

#[cfg(test)]
#[path = "source_test.rs"]
mod tests;
