use crate::core::UpstreamParams;
use reqwest::{Client, StatusCode};
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

/// Provider header reporting the remaining request quota
pub const REQUESTS_REMAINING_HEADER: &str = "x-requests-remaining";

/// Errors that can occur when calling the odds provider
#[derive(Debug, Error)]
pub enum OddsApiError {
    #[error("HTTP request failed: {0}")]
    RequestError(reqwest::Error),

    #[error("Upstream request timed out")]
    Timeout,

    #[error("Upstream rejected request ({status}): {body}")]
    Rejected { status: StatusCode, body: String },

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),
}

impl From<reqwest::Error> for OddsApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            return OddsApiError::Timeout;
        }
        // The URL carries the API key in its query string
        OddsApiError::RequestError(err.without_url())
    }
}

impl OddsApiError {
    /// Short diagnostic string safe to hand to clients
    pub fn details(&self) -> String {
        match self {
            OddsApiError::Rejected { status, body } if body.is_empty() => status.to_string(),
            OddsApiError::Rejected { body, .. } => body.clone(),
            other => other.to_string(),
        }
    }
}

/// Raw upstream answer
#[derive(Debug, Clone)]
pub struct OddsResponse {
    pub payload: Value,
    pub requests_remaining: Option<String>,
}

/// Odds provider API client
///
/// One GET per call against `{base_url}/sports/{sport}/odds`. No retries.
pub struct OddsApiClient {
    base_url: String,
    api_key: Option<String>,
    client: Client,
}

impl OddsApiClient {
    /// Create a new client with a fixed per-request timeout
    pub fn new(
        base_url: impl Into<String>,
        api_key: Option<String>,
        timeout: Duration,
    ) -> Result<Self, OddsApiError> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.filter(|k| !k.trim().is_empty()),
            client,
        })
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Upstream URL for a sport, without query string
    pub fn odds_url(&self, sport: &str) -> String {
        format!(
            "{}/sports/{}/odds",
            self.base_url,
            urlencoding::encode(sport)
        )
    }

    /// Fetch odds for the given params
    ///
    /// A 2xx body must be a JSON array; anything else is `InvalidResponse`.
    pub async fn fetch_odds(&self, params: &UpstreamParams) -> Result<OddsResponse, OddsApiError> {
        let url = self.odds_url(&params.sport);
        let api_key = self.api_key.as_deref().unwrap_or("");

        tracing::debug!(
            "Fetching odds: sport={}, regions={}, markets={}, oddsFormat={}, bookmakers={}",
            params.sport,
            params.regions,
            params.markets,
            params.odds_format,
            params.bookmakers
        );

        let response = self
            .client
            .get(&url)
            .query(&params.query_pairs(api_key))
            .send()
            .await?;

        let status = response.status();
        let requests_remaining = response
            .headers()
            .get(REQUESTS_REMAINING_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(OddsApiError::Rejected { status, body });
        }

        let bytes = response.bytes().await?;
        let payload: Value = serde_json::from_slice(&bytes)
            .map_err(|e| OddsApiError::InvalidResponse(format!("Failed to parse odds: {}", e)))?;

        if !payload.is_array() {
            return Err(OddsApiError::InvalidResponse(format!(
                "Expected a game array, got {}",
                truncate(&payload.to_string(), 200)
            )));
        }

        Ok(OddsResponse {
            payload,
            requests_remaining,
        })
    }
}

fn truncate(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}
