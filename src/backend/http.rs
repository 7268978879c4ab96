//! HTTP client for a hosted advice endpoint.
//!
//! `POST {base_url}/advice` with `{"query": ..., "language": ...}` and an
//! optional bearer token. The endpoint answers with
//! `{"advice": ..., "explanation": ..., "sources": [...]}`.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;

use super::AdviceBackend;
use crate::types::AdviceResponse;
use crate::{Result, SakhaError};

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Advice backend reached over HTTP/JSON.
#[derive(Clone)]
pub struct HttpAdviceBackend {
    http: Client,
    base_url: String,
    api_key: Option<String>,
}

impl HttpAdviceBackend {
    /// Create a client for the endpoint rooted at `base_url`.
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        Self::with_timeout(base_url, DEFAULT_TIMEOUT)
    }

    /// Create a client with a custom request timeout.
    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| SakhaError::Configuration(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: None,
        })
    }

    /// Send `Authorization: Bearer <key>` with every request.
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn check_status(response: &reqwest::Response) -> Result<()> {
        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        let message = match status.as_u16() {
            401 | 403 => "advice endpoint rejected credentials".to_string(),
            429 => "advice endpoint rate limited the request".to_string(),
            _ => format!("advice endpoint error: {status}"),
        };
        Err(SakhaError::Api {
            status: status.as_u16(),
            message,
        })
    }
}

#[async_trait]
impl AdviceBackend for HttpAdviceBackend {
    fn name(&self) -> &str {
        "http"
    }

    async fn generate_advice(&self, query: &str, language: &str) -> Result<AdviceResponse> {
        let url = format!("{}/advice", self.base_url);

        let mut request = self.http.post(&url).json(&AdviceRequest { query, language });
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                SakhaError::Http(format!("request to {url} timed out"))
            } else {
                SakhaError::Http(e.to_string())
            }
        })?;

        Self::check_status(&response)?;

        let body = response
            .bytes()
            .await
            .map_err(|e| SakhaError::Http(e.to_string()))?;
        // A 2xx body that does not decode is a broken endpoint, not a network fault.
        let advice: AdviceResponse = serde_json::from_slice(&body)
            .map_err(|e| SakhaError::InvalidResponse(format!("malformed body: {e}")))?;

        if advice.advice.trim().is_empty() {
            return Err(SakhaError::InvalidResponse("empty advice".to_string()));
        }
        Ok(advice)
    }
}

#[derive(Serialize)]
struct AdviceRequest<'a> {
    query: &'a str,
    language: &'a str,
}
