//! Advice payloads and where they came from

use serde::{Deserialize, Serialize};

/// Advice produced for a farmer's query.
///
/// This is what the generative backend returns and what the offline cache
/// stores, unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdviceResponse {
    pub advice: String,
    pub explanation: String,
    /// Provenance of the advice (documents, datasets, advisories).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sources: Vec<String>,
}

impl AdviceResponse {
    pub fn new(advice: impl Into<String>, explanation: impl Into<String>) -> Self {
        Self {
            advice: advice.into(),
            explanation: explanation.into(),
            sources: Vec::new(),
        }
    }

    /// Attach a provenance entry.
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.sources.push(source.into());
        self
    }
}

/// Where an answer handed to the caller was obtained
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdviceSource {
    /// Served from the offline cache.
    Cache,
    /// Freshly generated by the advice backend.
    Live,
    /// Canned demo answer.
    Demo,
}

impl AdviceSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            AdviceSource::Cache => "cache",
            AdviceSource::Live => "live",
            AdviceSource::Demo => "demo",
        }
    }
}

/// Advice together with its origin
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Advice {
    pub response: AdviceResponse,
    pub source: AdviceSource,
    /// Match confidence for demo answers; absent otherwise.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
}
