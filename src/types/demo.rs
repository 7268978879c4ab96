//! Demo-mode reference data and match results

use serde::{Deserialize, Serialize};

/// One canned question with its exact expected answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DemoQaEntry {
    pub question: String,
    pub answer: String,
    /// Language tag of `question` (e.g. `"en"`, `"hi"`).
    pub language: String,
}

impl DemoQaEntry {
    pub fn new(
        question: impl Into<String>,
        answer: impl Into<String>,
        language: impl Into<String>,
    ) -> Self {
        Self {
            question: question.into(),
            answer: answer.into(),
            language: language.into(),
        }
    }
}

/// Best reference entry for an input, with its score
#[derive(Debug, Clone, PartialEq)]
pub struct MatchResult {
    pub entry: DemoQaEntry,
    /// Score in `[0, 1]`; exactly `1.0` only for an exact match.
    pub similarity: f64,
    /// Confidence reported to callers. Monotonic in `similarity`.
    pub confidence: f64,
}

/// What demo mode hands back to the UI
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DemoResponse {
    pub answer: String,
    pub confidence: f64,
}

impl From<MatchResult> for DemoResponse {
    fn from(m: MatchResult) -> Self {
        Self {
            answer: m.entry.answer,
            confidence: m.confidence,
        }
    }
}
