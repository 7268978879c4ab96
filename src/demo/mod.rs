//! Demo-mode query matching.
//!
//! [`DemoMatcher`] answers queries from a small fixed set of canned
//! question/answer pairs, so the assistant can be demonstrated (and keep
//! answering) without the advice backend.
//!
//! # Scoring
//!
//! Input and reference questions are compared after
//! [`normalize`](similarity::normalize):
//!
//! 1. Empty input never matches.
//! 2. Identical normalized text scores exactly `1.0`.
//! 3. Stopwords ("how", "what is the", "क्या") are dropped, leaving the
//!    content words of each side. A pair with no topic and no content word in
//!    common scores `0.0`.
//! 4. Otherwise `lexical = (char_similarity + token_similarity) / 2` over the
//!    content words and `topic = jaccard(topics(input), topics(question))`;
//!    the score is `max(lexical, TOPIC_WEIGHT * topic)` capped at
//!    `MAX_FUZZY_SCORE`.
//!
//! The topic term is what lets a Hindi question find an English reference
//! entry (see [`topics`]). The best entry is returned when its score reaches
//! the configured threshold; ties go to the earlier entry.
//!
//! Matching is a pure function of the input and the reference set.

pub mod reference;
pub mod similarity;
pub mod topics;

use std::collections::BTreeSet;

use tracing::debug;

use crate::telemetry;
use crate::types::{DemoQaEntry, DemoResponse, MatchResult};

use similarity::{
    DEFAULT_THRESHOLD, MAX_FUZZY_SCORE, TOPIC_WEIGHT, char_similarity, content_text, jaccard,
    normalize, token_set, token_similarity,
};
pub use topics::TopicTable;

/// Tuning for [`DemoMatcher`].
///
/// ```rust
/// # use krishi_sakha::MatcherConfig;
/// let config = MatcherConfig::new().threshold(0.5);
/// assert_eq!(config.threshold, 0.5);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct MatcherConfig {
    /// Minimum similarity for a match. Default: 0.35.
    pub threshold: f64,
}

impl Default for MatcherConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
        }
    }
}

impl MatcherConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the minimum similarity, clamped to `[0, 1]`.
    pub fn threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold.clamp(0.0, 1.0);
        self
    }
}

/// A question in the forms the scorer compares.
#[derive(Debug, Clone)]
struct QueryForm {
    normalized: String,
    /// Normalized text without stopwords.
    content: String,
    content_tokens: BTreeSet<String>,
    topics: BTreeSet<String>,
}

impl QueryForm {
    fn new(text: &str, topics: &TopicTable) -> Self {
        let normalized = normalize(text);
        let content = content_text(&normalized);
        let content_tokens = token_set(&content);
        // Topics come from every word; stopwords never name a topic.
        let topics = topics.topics_of(&token_set(&normalized));
        Self {
            normalized,
            content,
            content_tokens,
            topics,
        }
    }
}

/// Reference entry with its comparison forms precomputed.
#[derive(Debug, Clone)]
struct PreparedEntry {
    entry: DemoQaEntry,
    form: QueryForm,
}

/// Fuzzy matcher over a fixed reference set.
#[derive(Debug, Clone)]
pub struct DemoMatcher {
    entries: Vec<PreparedEntry>,
    topics: TopicTable,
    config: MatcherConfig,
}

impl Default for DemoMatcher {
    /// Built-in reference set and topic table with the default threshold.
    fn default() -> Self {
        Self::new(
            reference::builtin_entries(),
            TopicTable::builtin(),
            MatcherConfig::default(),
        )
    }
}

impl DemoMatcher {
    pub fn new(entries: Vec<DemoQaEntry>, topics: TopicTable, config: MatcherConfig) -> Self {
        let entries = entries
            .into_iter()
            .map(|entry| PreparedEntry {
                form: QueryForm::new(&entry.question, &topics),
                entry,
            })
            .collect();
        Self {
            entries,
            topics,
            config,
        }
    }

    /// Reference entries in tie-break order.
    pub fn entries(&self) -> impl Iterator<Item = &DemoQaEntry> {
        self.entries.iter().map(|p| &p.entry)
    }

    pub fn topics(&self) -> &TopicTable {
        &self.topics
    }

    pub fn config(&self) -> &MatcherConfig {
        &self.config
    }

    /// Best-scoring reference entry for `input`, if it reaches the threshold.
    pub fn find_matching_question(&self, input: &str) -> Option<MatchResult> {
        let input = QueryForm::new(input, &self.topics);
        if input.normalized.is_empty() {
            metrics::counter!(telemetry::DEMO_LOOKUPS_TOTAL, "outcome" => "miss").increment(1);
            return None;
        }

        let mut best: Option<(&PreparedEntry, f64)> = None;
        for prepared in &self.entries {
            let score = score(&input, &prepared.form);
            // Strictly greater keeps the earliest entry on ties.
            if best.is_none_or(|(_, best_score)| score > best_score) {
                best = Some((prepared, score));
            }
        }

        match best {
            Some((prepared, similarity)) if similarity >= self.config.threshold => {
                metrics::counter!(telemetry::DEMO_LOOKUPS_TOTAL, "outcome" => "match")
                    .increment(1);
                debug!(
                    question = %prepared.entry.question,
                    similarity,
                    "demo question matched"
                );
                Some(MatchResult {
                    entry: prepared.entry.clone(),
                    similarity,
                    confidence: confidence(similarity),
                })
            }
            other => {
                metrics::counter!(telemetry::DEMO_LOOKUPS_TOTAL, "outcome" => "miss").increment(1);
                debug!(
                    best_similarity = other.map(|(_, s)| s).unwrap_or(0.0),
                    threshold = self.config.threshold,
                    "no demo question matched"
                );
                None
            }
        }
    }

    /// Canned answer for `input` with its confidence, if any entry matches.
    pub fn get_demo_response(&self, input: &str) -> Option<DemoResponse> {
        self.find_matching_question(input).map(DemoResponse::from)
    }
}

fn score(input: &QueryForm, question: &QueryForm) -> f64 {
    if input.normalized == question.normalized {
        return 1.0;
    }
    let topical = TOPIC_WEIGHT * jaccard(&input.topics, &question.topics);
    if topical == 0.0 && input.content_tokens.is_disjoint(&question.content_tokens) {
        return 0.0;
    }
    let lexical = (char_similarity(&input.content, &question.content)
        + token_similarity(&input.content_tokens, &question.content_tokens))
        / 2.0;
    lexical.max(topical).clamp(0.0, MAX_FUZZY_SCORE)
}

/// Confidence reported for a similarity. Identity, kept separate so callers
/// never depend on the two being the same number.
fn confidence(similarity: f64) -> f64 {
    similarity
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture() -> DemoMatcher {
        DemoMatcher::new(
            vec![
                DemoQaEntry::new("When should I sow wheat?", "November", "en"),
                DemoQaEntry::new("When should I sow wheat", "Duplicate", "en"),
                DemoQaEntry::new("What is the onion price?", "₹1,850", "en"),
            ],
            TopicTable::builtin(),
            MatcherConfig::default(),
        )
    }

    #[test]
    fn punctuation_and_case_do_not_matter() {
        let m = fixture()
            .find_matching_question("WHAT is the onion price")
            .unwrap();
        assert_eq!(m.entry.answer, "₹1,850");
        assert_eq!(m.similarity, 1.0);
    }

    #[test]
    fn ties_go_to_first_entry() {
        // Both wheat entries normalize identically.
        let m = fixture()
            .find_matching_question("when should i sow wheat")
            .unwrap();
        assert_eq!(m.entry.answer, "November");
    }

    #[test]
    fn fuzzy_score_stays_below_one() {
        let m = fixture()
            .find_matching_question("when should I sow my wheat?")
            .unwrap();
        assert_eq!(m.entry.answer, "November");
        assert!(m.similarity < 1.0);
        assert!(m.similarity >= DEFAULT_THRESHOLD);
    }

    #[test]
    fn shared_stopwords_alone_score_zero() {
        let topics = TopicTable::builtin();
        let input = QueryForm::new("What is the capital of France?", &topics);
        let question = QueryForm::new("What is the onion price?", &topics);
        assert_eq!(score(&input, &question), 0.0);
    }

    #[test]
    fn confidence_tracks_similarity() {
        let m = fixture().find_matching_question("onion price").unwrap();
        assert_eq!(m.confidence, m.similarity);
    }

    #[test]
    fn threshold_filters_weak_matches() {
        let strict = DemoMatcher::new(
            reference::builtin_entries(),
            TopicTable::builtin(),
            MatcherConfig::new().threshold(1.0),
        );
        assert!(strict.find_matching_question("weather in Pune").is_none());
        assert!(
            strict
                .find_matching_question("What is the weather forecast for Pune tomorrow?")
                .is_some()
        );
    }

    #[test]
    fn empty_reference_set_never_matches() {
        let matcher = DemoMatcher::new(Vec::new(), TopicTable::builtin(), MatcherConfig::new());
        assert!(matcher.find_matching_question("onion price").is_none());
    }

    #[test]
    fn threshold_is_clamped() {
        assert_eq!(MatcherConfig::new().threshold(3.0).threshold, 1.0);
        assert_eq!(MatcherConfig::new().threshold(-1.0).threshold, 0.0);
    }
}
