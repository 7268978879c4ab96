//! Topic synonym table for cross-language demo matching.
//!
//! Literal string distance is useless between "धान में कौन सा उर्वरक डालें"
//! and "How much fertilizer should I apply to my paddy crop?". Both mention
//! the same *topics* though (paddy, fertilizer). The table below maps
//! synonyms in English, Hindi and romanized Hindi onto one canonical topic,
//! and the matcher scores topic overlap alongside literal similarity.
//!
//! A word belongs to a topic when it equals one of the topic's synonyms, or
//! starts with a synonym of at least [`PREFIX_MIN_CHARS`] characters, which
//! covers plurals ("fertilizers") and Hindi inflection ("उर्वरकों").

use std::collections::BTreeSet;

use super::similarity::normalize;

/// Shortest synonym allowed to match as a word prefix.
pub const PREFIX_MIN_CHARS: usize = 4;

/// Built-in topics. Synonyms are normalized when the table is built, so
/// they can be written here in any case or composition form.
pub const BUILTIN_TOPICS: &[(&str, &[&str])] = &[
    (
        "weather",
        &[
            "weather",
            "forecast",
            "mausam",
            "मौसम",
            "temperature",
            "तापमान",
            "rain",
            "rainfall",
            "barish",
            "baarish",
            "बारिश",
            "वर्षा",
        ],
    ),
    (
        "price",
        &["price", "rate", "bhav", "daam", "भाव", "दाम", "कीमत", "मूल्य"],
    ),
    ("market", &["market", "mandi", "apmc", "मंडी", "बाजार", "बाज़ार"]),
    (
        "scheme",
        &[
            "scheme",
            "yojana",
            "subsidy",
            "government",
            "sarkari",
            "योजना",
            "सब्सिडी",
            "अनुदान",
            "सरकारी",
        ],
    ),
    (
        "fertilizer",
        &[
            "fertilizer",
            "fertiliser",
            "manure",
            "urea",
            "dap",
            "potash",
            "khad",
            "खाद",
            "उर्वरक",
            "यूरिया",
            "पोटाश",
        ],
    ),
    ("paddy", &["paddy", "rice", "dhan", "dhaan", "धान", "चावल", "chawal"]),
    ("wheat", &["wheat", "gehun", "gehu", "गेहूं", "गेहूँ", "गेंहू"]),
    ("onion", &["onion", "pyaz", "pyaaz", "प्याज"]),
    ("cotton", &["cotton", "kapas", "कपास"]),
    ("tomato", &["tomato", "tamatar", "टमाटर"]),
    (
        "pest",
        &["pest", "insect", "bollworm", "keeda", "कीट", "कीड़ा", "इल्ली"],
    ),
    (
        "irrigation",
        &["irrigation", "irrigate", "watering", "sinchai", "सिंचाई", "पानी"],
    ),
    ("soil", &["soil", "mitti", "मिट्टी", "मृदा"]),
    (
        "sowing",
        &["sowing", "sow", "planting", "buvai", "buai", "बुवाई", "बुआई"],
    ),
    ("pune", &["pune", "पुणे"]),
    ("nashik", &["nashik", "nasik", "नासिक"]),
];

#[derive(Debug, Clone, PartialEq, Eq)]
struct Topic {
    name: String,
    synonyms: Vec<String>,
}

/// Mapping from synonyms to canonical topic names.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TopicTable {
    topics: Vec<Topic>,
}

impl TopicTable {
    /// The built-in agricultural topic table.
    pub fn builtin() -> Self {
        Self::from_pairs(BUILTIN_TOPICS)
    }

    /// A table with no topics; matching falls back to literal similarity.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a table from `(topic, synonyms)` pairs.
    pub fn from_pairs(pairs: &[(&str, &[&str])]) -> Self {
        let topics = pairs
            .iter()
            .map(|(name, synonyms)| Topic {
                name: (*name).to_string(),
                synonyms: synonyms
                    .iter()
                    .map(|s| normalize(s))
                    .filter(|s| !s.is_empty())
                    .collect(),
            })
            .collect();
        Self { topics }
    }

    /// Topic names, in table order.
    pub fn topic_names(&self) -> impl Iterator<Item = &str> {
        self.topics.iter().map(|t| t.name.as_str())
    }

    /// Normalized synonyms of `topic`, or `None` for an unknown topic.
    pub fn synonyms(&self, topic: &str) -> Option<&[String]> {
        self.topics
            .iter()
            .find(|t| t.name == topic)
            .map(|t| t.synonyms.as_slice())
    }

    pub fn len(&self) -> usize {
        self.topics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.topics.is_empty()
    }

    /// Canonical topics mentioned by any of `tokens`.
    pub fn topics_of<'a, I>(&self, tokens: I) -> BTreeSet<String>
    where
        I: IntoIterator<Item = &'a String>,
    {
        let mut found = BTreeSet::new();
        for token in tokens {
            for topic in &self.topics {
                if topic.synonyms.iter().any(|s| word_matches(token, s)) {
                    found.insert(topic.name.clone());
                }
            }
        }
        found
    }
}

fn word_matches(token: &str, synonym: &str) -> bool {
    token == synonym
        || (synonym.chars().count() >= PREFIX_MIN_CHARS && token.starts_with(synonym))
}
