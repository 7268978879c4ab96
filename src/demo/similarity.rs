//! String similarity primitives for demo matching.
//!
//! Everything here works on text already passed through [`normalize`]:
//! NFC-composed, lower-cased, split into Unicode words (UAX #29, which drops
//! punctuation in every script) and re-joined with single spaces.

use std::collections::BTreeSet;

use unicode_normalization::UnicodeNormalization;
use unicode_segmentation::UnicodeSegmentation;

/// Minimum similarity for a match to be reported.
pub const DEFAULT_THRESHOLD: f64 = 0.35;

/// Scale applied to topic overlap so a pure topic match ranks below a close
/// literal match.
pub const TOPIC_WEIGHT: f64 = 0.9;

/// Ceiling for any non-identical pair; only exact matches score 1.0.
pub const MAX_FUZZY_SCORE: f64 = 0.99;

/// Function words left out of content comparison, in normalized form.
///
/// Two questions that share only words like "how do i" or "what is the" are
/// not related. None of these may appear among the topic synonyms.
pub const STOPWORDS: &[&str] = &[
    // English
    "a", "about", "all", "am", "an", "and", "any", "are", "at", "be", "by", "can", "could",
    "did", "do", "does", "for", "from", "get", "going", "has", "have", "how", "i", "if", "in",
    "is", "it", "it's", "its", "many", "may", "me", "more", "most", "much", "my", "no", "not",
    "of", "on", "or", "our", "please", "shall", "should", "so", "some", "tell", "that", "the",
    "there", "these", "this", "those", "to", "very", "was", "we", "were", "what", "what's",
    "when", "where", "which", "who", "why", "will", "with", "would", "you", "your",
    // Hindi
    "और", "क्या", "कब", "कहाँ", "कहां", "का", "कि", "की", "के", "कैसे", "को", "कौन", "तो", "ने",
    "पर", "भी", "मेरी", "मेरे", "मैं", "में", "यह", "लिए", "वह", "सा", "से", "हम", "ही", "है", "हैं",
    // Romanized Hindi
    "aur", "hai", "ka", "kab", "kahan", "kaise", "ke", "ki", "ko", "kya", "mein", "par", "se",
];

/// Canonical form used for every comparison.
///
/// ```rust
/// # use krishi_sakha::demo::similarity::normalize;
/// assert_eq!(normalize("  What's the RAIN forecast?! "), "what's the rain forecast");
/// assert_eq!(normalize("धान में खाद, कब?"), "धान में खाद कब");
/// ```
pub fn normalize(text: &str) -> String {
    let composed: String = text.nfc().collect::<String>().to_lowercase();
    composed.unicode_words().collect::<Vec<_>>().join(" ")
}

/// Distinct words of normalized text.
pub fn token_set(normalized: &str) -> BTreeSet<String> {
    normalized.split(' ').filter(|t| !t.is_empty()).map(str::to_string).collect()
}

pub fn is_stopword(token: &str) -> bool {
    STOPWORDS.contains(&token)
}

/// Normalized text with stopwords removed.
pub fn content_text(normalized: &str) -> String {
    normalized
        .split(' ')
        .filter(|t| !t.is_empty() && !is_stopword(t))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Edit distance over chars (insert, delete, substitute all cost 1).
pub fn levenshtein(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0; b.len() + 1];
    for (i, ca) in a.iter().enumerate() {
        curr[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let cost = usize::from(ca != cb);
            curr[j + 1] = (prev[j] + cost).min(prev[j + 1] + 1).min(curr[j] + 1);
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    prev[b.len()]
}

/// `1 - distance / longer length`, in `[0, 1]`.
pub fn char_similarity(a: &str, b: &str) -> f64 {
    let longest = a.chars().count().max(b.chars().count());
    if longest == 0 {
        return 1.0;
    }
    1.0 - levenshtein(a, b) as f64 / longest as f64
}

/// Dice coefficient of two token sets, in `[0, 1]`.
pub fn token_similarity(a: &BTreeSet<String>, b: &BTreeSet<String>) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    let shared = a.intersection(b).count();
    2.0 * shared as f64 / (a.len() + b.len()) as f64
}

/// Jaccard overlap of two sets; 0 when either is empty.
pub fn jaccard<T: Ord>(a: &BTreeSet<T>, b: &BTreeSet<T>) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    let shared = a.intersection(b).count();
    let union = a.len() + b.len() - shared;
    shared as f64 / union as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(words: &[&str]) -> BTreeSet<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn normalize_strips_punctuation_and_case() {
        assert_eq!(normalize("Wheat -- PRICE?"), "wheat price");
        assert_eq!(normalize("   "), "");
    }

    #[test]
    fn normalize_keeps_devanagari_words_whole() {
        // Vowel signs and virama must not split a word.
        assert_eq!(normalize("उर्वरक।"), "उर्वरक");
        assert_eq!(token_set(&normalize("धान की फसल")).len(), 3);
    }

    #[test]
    fn content_text_drops_function_words() {
        assert_eq!(content_text(&normalize("How do I apply for a bank loan?")), "apply bank loan");
        assert_eq!(content_text(&normalize("धान में कौन सा उर्वरक डालें?")), "धान उर्वरक डालें");
        assert_eq!(content_text(&normalize("How do I")), "");
    }

    #[test]
    fn stopwords_are_normalized() {
        for word in STOPWORDS {
            assert_eq!(normalize(word), *word);
        }
    }

    #[test]
    fn levenshtein_known_values() {
        assert_eq!(levenshtein("kitten", "sitting"), 3);
        assert_eq!(levenshtein("", "abc"), 3);
        assert_eq!(levenshtein("abc", ""), 3);
        assert_eq!(levenshtein("same", "same"), 0);
    }

    #[test]
    fn levenshtein_counts_chars_not_bytes() {
        assert_eq!(levenshtein("धान", "धन"), 1);
    }

    #[test]
    fn char_similarity_bounds() {
        assert_eq!(char_similarity("abc", "abc"), 1.0);
        assert_eq!(char_similarity("abc", "xyz"), 0.0);
        assert_eq!(char_similarity("", ""), 1.0);
    }

    #[test]
    fn token_similarity_dice() {
        let a = set(&["onion", "price"]);
        let b = set(&["onion", "rate", "today"]);
        assert!((token_similarity(&a, &b) - 0.4).abs() < 1e-9);
        assert_eq!(token_similarity(&a, &BTreeSet::new()), 0.0);
    }

    #[test]
    fn jaccard_overlap() {
        let a = set(&["paddy", "fertilizer"]);
        let b = set(&["fertilizer", "paddy"]);
        assert_eq!(jaccard(&a, &b), 1.0);
        let c = set(&["paddy"]);
        assert_eq!(jaccard(&a, &c), 0.5);
    }
}
