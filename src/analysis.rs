use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;

use serde::Serialize;

const ENGLISH_STOPWORDS: &[&str] = &[
    "a", "about", "above", "after", "again", "against", "all", "am", "an", "and", "any", "are", "as", "at", "be",
    "because", "been", "before", "being", "below", "between", "both", "but", "by", "can", "did", "do", "does",
    "doing", "don't", "down", "during", "each", "few", "for", "from", "further", "had", "has", "have", "having",
    "he", "her", "here", "hers", "herself", "him", "himself", "his", "how", "i", "if", "in", "into", "is", "it",
    "it's", "its", "itself", "just", "me", "more", "most", "my", "myself", "no", "nor", "not", "now", "of", "off",
    "on", "once", "only", "or", "other", "our", "ours", "ourselves", "out", "over", "own", "same", "she", "should",
    "so", "some", "such", "than", "that", "the", "their", "theirs", "them", "themselves", "then", "there", "these",
    "they", "this", "those", "through", "to", "too", "under", "until", "up", "very", "was", "we", "were", "what",
    "when", "where", "which", "while", "who", "whom", "why", "will", "with", "you", "your", "yours", "yourself",
    "yourselves",
];

const SPANISH_STOPWORDS: &[&str] = &[
    "a", "al", "algo", "algunas", "algunos", "ante", "antes", "como", "con", "contra", "cual", "cuando", "de", "del",
    "desde", "donde", "durante", "e", "el", "ella", "ellas", "ellos", "en", "entre", "era", "es", "esa", "esas",
    "ese", "eso", "esos", "esta", "estaba", "estado", "estar", "estas", "este", "esto", "estos", "fue", "ha", "hay",
    "la", "las", "le", "les", "lo", "los", "me", "mi", "mis", "mucho", "muy", "más", "mí", "nada", "ni", "no",
    "nos", "nosotros", "o", "os", "otra", "otros", "para", "pero", "poco", "por", "porque", "que", "qué", "se",
    "ser", "si", "sin", "sobre", "son", "su", "sus", "también", "te", "tiene", "todo", "todos", "tu", "tus", "tú",
    "un", "una", "uno", "unos", "y", "ya", "yo", "él",
];

/// Built-in English and Spanish stopwords, plus "solo"
pub static DEFAULT_STOPWORDS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    ENGLISH_STOPWORDS
        .iter()
        .chain(SPANISH_STOPWORDS)
        .chain(&["solo"])
        .copied()
        .collect()
});

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WordStats {
    /// Words left after stopword filtering
    pub total_words: usize,
    /// Most common words, most frequent first
    pub top_words: Vec<(String, usize)>,
}

/// Lowercase, split on whitespace, drop stopwords and count what is left.
///
/// Words with equal counts keep the order in which they first appeared.
pub fn word_stats(text: &str, stopwords: &HashSet<&str>, top_n: usize) -> WordStats {
    let lowered = text.to_lowercase();
    let words: Vec<&str> = lowered
        .split_whitespace()
        .filter(|w| !stopwords.contains(w))
        .collect();

    let mut counts: HashMap<&str, (usize, usize)> = HashMap::new();
    for (position, word) in words.iter().copied().enumerate() {
        counts.entry(word).or_insert((0, position)).0 += 1;
    }

    let mut ranked: Vec<(&str, usize, usize)> = counts
        .into_iter()
        .map(|(word, (count, first))| (word, count, first))
        .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.2.cmp(&b.2)));

    WordStats {
        total_words: words.len(),
        top_words: ranked
            .into_iter()
            .take(top_n)
            .map(|(word, count, _)| (word.to_string(), count))
            .collect(),
    }
}
