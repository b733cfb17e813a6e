//! TF-IDF text vectorizer for transaction descriptions
//!
//! Descriptions are lowercased and split into runs of two or more word
//! characters; English stop-words are dropped. Term weights use smoothed
//! inverse document frequency `ln((1 + n) / (1 + df)) + 1` and each row is
//! L2-normalized. The vocabulary is a sorted map so feature indices are
//! stable across runs and processes.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Common English words carrying no category signal
const STOP_WORDS: &[&str] = &[
    "a", "about", "above", "across", "after", "afterwards", "again", "against", "all", "almost",
    "alone", "along", "already", "also", "although", "always", "am", "among", "amongst", "an",
    "and", "another", "any", "anyhow", "anyone", "anything", "anyway", "anywhere", "are",
    "around", "as", "at", "back", "be", "became", "because", "become", "becomes", "becoming",
    "been", "before", "beforehand", "behind", "being", "below", "beside", "besides", "between",
    "beyond", "both", "but", "by", "can", "cannot", "could", "do", "done", "down", "due",
    "during", "each", "eg", "either", "else", "elsewhere", "enough", "etc", "even", "ever",
    "every", "everyone", "everything", "everywhere", "except", "few", "for", "former",
    "formerly", "from", "further", "had", "has", "have", "he", "hence", "her", "here",
    "hereafter", "hereby", "herein", "hereupon", "hers", "herself", "him", "himself", "his",
    "how", "however", "ie", "if", "in", "inc", "indeed", "into", "is", "it", "its", "itself",
    "just", "keep", "last", "latter", "latterly", "least", "less", "ltd", "made", "many", "may",
    "me", "meanwhile", "might", "mine", "more", "moreover", "most", "mostly", "much", "must",
    "my", "myself", "namely", "neither", "never", "nevertheless", "next", "no", "nobody",
    "none", "noone", "nor", "not", "nothing", "now", "nowhere", "of", "off", "often", "on",
    "once", "one", "only", "onto", "or", "other", "others", "otherwise", "our", "ours",
    "ourselves", "out", "over", "own", "per", "perhaps", "please", "rather", "re", "same",
    "see", "seem", "seemed", "seeming", "seems", "several", "she", "should", "since", "so",
    "some", "somehow", "someone", "something", "sometime", "sometimes", "somewhere", "still",
    "such", "than", "that", "the", "their", "them", "themselves", "then", "thence", "there",
    "thereafter", "thereby", "therefore", "therein", "thereupon", "these", "they", "this",
    "those", "though", "through", "throughout", "thru", "thus", "to", "together", "too",
    "toward", "towards", "under", "until", "up", "upon", "us", "very", "via", "was", "we",
    "well", "were", "what", "whatever", "when", "whence", "whenever", "where", "whereafter",
    "whereas", "whereby", "wherein", "whereupon", "wherever", "whether", "which", "while",
    "whither", "who", "whoever", "whole", "whom", "whose", "why", "will", "with", "within",
    "without", "would", "yet", "you", "your", "yours", "yourself", "yourselves",
];

fn token_regex() -> &'static Regex {
    static TOKEN_RE: OnceLock<Regex> = OnceLock::new();
    TOKEN_RE.get_or_init(|| Regex::new(r"\b\w\w+\b").expect("valid regex"))
}

fn is_stop_word(token: &str) -> bool {
    STOP_WORDS.binary_search(&token).is_ok()
}

/// Split a description into lowercase terms, dropping stop-words
pub fn tokenize(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    token_regex()
        .find_iter(&lowered)
        .map(|m| m.as_str())
        .filter(|t| !is_stop_word(t))
        .map(str::to_string)
        .collect()
}

/// A fitted TF-IDF vectorizer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TfIdfVectorizer {
    /// Term → feature index
    vocabulary: BTreeMap<String, usize>,
    /// Inverse document frequency per feature index
    idf: Vec<f64>,
}

impl TfIdfVectorizer {
    /// Learn vocabulary and idf weights from a corpus
    pub fn fit<S: AsRef<str>>(documents: &[S]) -> Result<Self> {
        let tokenized: Vec<BTreeSet<String>> = documents
            .iter()
            .map(|d| tokenize(d.as_ref()).into_iter().collect())
            .collect();

        let terms: BTreeSet<&String> = tokenized.iter().flatten().collect();
        if terms.is_empty() {
            return Err(Error::Training(
                "Empty vocabulary: every description consists of stop-words or symbols".into(),
            ));
        }

        let vocabulary: BTreeMap<String, usize> = terms
            .into_iter()
            .enumerate()
            .map(|(i, t)| (t.clone(), i))
            .collect();

        let mut df = vec![0usize; vocabulary.len()];
        for doc in &tokenized {
            for term in doc {
                if let Some(&idx) = vocabulary.get(term) {
                    df[idx] += 1;
                }
            }
        }

        let n = documents.len() as f64;
        let idf = df
            .iter()
            .map(|&d| ((1.0 + n) / (1.0 + d as f64)).ln() + 1.0)
            .collect();

        Ok(Self { vocabulary, idf })
    }

    /// Number of features produced by `transform`
    pub fn n_features(&self) -> usize {
        self.vocabulary.len()
    }

    /// Vectorize one description. Text with no known terms yields an
    /// all-zero row.
    pub fn transform(&self, text: &str) -> Vec<f64> {
        let mut row = vec![0.0; self.n_features()];
        for token in tokenize(text) {
            if let Some(&idx) = self.vocabulary.get(&token) {
                row[idx] += 1.0;
            }
        }

        for (value, idf) in row.iter_mut().zip(&self.idf) {
            *value *= idf;
        }

        let norm = row.iter().map(|v| v * v).sum::<f64>().sqrt();
        if norm > 0.0 {
            for value in row.iter_mut() {
                *value /= norm;
            }
        }

        row
    }

    pub fn transform_batch<S: AsRef<str>>(&self, documents: &[S]) -> Vec<Vec<f64>> {
        documents.iter().map(|d| self.transform(d.as_ref())).collect()
    }

    /// True if `text` contains at least one vocabulary term
    pub fn has_known_terms(&self, text: &str) -> bool {
        tokenize(text)
            .iter()
            .any(|t| self.vocabulary.contains_key(t))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stop_words_sorted_for_binary_search() {
        let mut sorted = STOP_WORDS.to_vec();
        sorted.sort_unstable();
        assert_eq!(sorted, STOP_WORDS);
    }

    #[test]
    fn test_tokenize_drops_stop_words_and_short_tokens() {
        assert_eq!(
            tokenize("The Starbucks Coffee at 5th & Main"),
            vec!["starbucks", "coffee", "5th", "main"]
        );
        assert!(tokenize("a & b").is_empty());
    }

    #[test]
    fn test_fit_rejects_empty_vocabulary() {
        assert!(TfIdfVectorizer::fit(&["the", "and of", "!!"]).is_err());
    }

    #[test]
    fn test_transform_is_l2_normalized() {
        let vectorizer =
            TfIdfVectorizer::fit(&["Grocery Store", "Walmart Grocery", "Gas Station"]).unwrap();
        let row = vectorizer.transform("walmart grocery");
        let norm: f64 = row.iter().map(|v| v * v).sum::<f64>().sqrt();
        assert!((norm - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_rare_terms_weigh_more() {
        let vectorizer =
            TfIdfVectorizer::fit(&["Grocery Store", "Walmart Grocery", "Gas Station"]).unwrap();
        let row = vectorizer.transform("walmart grocery");
        let walmart = vectorizer.vocabulary["walmart"];
        let grocery = vectorizer.vocabulary["grocery"];
        assert!(row[walmart] > row[grocery]);
    }

    #[test]
    fn test_unknown_text_is_zero_row() {
        let vectorizer = TfIdfVectorizer::fit(&["Monthly Rent"]).unwrap();
        assert!(vectorizer.transform("\u{0}\u{1}\u{fffd}").iter().all(|v| *v == 0.0));
        assert!(!vectorizer.has_known_terms("completely novel merchant"));
        assert!(vectorizer.has_known_terms("RENT payment"));
    }
}
