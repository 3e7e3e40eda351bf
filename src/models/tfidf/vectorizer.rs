use std::collections::{HashMap, HashSet};

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::ArtifactError;

/// The default word pattern: runs of two or more word characters
pub static DEFAULT_TOKEN_PATTERN: &str = r"(?u)\b\w\w+\b";

lazy_static! {
    static ref DEFAULT_TOKEN_REGEX: Regex =
        Regex::new(DEFAULT_TOKEN_PATTERN).expect("default token pattern is valid");
}

/// Row normalization applied after TF-IDF weighting
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Norm {
    /// Divide by the sum of absolute values
    L1,
    /// Divide by the euclidean length
    L2,
}

/// The serialized vectorizer, as fitted by training
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Lowercase text before tokenizing
    #[serde(default = "default_lowercase")]
    pub lowercase: bool,

    /// Regular expression selecting tokens
    #[serde(default = "default_token_pattern")]
    pub token_pattern: String,

    /// Tokens removed before building n-grams
    #[serde(default)]
    pub stop_words: Option<Vec<String>>,

    /// Inclusive range of word n-gram sizes
    #[serde(default = "default_ngram_range")]
    pub ngram_range: (usize, usize),

    /// Use presence instead of counts
    #[serde(default)]
    pub binary: bool,

    /// Replace term frequency `tf` with `1 + ln(tf)`
    #[serde(default)]
    pub sublinear_tf: bool,

    /// Row normalization, or none
    #[serde(default = "default_norm")]
    pub norm: Option<Norm>,

    /// Term to feature column
    pub vocabulary: HashMap<String, usize>,

    /// Inverse document frequency per feature column
    pub idf: Vec<f32>,
}

fn default_lowercase() -> bool {
    true
}

fn default_token_pattern() -> String {
    DEFAULT_TOKEN_PATTERN.to_string()
}

fn default_ngram_range() -> (usize, usize) {
    (1, 1)
}

fn default_norm() -> Option<Norm> {
    Some(Norm::L2)
}

impl Config {
    /// Create a unigram, l2-normalized config with the given vocabulary and weights
    pub fn new(vocabulary: HashMap<String, usize>, idf: Vec<f32>) -> Self {
        Self {
            lowercase: default_lowercase(),
            token_pattern: default_token_pattern(),
            stop_words: None,
            ngram_range: default_ngram_range(),
            binary: false,
            sublinear_tf: false,
            norm: default_norm(),
            vocabulary,
            idf,
        }
    }
}

/// A sparse feature row, sorted by column
pub type SparseRow = Vec<(usize, f32)>;

/// Turns text into TF-IDF weighted sparse feature rows
#[derive(Debug, Clone)]
pub struct Vectorizer {
    lowercase: bool,
    token_regex: Regex,
    stop_words: HashSet<String>,
    ngram_range: (usize, usize),
    binary: bool,
    sublinear_tf: bool,
    norm: Option<Norm>,
    vocabulary: HashMap<String, usize>,
    idf: Vec<f32>,
}

impl TryFrom<Config> for Vectorizer {
    type Error = ArtifactError;

    fn try_from(config: Config) -> Result<Self, Self::Error> {
        let (min_n, max_n) = config.ngram_range;
        if min_n == 0 || min_n > max_n {
            return Err(ArtifactError::NgramRange(min_n, max_n));
        }

        let n_features = config.idf.len();
        if let Some((term, index)) = config.vocabulary.iter().find(|(_, i)| **i >= n_features) {
            return Err(ArtifactError::VocabularyIndex {
                term: term.clone(),
                index: *index,
                n_features,
            });
        }

        let token_regex = if config.token_pattern == DEFAULT_TOKEN_PATTERN {
            DEFAULT_TOKEN_REGEX.clone()
        } else {
            Regex::new(&config.token_pattern)?
        };

        Ok(Self {
            lowercase: config.lowercase,
            token_regex,
            stop_words: config.stop_words.unwrap_or_default().into_iter().collect(),
            ngram_range: config.ngram_range,
            binary: config.binary,
            sublinear_tf: config.sublinear_tf,
            norm: config.norm,
            vocabulary: config.vocabulary,
            idf: config.idf,
        })
    }
}

impl Vectorizer {
    /// The number of feature columns
    pub fn n_features(&self) -> usize {
        self.idf.len()
    }

    /// Split text into word n-gram terms
    pub fn analyze(&self, text: &str) -> Vec<String> {
        let text = if self.lowercase {
            text.to_lowercase()
        } else {
            text.to_string()
        };

        let tokens: Vec<&str> = self
            .token_regex
            .find_iter(&text)
            .map(|m| m.as_str())
            .filter(|token| !self.stop_words.contains(*token))
            .collect();

        let (min_n, max_n) = self.ngram_range;
        let mut terms = Vec::new();

        for n in min_n..=max_n.min(tokens.len()) {
            if n == 1 {
                terms.extend(tokens.iter().map(|t| t.to_string()));
            } else {
                terms.extend(tokens.windows(n).map(|window| window.join(" ")));
            }
        }

        terms
    }

    /// Compute the TF-IDF feature row for a text
    pub fn transform(&self, text: &str) -> SparseRow {
        let mut counts: HashMap<usize, f32> = HashMap::new();

        for term in self.analyze(text) {
            if let Some(index) = self.vocabulary.get(&term) {
                *counts.entry(*index).or_default() += 1.0;
            }
        }

        let mut row: SparseRow = counts
            .into_iter()
            .map(|(index, count)| {
                let mut tf = if self.binary { 1.0 } else { count };
                if self.sublinear_tf {
                    tf = 1.0 + tf.ln();
                }

                (index, tf * self.idf[index])
            })
            .collect();

        row.sort_unstable_by_key(|(index, _)| *index);

        let length = match self.norm {
            Some(Norm::L1) => row.iter().map(|(_, v)| v.abs()).sum::<f32>(),
            Some(Norm::L2) => row.iter().map(|(_, v)| v * v).sum::<f32>().sqrt(),
            None => 1.0,
        };

        if length > 0.0 {
            row.iter_mut().for_each(|(_, v)| *v /= length);
        }

        row
    }
}
