use std::fmt::Display;

use serde::{Deserialize, Serialize};

use crate::models::{rnn, tfidf};

/// Available Models
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Model {
    /// TF-IDF features with a one-vs-rest linear classifier
    #[default]
    Tfidf,

    /// Word tokenizer with an LSTM network
    Rnn,
}

impl Model {
    /// Get the model type
    pub fn model_type(&self) -> &'static str {
        match self {
            Model::Tfidf => tfidf::MODEL_TYPE,
            Model::Rnn => rnn::MODEL_TYPE,
        }
    }

    /// The files that make up a saved model of this type
    pub fn artifact_files(&self) -> &'static [&'static str] {
        match self {
            Model::Tfidf => tfidf::ARTIFACT_FILES,
            Model::Rnn => rnn::ARTIFACT_FILES,
        }
    }
}

impl Display for Model {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.model_type())
    }
}

impl TryFrom<&str> for Model {
    type Error = ModelError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.to_lowercase().as_str() {
            "tfidf" | "tf-idf" => Ok(Model::Tfidf),
            "rnn" | "lstm" => Ok(Model::Rnn),
            _ => Err(ModelError::Unknown(value.to_string())),
        }
    }
}

/// Model Error
#[derive(thiserror::Error, Debug)]
pub enum ModelError {
    /// No model found for the given string
    #[error("no model found for {0}")]
    Unknown(String),
}
