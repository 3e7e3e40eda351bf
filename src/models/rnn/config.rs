use burn::{
    config::Config as _,
    nn::{lstm::LstmConfig, EmbeddingConfig, LinearConfig},
    tensor::backend::Backend,
};
use serde::{Deserialize, Serialize};

use crate::utils::tensors::Side;

use super::{Model, ModelError};

/// How LSTM hidden states are reduced over time
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Pooling {
    /// Element-wise maximum over every timestep
    Max,

    /// The hidden state of the final timestep
    Last,
}

/// Recurrent toxicity model configuration
#[derive(burn::config::Config)]
pub struct Config {
    /// Number of rows in the embedding table
    pub vocab_size: usize,

    /// Label name for each output column
    pub labels: Vec<String>,

    /// Embedding width
    #[config(default = 128)]
    pub embedding_size: usize,

    /// LSTM hidden state width
    #[config(default = 64)]
    pub hidden_size: usize,

    /// Width of the dense layer before the output
    #[config(default = 50)]
    pub dense_size: usize,

    /// Fixed number of tokens fed to the network
    #[config(default = 50)]
    pub max_seq_len: usize,

    /// ID of the padding token
    #[config(default = 0)]
    pub pad_token_id: usize,

    /// Where padding is inserted
    #[config(default = "Side::Pre")]
    pub padding: Side,

    /// Where excess tokens are dropped
    #[config(default = "Side::Pre")]
    pub truncating: Side,

    /// Reduction over timesteps
    #[config(default = "Pooling::Max")]
    pub pooling: Pooling,
}

impl Config {
    /// Initialize a model with fresh weights
    pub fn init<B: Backend>(&self, device: &B::Device) -> Model<B> {
        Model {
            embedding: EmbeddingConfig::new(self.vocab_size, self.embedding_size).init(device),
            lstm: LstmConfig::new(self.embedding_size, self.hidden_size, true).init(device),
            dense: LinearConfig::new(self.hidden_size, self.dense_size).init(device),
            output: LinearConfig::new(self.dense_size, self.labels.len()).init(device),
            max_pool: self.pooling == Pooling::Max,
        }
    }

    /// Check that every padded batch can be embedded and pooled
    pub fn validate(&self) -> Result<(), ModelError> {
        if self.vocab_size == 0 {
            return Err(ModelError::EmptyVocabulary);
        }

        if self.pad_token_id >= self.vocab_size {
            return Err(ModelError::PadTokenOutOfRange {
                pad_token_id: self.pad_token_id,
                vocab_size: self.vocab_size,
            });
        }

        if self.max_seq_len == 0 {
            return Err(ModelError::EmptySequence);
        }

        Ok(())
    }

    /// Load a configuration file, reporting the path on failure
    pub fn load_file(path: &std::path::Path) -> anyhow::Result<Self> {
        Self::load(path).map_err(|e| anyhow!("Unable to load config file {}: {}", path.display(), e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use burn::config::Config as _;
    use pretty_assertions::assert_eq;

    #[test]
    fn defaults_to_fifty_tokens_with_pre_padding() {
        let config = Config::new(1000, vec!["toxic".to_string()]);

        assert_eq!(config.max_seq_len, 50);
        assert_eq!(config.padding, Side::Pre);
        assert_eq!(config.truncating, Side::Pre);
        assert_eq!(config.pooling, Pooling::Max);
    }

    #[test]
    fn round_trips_through_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let config = Config::new(10, vec!["toxic".to_string()])
            .with_padding(Side::Post)
            .with_pooling(Pooling::Last);
        config.save(&path).unwrap();

        let loaded = Config::load_file(&path).unwrap();
        assert_eq!(loaded.padding, Side::Post);
        assert_eq!(loaded.pooling, Pooling::Last);
        assert_eq!(loaded.labels, vec!["toxic".to_string()]);
    }
}
