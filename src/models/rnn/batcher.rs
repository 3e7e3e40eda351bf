use burn::tensor::{backend::Backend, Int, Tensor};
use derive_new::new;
use tokenizers::Tokenizer;

use crate::utils::tensors::{pad_to, Side};

use super::{Config, ModelError};

/// An inference batch for toxicity classification
#[derive(Debug, Clone, new)]
pub struct Infer<B: Backend> {
    /// Tokenized text as 2D tensor: [batch_size, max_seq_length]
    pub tokens: Tensor<B, 2, Int>,
}

/// Struct for batching texts into fixed-width token tensors
#[derive(Clone)]
pub struct Batcher<B: Backend> {
    /// Tokenizer for converting text to token IDs
    pub tokenizer: Tokenizer,

    /// Every sequence is truncated or padded to this length
    pub max_seq_length: usize,

    /// ID of the padding token
    pub pad_token_id: usize,

    /// Token IDs must be below this bound
    pub vocab_size: usize,

    /// Where padding is inserted
    pub padding: Side,

    /// Where excess tokens are dropped
    pub truncating: Side,

    /// Device on which to perform computation (e.g., CPU or CUDA device)
    pub device: B::Device,
}

impl<B: Backend> Batcher<B> {
    /// Creates a new batcher
    pub fn new(tokenizer: Tokenizer, config: &Config, device: B::Device) -> Self {
        Self {
            tokenizer,
            max_seq_length: config.max_seq_len,
            pad_token_id: config.pad_token_id,
            vocab_size: config.vocab_size,
            padding: config.padding,
            truncating: config.truncating,
            device,
        }
    }

    /// Tokenize a single text without special tokens
    pub fn encode(&self, text: &str) -> Result<Vec<usize>, ModelError> {
        let encoding = self
            .tokenizer
            .encode(text, false)
            .map_err(|e| ModelError::Tokenizer(e.to_string()))?;

        encoding
            .get_ids()
            .iter()
            .map(|id| *id as usize)
            .map(|id| {
                if id < self.vocab_size {
                    Ok(id)
                } else {
                    Err(ModelError::TokenOutOfRange {
                        id,
                        vocab_size: self.vocab_size,
                    })
                }
            })
            .collect()
    }

    /// Collects texts into an inference batch
    pub fn batch(&self, items: &[String]) -> Result<Infer<B>, ModelError> {
        let token_ids_list = items
            .iter()
            .map(|text| self.encode(text))
            .collect::<Result<Vec<_>, _>>()?;

        let tokens = pad_to(
            self.pad_token_id,
            token_ids_list,
            self.max_seq_length,
            self.padding,
            self.truncating,
            &self.device,
        );

        Ok(Infer::new(tokens))
    }
}
