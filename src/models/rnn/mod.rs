/// Model configuration
pub mod config;

/// The recurrent network
pub mod model;

/// Tokenization and batching
pub mod batcher;

use std::path::Path;

use burn::{
    config::Config as _,
    module::Module,
    record::{CompactRecorder, Recorder},
    tensor::backend::Backend,
};
use tokenizers::Tokenizer;

use crate::pipelines::toxicity::{
    labels::{resolve_labels, LabelError},
    Category, Classifier as ClassifierTrait, Scores,
};

pub use batcher::{Batcher, Infer};
pub use config::{Config, Pooling};
pub use model::Model;

/// The name of the recurrent model family
pub static MODEL_TYPE: &str = "rnn";

/// The serialized model configuration
pub static CONFIG_FILE: &str = "config.json";

/// The serialized tokenizer
pub static TOKENIZER_FILE: &str = "tokenizer.json";

/// The weights record, without the extension the recorder adds
pub static MODEL_FILE_STEM: &str = "model";

/// The weights record as written to disk
pub static MODEL_FILE: &str = "model.mpk.gz";

/// Every artifact file needed to load the model
pub static ARTIFACT_FILES: &[&str; 3] = &[CONFIG_FILE, TOKENIZER_FILE, MODEL_FILE];

/// A tokenizer feeding a recurrent multi-label network
pub struct Classifier<B: Backend> {
    config: Config,
    model: Model<B>,
    batcher: Batcher<B>,
    columns: Vec<Category>,
}

impl<B: Backend> Classifier<B> {
    /// Assemble a classifier from an already-built model
    pub fn new(
        config: Config,
        model: Model<B>,
        tokenizer: Tokenizer,
        device: B::Device,
    ) -> Result<Self, ModelError> {
        config.validate()?;
        let columns = resolve_labels(&config.labels)?;
        let batcher = Batcher::new(tokenizer, &config, device);

        Ok(Self {
            config,
            model,
            batcher,
            columns,
        })
    }

    /// Load configuration, tokenizer, and weights from a directory
    pub fn load<P: AsRef<Path>>(
        artifact_dir: P,
        device: B::Device,
        max_seq_len: Option<usize>,
    ) -> anyhow::Result<Self> {
        let dir = artifact_dir.as_ref();

        let mut config = Config::load_file(&dir.join(CONFIG_FILE))?;
        if let Some(max_seq_len) = max_seq_len {
            config.max_seq_len = max_seq_len;
        }
        config.validate()?;

        log::info!("Loading tokenizer...");
        let tokenizer = Tokenizer::from_file(dir.join(TOKENIZER_FILE))
            .map_err(|e| anyhow!("Unable to load tokenizer: {}", e))?;

        log::info!("Loading weights...");
        let record = CompactRecorder::new()
            .load(dir.join(MODEL_FILE_STEM), &device)
            .map_err(|e| anyhow!("Unable to load trained model weights: {}", e))?;

        log::info!("Creating model...");
        let model = config.init::<B>(&device).load_record(record);

        log::debug!(
            "RNN classifier ready: vocab {}, sequence length {}",
            config.vocab_size,
            config.max_seq_len
        );

        Ok(Self::new(config, model, tokenizer, device)?)
    }

    /// Write configuration, tokenizer, and weights to a directory
    pub fn save<P: AsRef<Path>>(&self, artifact_dir: P) -> anyhow::Result<()> {
        let dir = artifact_dir.as_ref();
        std::fs::create_dir_all(dir)?;

        self.config
            .save(dir.join(CONFIG_FILE))
            .map_err(|e| anyhow!("Unable to save config: {}", e))?;

        self.batcher
            .tokenizer
            .save(dir.join(TOKENIZER_FILE), false)
            .map_err(|e| anyhow!("Unable to save tokenizer: {}", e))?;

        self.model
            .clone()
            .save_file(dir.join(MODEL_FILE_STEM), &CompactRecorder::new())
            .map_err(|e| anyhow!("Unable to save model weights: {}", e))?;

        Ok(())
    }

    /// The active configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The batcher used to shape input
    pub fn batcher(&self) -> &Batcher<B> {
        &self.batcher
    }
}

impl<B: Backend> ClassifierTrait for Classifier<B> {
    fn scores(&self, texts: &[String]) -> anyhow::Result<Vec<Scores>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let item = self.batcher.batch(texts)?;
        let logits = self.model.forward(item.tokens);

        let values: Vec<f64> = logits
            .into_data()
            .convert::<f32>()
            .value
            .into_iter()
            .map(f64::from)
            .collect();

        Ok(values
            .chunks(self.columns.len())
            .map(|row| Scores::from_logits(&self.columns, row))
            .collect())
    }
}

/// Model Error
#[derive(thiserror::Error, Debug)]
pub enum ModelError {
    /// The tokenizer failed to encode a text
    #[error("unable to encode text: {0}")]
    Tokenizer(String),

    /// The tokenizer produced an ID outside the embedding table
    #[error("token id {id} is outside the vocabulary of {vocab_size}")]
    TokenOutOfRange {
        /// The token ID
        id: usize,
        /// The embedding table size
        vocab_size: usize,
    },

    /// The configured labels are not the toxicity categories
    #[error(transparent)]
    Labels(#[from] LabelError),

    /// The embedding table has no rows
    #[error("vocab_size must be at least 1")]
    EmptyVocabulary,

    /// The padding token falls outside the embedding table
    #[error("pad token id {pad_token_id} is outside the vocabulary of {vocab_size}")]
    PadTokenOutOfRange {
        /// The padding token ID
        pad_token_id: usize,
        /// The embedding table size
        vocab_size: usize,
    },

    /// Sequences would be padded to nothing
    #[error("max_seq_len must be at least 1")]
    EmptySequence,
}
