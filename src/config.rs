use std::{collections::HashMap, path::PathBuf};

use serde::{Deserialize, Serialize};

use crate::{
    cli::{Device, Model},
    pipelines::toxicity::{output::DEFAULT_THRESHOLD, Category, Thresholds},
    utils::files::read_yaml,
};

/// Runtime settings, read from YAML and overridden by command line flags
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// The model family to load
    pub model: Model,

    /// Directory holding the model artifacts
    pub artifact_dir: PathBuf,

    /// A Hugging Face Hub repo to fetch artifacts from instead of `artifact_dir`
    pub hub_repo: Option<String>,

    /// Device for the recurrent model
    pub device: Device,

    /// Threshold applied to every category
    pub threshold: f32,

    /// Category-specific thresholds
    pub thresholds: HashMap<Category, f32>,

    /// Override the recurrent model's sequence length
    pub max_seq_len: Option<usize>,

    /// Number of texts scored per model call
    pub batch_size: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            model: Model::default(),
            artifact_dir: PathBuf::from("data/model"),
            hub_repo: None,
            device: Device::default(),
            threshold: DEFAULT_THRESHOLD,
            thresholds: HashMap::new(),
            max_seq_len: None,
            batch_size: 32,
        }
    }
}

impl Settings {
    /// Load settings from a YAML file; missing fields keep their defaults
    pub async fn load(path: &str) -> anyhow::Result<Self> {
        let settings: Settings = read_yaml(path).await?;
        settings.validate()?;

        Ok(settings)
    }

    /// Check value ranges
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.batch_size == 0 {
            return Err(anyhow!("batch_size must be at least 1"));
        }

        if let Some(0) = self.max_seq_len {
            return Err(anyhow!("max_seq_len must be at least 1"));
        }

        let out_of_range = std::iter::once(self.threshold)
            .chain(self.thresholds.values().copied())
            .find(|t| !(0.0..=1.0).contains(t));
        if let Some(threshold) = out_of_range {
            return Err(anyhow!("threshold {} is outside [0, 1]", threshold));
        }

        Ok(())
    }

    /// The decision thresholds to apply to scores
    pub fn thresholds(&self) -> Thresholds {
        Thresholds {
            default: self.threshold,
            overrides: self.thresholds.clone(),
        }
    }
}
