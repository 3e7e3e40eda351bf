/// Toxicity categories
pub mod labels;

/// Scores, thresholds, and predictions
pub mod output;

/// Evaluation metrics
pub mod metrics;

use std::path::{Path, PathBuf};

use burn::backend::{ndarray::NdArrayDevice, NdArray};

use crate::{
    cli::{Device, Model},
    config::Settings,
    models::{rnn, tfidf},
    utils::hugging_face::download_artifacts,
};

pub use labels::Category;
pub use output::{Prediction, Scores, Thresholds};

/// A model that scores texts for every toxicity category
pub trait Classifier {
    /// Score a batch of texts, returning one entry per text in input order
    fn scores(&self, texts: &[String]) -> anyhow::Result<Vec<Scores>>;
}

/// Toxicity Classification Pipeline
pub struct Pipeline {
    classifier: Box<dyn Classifier>,
    thresholds: Thresholds,
    batch_size: usize,
}

impl Pipeline {
    /// Wrap a classifier with decision thresholds
    pub fn new(classifier: Box<dyn Classifier>, thresholds: Thresholds) -> Self {
        Self {
            classifier,
            thresholds,
            batch_size: 32,
        }
    }

    /// Limit how many texts are scored per model call
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    /// The thresholds applied to scores
    pub fn thresholds(&self) -> &Thresholds {
        &self.thresholds
    }

    /// Predict every category for each text
    pub fn predict(&self, texts: &[String]) -> anyhow::Result<Vec<Prediction>> {
        let mut predictions = Vec::with_capacity(texts.len());

        for chunk in texts.chunks(self.batch_size) {
            let scores = self.classifier.scores(chunk)?;

            if scores.len() != chunk.len() {
                return Err(anyhow!(
                    "classifier returned {} scores for {} texts",
                    scores.len(),
                    chunk.len()
                ));
            }

            predictions.extend(
                chunk
                    .iter()
                    .zip(scores)
                    .map(|(text, scores)| {
                        Prediction::from_scores(text.clone(), scores, &self.thresholds)
                    }),
            );
        }

        Ok(predictions)
    }

    /// Predict every category for a single text
    pub fn predict_one(&self, text: &str) -> anyhow::Result<Prediction> {
        self.predict(&[text.to_string()])?
            .pop()
            .ok_or_else(|| anyhow!("classifier returned no prediction"))
    }

    /// Whether the text is flagged under the `toxic` label
    pub fn is_toxic(&self, text: &str) -> anyhow::Result<bool> {
        Ok(self.predict_one(text)?.is_toxic())
    }
}

/// Resolve the artifact directory, downloading from the Hub when a repo is configured
pub async fn resolve_artifacts(settings: &Settings) -> anyhow::Result<PathBuf> {
    match &settings.hub_repo {
        Some(repo) => download_artifacts(repo, settings.model.artifact_files()).await,
        None => Ok(settings.artifact_dir.clone()),
    }
}

/// Build a pipeline for the configured model
pub async fn load(settings: &Settings) -> anyhow::Result<Pipeline> {
    settings.validate()?;

    let artifact_dir = resolve_artifacts(settings).await?;
    log::info!(
        "Loading {} model from {}",
        settings.model,
        artifact_dir.display()
    );

    let classifier: Box<dyn Classifier> = match settings.model {
        Model::Tfidf => Box::new(tfidf::Classifier::load(&artifact_dir).await?),
        Model::Rnn => load_rnn(&artifact_dir, settings)?,
    };

    Ok(Pipeline::new(classifier, settings.thresholds()).with_batch_size(settings.batch_size))
}

fn load_rnn(artifact_dir: &Path, settings: &Settings) -> anyhow::Result<Box<dyn Classifier>> {
    match settings.device {
        Device::Cpu => Ok(Box::new(rnn::Classifier::<NdArray>::load(
            artifact_dir,
            NdArrayDevice::Cpu,
            settings.max_seq_len,
        )?)),

        #[cfg(feature = "tch")]
        Device::Cuda => {
            use burn::backend::{libtorch::LibTorchDevice, LibTorch};

            Ok(Box::new(rnn::Classifier::<LibTorch>::load(
                artifact_dir,
                LibTorchDevice::Cuda(0),
                settings.max_seq_len,
            )?))
        }

        #[cfg(not(feature = "tch"))]
        Device::Cuda => Err(crate::cli::devices::DeviceError::Unavailable(Device::Cuda).into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::{cell::RefCell, rc::Rc};

    /// Scores each text by its length and records batch sizes
    struct LengthClassifier {
        batches: Rc<RefCell<Vec<usize>>>,
    }

    impl Classifier for LengthClassifier {
        fn scores(&self, texts: &[String]) -> anyhow::Result<Vec<Scores>> {
            self.batches.borrow_mut().push(texts.len());

            Ok(texts
                .iter()
                .map(|t| {
                    let score = (t.len() as f32 / 10.0).min(1.0);
                    Scores::new([score, 0.0, 0.0, 0.0, score, 0.0])
                })
                .collect())
        }
    }

    fn pipeline(batch_size: usize) -> (Pipeline, Rc<RefCell<Vec<usize>>>) {
        let batches = Rc::new(RefCell::new(Vec::new()));
        let classifier = LengthClassifier {
            batches: batches.clone(),
        };

        let pipeline =
            Pipeline::new(Box::new(classifier), Thresholds::default()).with_batch_size(batch_size);

        (pipeline, batches)
    }

    #[test]
    fn keeps_input_order_across_batches() {
        let texts: Vec<String> = ["a", "long enough text", "bb", "another long one", "c"]
            .iter()
            .map(|s| s.to_string())
            .collect();

        let (pipeline, batches) = pipeline(2);
        let predictions = pipeline.predict(&texts).unwrap();

        assert_eq!(*batches.borrow(), vec![2, 2, 1]);
        assert_eq!(predictions.len(), 5);
        assert_eq!(predictions[1].text, "long enough text");
        assert_eq!(
            predictions.iter().map(Prediction::is_toxic).collect::<Vec<_>>(),
            vec![false, true, false, true, false]
        );
        assert_eq!(predictions[3].labels, vec![Category::Toxic, Category::Insult]);
    }

    #[test]
    fn empty_input_gives_empty_output() {
        let (pipeline, batches) = pipeline(4);

        assert!(pipeline.predict(&[]).unwrap().is_empty());
        assert!(batches.borrow().is_empty());
    }

    #[test]
    fn is_toxic_uses_the_toxic_label() {
        let (pipeline, _) = pipeline(8);

        assert!(pipeline.is_toxic("you absolute fool").unwrap());
        assert!(!pipeline.is_toxic("hi").unwrap());
    }

    #[test]
    fn cuda_requires_the_tch_feature() {
        let settings = Settings {
            model: Model::Rnn,
            device: Device::Cuda,
            ..Default::default()
        };

        if !Device::Cuda.is_available() {
            let err = load_rnn(&settings.artifact_dir, &settings).err().unwrap();
            assert!(err.to_string().contains("tch"));
        }
    }
}
