/// TF-IDF featurization
pub mod vectorizer;

/// One-vs-rest linear classification
pub mod linear;

use std::path::Path;

use crate::{
    pipelines::toxicity::{labels::LabelError, Classifier as ClassifierTrait, Scores},
    utils::files::read_json,
};

pub use linear::Linear;
pub use vectorizer::Vectorizer;

/// The name of the TF-IDF model family
pub static MODEL_TYPE: &str = "tfidf";

/// The serialized vectorizer file
pub static VECTORIZER_FILE: &str = "vectorizer.json";

/// The serialized classifier file
pub static CLASSIFIER_FILE: &str = "classifier.json";

/// Every artifact file needed to load the model
pub static ARTIFACT_FILES: &[&str; 2] = &[VECTORIZER_FILE, CLASSIFIER_FILE];

/// A TF-IDF vectorizer feeding a linear multi-label classifier
#[derive(Debug, Clone)]
pub struct Classifier {
    vectorizer: Vectorizer,
    linear: Linear,
}

impl Classifier {
    /// Combine a vectorizer and a classifier fitted on its features
    pub fn new(
        vectorizer: vectorizer::Config,
        linear: linear::Config,
    ) -> Result<Self, ArtifactError> {
        let vectorizer = Vectorizer::try_from(vectorizer)?;
        let linear = Linear::from_config(linear, vectorizer.n_features())?;

        Ok(Self { vectorizer, linear })
    }

    /// Load both artifacts from a directory
    pub async fn load<P: AsRef<Path>>(artifact_dir: P) -> anyhow::Result<Self> {
        let dir = artifact_dir.as_ref();

        log::info!("Loading vectorizer...");
        let vectorizer: vectorizer::Config = read_json(dir.join(VECTORIZER_FILE)).await?;

        log::info!("Loading classifier...");
        let linear: linear::Config = read_json(dir.join(CLASSIFIER_FILE)).await?;

        let classifier = Self::new(vectorizer, linear)?;
        log::debug!(
            "TF-IDF classifier ready with {} features",
            classifier.vectorizer.n_features()
        );

        Ok(classifier)
    }

    /// Scores for a single text
    pub fn score(&self, text: &str) -> Scores {
        self.linear.scores(&self.vectorizer.transform(text))
    }
}

impl ClassifierTrait for Classifier {
    fn scores(&self, texts: &[String]) -> anyhow::Result<Vec<Scores>> {
        Ok(texts.iter().map(|text| self.score(text)).collect())
    }
}

/// Artifact Error
#[derive(thiserror::Error, Debug)]
pub enum ArtifactError {
    /// The token pattern is not a valid regular expression
    #[error("invalid token pattern: {0}")]
    Pattern(#[from] regex::Error),

    /// The n-gram range is empty or starts at zero
    #[error("invalid n-gram range ({0}, {1})")]
    NgramRange(usize, usize),

    /// A vocabulary term points past the idf weights
    #[error("term {term:?} maps to column {index}, but there are only {n_features} features")]
    VocabularyIndex {
        /// The offending term
        term: String,
        /// Its column
        index: usize,
        /// The number of idf weights
        n_features: usize,
    },

    /// The classifier labels are not the toxicity categories
    #[error(transparent)]
    Labels(#[from] LabelError),

    /// Labels, weights, and biases disagree on the number of outputs
    #[error("classifier has {labels} labels, {coef} weight rows and {intercept} biases")]
    LabelCount {
        /// Label count
        labels: usize,
        /// Weight row count
        coef: usize,
        /// Bias count
        intercept: usize,
    },

    /// A weight row does not match the vectorizer's feature count
    #[error("weights for {label} have {actual} columns, expected {expected}")]
    FeatureCount {
        /// The label of the row
        label: String,
        /// The vectorizer's feature count
        expected: usize,
        /// The row's length
        actual: usize,
    },
}
