use serde::{Deserialize, Serialize};

use crate::pipelines::toxicity::{labels::resolve_labels, Category, Scores};

use super::{vectorizer::SparseRow, ArtifactError};

/// The serialized one-vs-rest linear classifier
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Label name for each row of `coef`
    pub labels: Vec<String>,

    /// Weights, one row per label and one column per feature
    pub coef: Vec<Vec<f32>>,

    /// Bias per label
    pub intercept: Vec<f32>,
}

/// One binary linear model per toxicity category
#[derive(Debug, Clone)]
pub struct Linear {
    columns: Vec<Category>,
    coef: Vec<Vec<f32>>,
    intercept: Vec<f32>,
}

impl Linear {
    /// Validate a serialized classifier against the vectorizer's feature count
    pub fn from_config(config: Config, n_features: usize) -> Result<Self, ArtifactError> {
        let columns = resolve_labels(&config.labels)?;

        if config.coef.len() != columns.len() || config.intercept.len() != columns.len() {
            return Err(ArtifactError::LabelCount {
                labels: columns.len(),
                coef: config.coef.len(),
                intercept: config.intercept.len(),
            });
        }

        if let Some((row, weights)) = config
            .coef
            .iter()
            .enumerate()
            .find(|(_, weights)| weights.len() != n_features)
        {
            return Err(ArtifactError::FeatureCount {
                label: config.labels[row].clone(),
                expected: n_features,
                actual: weights.len(),
            });
        }

        Ok(Self {
            columns,
            coef: config.coef,
            intercept: config.intercept,
        })
    }

    /// Signed distance to each label's separating hyperplane, in model column order
    pub fn decision(&self, row: &SparseRow) -> Vec<f64> {
        self.coef
            .iter()
            .zip(&self.intercept)
            .map(|(weights, bias)| {
                row.iter()
                    .map(|(index, value)| weights[*index] as f64 * *value as f64)
                    .sum::<f64>()
                    + *bias as f64
            })
            .collect()
    }

    /// Per-category scores for a feature row, with decisions as log-odds
    pub fn scores(&self, row: &SparseRow) -> Scores {
        Scores::from_logits(&self.columns, &self.decision(row))
    }
}
