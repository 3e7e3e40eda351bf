use std::collections::HashMap;

use derive_new::new;
use serde::{Deserialize, Serialize};

use super::labels::Category;

/// The default decision threshold, equivalent to a positive linear decision or logit
pub const DEFAULT_THRESHOLD: f32 = 0.5;

/// Per-category scores for a single text, kept as log-odds so decisions stay exact
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scores([f64; Category::COUNT]);

impl Default for Scores {
    fn default() -> Self {
        Self([f64::NEG_INFINITY; Category::COUNT])
    }
}

impl Scores {
    /// Build scores from probabilities in canonical category order
    pub fn new(probabilities: [f32; Category::COUNT]) -> Self {
        Self(probabilities.map(|p| logit(p as f64)))
    }

    /// Build scores from model logits (linear decisions), given the category of each column
    pub fn from_logits(columns: &[Category], logits: &[f64]) -> Self {
        let mut scores = Self::default();

        for (category, logit) in columns.iter().zip(logits) {
            scores.0[category.index()] = *logit;
        }

        scores
    }

    /// The probability for one category
    pub fn get(&self, category: Category) -> f32 {
        sigmoid(self.logit(category)) as f32
    }

    /// The log-odds for one category
    pub fn logit(&self, category: Category) -> f64 {
        self.0[category.index()]
    }

    /// Iterate over categories and their probabilities, in canonical order
    pub fn iter(&self) -> impl Iterator<Item = (Category, f32)> + '_ {
        Category::ALL.into_iter().map(move |c| (c, self.get(c)))
    }
}

/// The logistic function
pub fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

/// Inverse of the logistic function; 0 and 1 map to negative and positive infinity
pub fn logit(p: f64) -> f64 {
    (p / (1.0 - p)).ln()
}

impl Serialize for Scores {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.iter())
    }
}

/// Decision thresholds, with optional overrides per category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Thresholds {
    /// Threshold applied to every category without an override
    #[serde(default = "default_threshold")]
    pub default: f32,

    /// Category-specific thresholds
    #[serde(default)]
    pub overrides: HashMap<Category, f32>,
}

fn default_threshold() -> f32 {
    DEFAULT_THRESHOLD
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            default: DEFAULT_THRESHOLD,
            overrides: HashMap::new(),
        }
    }
}

impl Thresholds {
    /// The threshold for the given category
    pub fn get(&self, category: Category) -> f32 {
        self.overrides
            .get(&category)
            .copied()
            .unwrap_or(self.default)
    }

    /// Whether the log-odds lie strictly above the category's threshold.
    ///
    /// At 0.5 this is a strictly positive decision, matching a linear model's `predict`.
    pub fn flags(&self, category: Category, logit_score: f64) -> bool {
        logit_score > logit(self.get(category) as f64)
    }
}

/// A prediction for a single text
#[derive(Debug, Clone, PartialEq, Serialize, new)]
pub struct Prediction {
    /// The input text
    pub text: String,

    /// Probability per category
    pub scores: Scores,

    /// Categories whose score exceeded their threshold, in canonical order
    pub labels: Vec<Category>,
}

impl Prediction {
    /// Apply thresholds to scores
    pub fn from_scores(text: String, scores: Scores, thresholds: &Thresholds) -> Self {
        let labels = Category::ALL
            .into_iter()
            .filter(|category| thresholds.flags(*category, scores.logit(*category)))
            .collect();

        Self::new(text, scores, labels)
    }

    /// Whether the given category was flagged
    pub fn has(&self, category: Category) -> bool {
        self.labels.contains(&category)
    }

    /// Whether the text is flagged under the `toxic` label
    pub fn is_toxic(&self) -> bool {
        self.has(Category::Toxic)
    }

    /// Whether any category was flagged
    pub fn any(&self) -> bool {
        !self.labels.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn maps_columns_to_categories() {
        let columns = [
            Category::Threat,
            Category::Toxic,
            Category::SevereToxic,
            Category::Obscene,
            Category::Insult,
            Category::IdentityHate,
        ];
        let scores = Scores::from_logits(&columns, &[2.0, -1.0, 0.0, 0.0, 0.0, 0.0]);

        assert_eq!(scores.logit(Category::Threat), 2.0);
        assert_eq!(scores.logit(Category::Toxic), -1.0);
        assert_eq!(scores.get(Category::SevereToxic), 0.5);
    }

    #[test]
    fn thresholds_apply_overrides() {
        let mut thresholds = Thresholds::default();
        thresholds.overrides.insert(Category::Threat, 0.2);

        let scores = Scores::new([0.6, 0.49, 0.0, 0.25, 0.1, 0.0]);
        let prediction = Prediction::from_scores("text".to_string(), scores, &thresholds);

        assert_eq!(prediction.labels, vec![Category::Toxic, Category::Threat]);
        assert!(prediction.is_toxic());
        assert!(prediction.any());
    }

    #[test]
    fn default_threshold_needs_a_strictly_positive_decision() {
        let thresholds = Thresholds::default();
        let columns = Category::ALL;

        let tie = Scores::from_logits(&columns, &[0.0; 6]);
        assert!(!Prediction::from_scores("tie".to_string(), tie, &thresholds).any());

        let below = Scores::from_logits(&columns, &[-1e-8; 6]);
        assert!(!Prediction::from_scores("below".to_string(), below, &thresholds).any());

        let above = Scores::from_logits(&columns, &[1e-12; 6]);
        assert!(Prediction::from_scores("above".to_string(), above, &thresholds).is_toxic());
    }

    #[test]
    fn extreme_thresholds() {
        let scores = Scores::new([1.0, 0.0, 0.5, 0.5, 0.5, 0.5]);

        let strictest = Thresholds {
            default: 1.0,
            overrides: HashMap::new(),
        };
        let never = Prediction::from_scores("x".to_string(), scores, &strictest);
        assert!(!never.any());

        let loosest = Thresholds {
            default: 0.0,
            overrides: HashMap::new(),
        };
        let always = Prediction::from_scores("x".to_string(), scores, &loosest);
        assert_eq!(always.labels.len(), 5);
        assert!(!always.has(Category::SevereToxic));
    }

    #[test]
    fn clean_text_has_no_labels() {
        let prediction =
            Prediction::from_scores("hi".to_string(), Scores::default(), &Thresholds::default());

        assert!(!prediction.is_toxic());
        assert!(!prediction.any());
        assert!(!prediction.has(Category::Insult));
    }

    #[test]
    fn serializes_scores_by_label_name() {
        let prediction = Prediction::from_scores(
            "hi".to_string(),
            Scores::new([1.0, 0.0, 0.0, 0.0, 0.0, 0.0]),
            &Thresholds::default(),
        );

        let json = serde_json::to_value(&prediction).unwrap();
        assert_eq!(json["scores"]["toxic"], 1.0);
        assert_eq!(json["labels"][0], "toxic");
    }
}
