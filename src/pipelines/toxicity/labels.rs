use std::fmt::Display;

use serde::{Deserialize, Serialize};

/// The toxicity sub-categories, in canonical output order
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    /// Generally toxic language
    Toxic,

    /// Severely toxic language
    SevereToxic,

    /// Obscenities
    Obscene,

    /// Threats of violence
    Threat,

    /// Insults
    Insult,

    /// Hate speech targeting an identity
    IdentityHate,
}

impl Category {
    /// Every category, in canonical order
    pub const ALL: [Category; 6] = [
        Category::Toxic,
        Category::SevereToxic,
        Category::Obscene,
        Category::Threat,
        Category::Insult,
        Category::IdentityHate,
    ];

    /// The number of categories
    pub const COUNT: usize = Self::ALL.len();

    /// The label name, matching the Jigsaw dataset column
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Toxic => "toxic",
            Category::SevereToxic => "severe_toxic",
            Category::Obscene => "obscene",
            Category::Threat => "threat",
            Category::Insult => "insult",
            Category::IdentityHate => "identity_hate",
        }
    }

    /// Position of the category in canonical order
    pub fn index(&self) -> usize {
        *self as usize
    }
}

impl TryFrom<&str> for Category {
    type Error = LabelError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let name = value.trim().to_lowercase().replace(['-', ' '], "_");

        Category::ALL
            .into_iter()
            .find(|category| category.as_str() == name)
            .ok_or_else(|| LabelError::Unknown(value.to_string()))
    }
}

impl Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Map a model's label names onto categories, requiring each category exactly once.
///
/// Returns the category for each output column, in the model's order.
pub fn resolve_labels<S: AsRef<str>>(labels: &[S]) -> Result<Vec<Category>, LabelError> {
    let mut seen = [false; Category::COUNT];
    let mut columns = Vec::with_capacity(labels.len());

    for label in labels {
        let category = Category::try_from(label.as_ref())?;

        if seen[category.index()] {
            return Err(LabelError::Duplicate(category));
        }
        seen[category.index()] = true;
        columns.push(category);
    }

    if let Some(missing) = Category::ALL.into_iter().find(|c| !seen[c.index()]) {
        return Err(LabelError::Missing(missing));
    }

    Ok(columns)
}

/// Label Error
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum LabelError {
    /// No category found for the given string
    #[error("no toxicity category found for {0}")]
    Unknown(String),

    /// A category appears more than once in a model's labels
    #[error("label {0} appears more than once")]
    Duplicate(Category),

    /// A category has no output column
    #[error("model has no output for label {0}")]
    Missing(Category),
}
