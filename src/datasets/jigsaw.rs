use std::path::Path;

use burn::data::dataset::{self, Dataset as _, InMemDataset};
use derive_new::new;
use rand::seq::index::sample;
use serde::{Deserialize, Serialize};

use crate::pipelines::toxicity::Category;

/// The name of the Jigsaw dataset
pub static DATASET: &str = "jigsaw";

/// A labeled comment, with one 0/1 column per category; -1 marks an unscored row
#[derive(Clone, Debug, Serialize, Deserialize, new)]
pub struct Item {
    /// Comment identifier
    pub id: String,

    /// The text for classification
    pub comment_text: String,

    /// Generally toxic
    pub toxic: i8,

    /// Severely toxic
    pub severe_toxic: i8,

    /// Obscene
    pub obscene: i8,

    /// Threatening
    pub threat: i8,

    /// Insulting
    pub insult: i8,

    /// Identity hate
    pub identity_hate: i8,
}

impl Item {
    /// Whether every category was scored
    pub fn is_scored(&self) -> bool {
        self.columns().iter().all(|flag| *flag >= 0)
    }

    fn columns(&self) -> [i8; Category::COUNT] {
        [
            self.toxic,
            self.severe_toxic,
            self.obscene,
            self.threat,
            self.insult,
            self.identity_hate,
        ]
    }

    /// Gold flags in canonical category order
    pub fn labels(&self) -> [bool; Category::COUNT] {
        self.columns().map(|flag| flag > 0)
    }

    /// Whether the gold labels include the category
    pub fn has(&self, category: Category) -> bool {
        self.labels()[category.index()]
    }
}

/// An unlabeled comment, as found in prediction input files
#[derive(Clone, Debug, Serialize, Deserialize, new)]
pub struct Comment {
    /// Comment identifier
    #[serde(default)]
    pub id: String,

    /// The text for classification
    pub comment_text: String,
}

/// Read the `id` and `comment_text` columns of a CSV file
pub fn read_comments<P: AsRef<Path>>(path: P) -> Result<Vec<Comment>, csv::Error> {
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_path(path)?;

    reader.deserialize().collect()
}

/// Struct for the Jigsaw dataset
pub struct Dataset {
    /// Underlying In-Memory dataset
    dataset: InMemDataset<Item>,
}

/// Implement the Dataset trait for the Jigsaw dataset
impl dataset::Dataset<Item> for Dataset {
    /// Returns a specific item from the dataset
    fn get(&self, index: usize) -> Option<Item> {
        self.dataset.get(index)
    }

    /// Returns the length of the dataset
    fn len(&self) -> usize {
        self.dataset.len()
    }
}

// Implement methods for constructing the Jigsaw dataset
impl Dataset {
    /// Loads a labeled CSV file, skipping unscored or malformed rows
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, csv::Error> {
        let mut reader = csv::ReaderBuilder::new().from_path(path)?;

        let mut items = Vec::new();
        let mut skipped = 0;

        for (row, result) in reader.deserialize::<Item>().enumerate() {
            match result {
                Ok(item) if item.is_scored() => items.push(item),
                Ok(item) => {
                    log::warn!("Skipping unscored comment {}", item.id);
                    skipped += 1;
                }
                Err(e) => {
                    log::warn!("Skipping row {}: {}", row + 1, e);
                    skipped += 1;
                }
            }
        }

        let dataset = InMemDataset::new(items);
        log::debug!(
            "Loaded {} labeled comments, skipped {}",
            dataset.len(),
            skipped
        );

        Ok(Self { dataset })
    }

    /// Returns up to `count` distinct random items from the dataset
    pub fn samples(&self, count: usize) -> Vec<Item> {
        let mut rng = rand::thread_rng();
        let count = count.min(self.len());

        sample(&mut rng, self.len(), count)
            .into_iter()
            .filter_map(|i| self.get(i))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use burn::data::dataset::Dataset as _;
    use pretty_assertions::assert_eq;

    const CSV: &str = "\
id,comment_text,toxic,severe_toxic,obscene,threat,insult,identity_hate
a1,\"You are, frankly, an idiot\",1,0,0,0,1,0
b2,\"Thanks for the edit!
Much appreciated.\",0,0,0,0,0,0
c3,I will find you,1,0,0,1,0,0
";

    #[test]
    fn loads_labeled_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("train.csv");
        std::fs::write(&path, CSV).unwrap();

        let dataset = Dataset::load(&path).unwrap();
        assert_eq!(dataset.len(), 3);

        let first = dataset.get(0).unwrap();
        assert_eq!(first.comment_text, "You are, frankly, an idiot");
        assert_eq!(first.labels(), [true, false, false, false, true, false]);

        let second = dataset.get(1).unwrap();
        assert!(second.comment_text.contains('\n'));
        assert!(!second.has(Category::Toxic));
    }

    #[test]
    fn skips_unscored_and_malformed_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("test_labeled.csv");
        let csv = format!(
            "{}b9,unscored,-1,-1,-1,-1,-1,-1\nd4,broken,yes,0,0,0,0,0\n",
            CSV
        );
        std::fs::write(&path, csv).unwrap();

        let dataset = Dataset::load(&path).unwrap();

        assert_eq!(dataset.len(), 3);
        assert!((0..dataset.len())
            .filter_map(|i| dataset.get(i))
            .all(|item| item.is_scored()));
    }

    #[test]
    fn samples_distinct_items() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("train.csv");
        std::fs::write(&path, CSV).unwrap();

        let dataset = Dataset::load(&path).unwrap();
        let mut ids: Vec<String> = dataset.samples(10).into_iter().map(|i| i.id).collect();
        ids.sort();

        assert_eq!(ids, vec!["a1", "b2", "c3"]);
    }

    #[test]
    fn reads_comments_without_labels() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("test.csv");
        std::fs::write(&path, "id,comment_text\nx,hello there\ny,\"go away\"\n").unwrap();

        let comments = read_comments(&path).unwrap();
        assert_eq!(comments.len(), 2);
        assert_eq!(comments[1].comment_text, "go away");
    }
}
