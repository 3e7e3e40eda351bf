use std::fmt::Display;

use super::{labels::Category, output::Prediction};

/// Confusion counts for a single category
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Confusion {
    /// True positives
    pub tp: usize,
    /// False positives
    pub fp: usize,
    /// True negatives
    pub tn: usize,
    /// False negatives
    pub fn_: usize,
}

impl Confusion {
    /// Record one decision against its gold label
    pub fn record(&mut self, predicted: bool, expected: bool) {
        match (predicted, expected) {
            (true, true) => self.tp += 1,
            (true, false) => self.fp += 1,
            (false, false) => self.tn += 1,
            (false, true) => self.fn_ += 1,
        }
    }

    /// Total decisions recorded
    pub fn total(&self) -> usize {
        self.tp + self.fp + self.tn + self.fn_
    }

    /// Fraction of correct decisions
    pub fn accuracy(&self) -> f64 {
        ratio(self.tp + self.tn, self.total())
    }

    /// Fraction of flagged texts that were positive
    pub fn precision(&self) -> f64 {
        ratio(self.tp, self.tp + self.fp)
    }

    /// Fraction of positive texts that were flagged
    pub fn recall(&self) -> f64 {
        ratio(self.tp, self.tp + self.fn_)
    }

    /// Harmonic mean of precision and recall
    pub fn f1(&self) -> f64 {
        let (p, r) = (self.precision(), self.recall());

        if p + r == 0.0 {
            0.0
        } else {
            2.0 * p * r / (p + r)
        }
    }
}

fn ratio(num: usize, den: usize) -> f64 {
    if den == 0 {
        0.0
    } else {
        num as f64 / den as f64
    }
}

/// Per-category confusion counts over an evaluation run
#[derive(Debug, Clone, Default)]
pub struct Report {
    confusion: [Confusion; Category::COUNT],
}

impl Report {
    /// Record a prediction against the gold flags for its text
    pub fn record(&mut self, prediction: &Prediction, expected: &[bool; Category::COUNT]) {
        for category in Category::ALL {
            self.confusion[category.index()]
                .record(prediction.has(category), expected[category.index()]);
        }
    }

    /// Counts for one category
    pub fn get(&self, category: Category) -> &Confusion {
        &self.confusion[category.index()]
    }

    /// Macro-averaged F1 over all categories
    pub fn macro_f1(&self) -> f64 {
        self.confusion.iter().map(Confusion::f1).sum::<f64>() / Category::COUNT as f64
    }
}

impl Display for Report {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(
            f,
            "{:<14} {:>8} {:>9} {:>8} {:>8} {:>8}",
            "label", "accuracy", "precision", "recall", "f1", "support"
        )?;

        for category in Category::ALL {
            let c = self.get(category);
            writeln!(
                f,
                "{:<14} {:>8.4} {:>9.4} {:>8.4} {:>8.4} {:>8}",
                category.as_str(),
                c.accuracy(),
                c.precision(),
                c.recall(),
                c.f1(),
                c.tp + c.fn_
            )?;
        }

        write!(f, "macro f1: {:.4}", self.macro_f1())
    }
}
