/// Toxicity Classification
pub mod toxicity;
