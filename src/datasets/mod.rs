/// Jigsaw toxic comment classification dataset
pub mod jigsaw;
