/// TF-IDF features with a linear classifier
pub mod tfidf;

/// Recurrent network with a word tokenizer
pub mod rnn;
