use burn::tensor::{backend::Backend, Data, ElementConversion, Int, Shape, Tensor};
use serde::{Deserialize, Serialize};

/// The side of a sequence where padding is inserted or excess tokens are dropped
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    /// The start of the sequence
    Pre,

    /// The end of the sequence
    Post,
}

/// Truncate and pad a token sequence to exactly `seq_length` entries
pub fn fit_to(
    mut tokens: Vec<usize>,
    seq_length: usize,
    pad_token: usize,
    padding: Side,
    truncating: Side,
) -> Vec<usize> {
    if tokens.len() > seq_length {
        match truncating {
            Side::Pre => {
                tokens.drain(..tokens.len() - seq_length);
            }
            Side::Post => tokens.truncate(seq_length),
        }
    }

    let missing = seq_length - tokens.len();
    if missing > 0 {
        match padding {
            Side::Pre => {
                tokens.splice(0..0, std::iter::repeat(pad_token).take(missing));
            }
            Side::Post => tokens.resize(seq_length, pad_token),
        }
    }

    tokens
}

/// Generate a fixed-width batch of token ids, truncating and padding each sequence
pub fn pad_to<B: Backend>(
    pad_token: usize,
    tokens_list: Vec<Vec<usize>>,
    seq_length: usize,
    padding: Side,
    truncating: Side,
    device: &B::Device,
) -> Tensor<B, 2, Int> {
    let batch_size = tokens_list.len();

    let values = tokens_list
        .into_iter()
        .flat_map(|tokens| fit_to(tokens, seq_length, pad_token, padding, truncating))
        .map(|e| (e as i64).elem::<B::IntElem>())
        .collect();

    Tensor::from_data(
        Data::new(values, Shape::new([batch_size, seq_length])),
        device,
    )
}
