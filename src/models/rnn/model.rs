use burn::{
    module::Module,
    nn::{lstm::Lstm, Embedding, Linear},
    tensor::{
        activation::{relu, sigmoid},
        backend::Backend,
        Int, Tensor,
    },
};

/// Embedding, LSTM, and dense head producing one logit per label
#[derive(Module, Debug)]
pub struct Model<B: Backend> {
    /// Token embeddings
    pub embedding: Embedding<B>,

    /// Recurrent encoder
    pub lstm: Lstm<B>,

    /// Hidden dense layer
    pub dense: Linear<B>,

    /// Output layer, one unit per label
    pub output: Linear<B>,

    /// Max-pool over time when set, otherwise take the final timestep
    pub max_pool: bool,
}

impl<B: Backend> Model<B> {
    /// Compute logits for a batch of token ids: [batch_size, seq_length] -> [batch_size, n_labels]
    pub fn forward(&self, tokens: Tensor<B, 2, Int>) -> Tensor<B, 2> {
        let [batch_size, seq_length] = tokens.dims();

        let embedded = self.embedding.forward(tokens);
        let (_cell_states, hidden_states) = self.lstm.forward(embedded, None);
        let [_, _, hidden_size] = hidden_states.dims();

        let pooled = if self.max_pool {
            hidden_states.max_dim(1)
        } else {
            hidden_states.slice([0..batch_size, seq_length - 1..seq_length, 0..hidden_size])
        }
        .reshape([batch_size, hidden_size]);

        let hidden = relu(self.dense.forward(pooled));

        self.output.forward(hidden)
    }

    /// Defines forward pass for inference, giving independent per-label probabilities
    pub fn infer(&self, tokens: Tensor<B, 2, Int>) -> Tensor<B, 2> {
        sigmoid(self.forward(tokens))
    }
}
