//! Stacked-LSTM next-token network.
//!
//! Input is a normalized window shaped `[batch, seq_len, 1]`; output is a
//! logit per vocabulary entry. Three recurrent layers with dropout feed a
//! dense layer and a projection down to the vocabulary. Softmax is
//! applied only at predict time; the loss works on logits.

use burn::config::Config;
use burn::module::Module;
use burn::nn::{Dropout, DropoutConfig, Linear, LinearConfig, Lstm, LstmConfig};
use burn::tensor::activation::softmax;
use burn::tensor::backend::Backend;
use burn::tensor::Tensor;
use cadenza_seq::NextTokenModel;

/// Hyperparameters for [`MusicRnn`].
#[derive(Config, Debug)]
pub struct MusicRnnConfig {
    /// Size of the output distribution, equal to the vocabulary size the
    /// model is trained against.
    pub vocab_size: usize,

    /// Width of each recurrent layer.
    #[config(default = 256)]
    pub hidden_size: usize,

    /// Dropout after the first two recurrent layers and the dense layer.
    #[config(default = 0.3)]
    pub dropout: f64,
}

impl MusicRnnConfig {
    pub fn init<B: Backend>(&self, device: &B::Device) -> MusicRnn<B> {
        MusicRnn {
            lstm1: LstmConfig::new(1, self.hidden_size, true).init(device),
            lstm2: LstmConfig::new(self.hidden_size, self.hidden_size, true).init(device),
            lstm3: LstmConfig::new(self.hidden_size, self.hidden_size, true).init(device),
            dropout: DropoutConfig::new(self.dropout).init(),
            dense: LinearConfig::new(self.hidden_size, self.hidden_size).init(device),
            output: LinearConfig::new(self.hidden_size, self.vocab_size).init(device),
        }
    }
}

#[derive(Module, Debug)]
pub struct MusicRnn<B: Backend> {
    lstm1: Lstm<B>,
    lstm2: Lstm<B>,
    lstm3: Lstm<B>,
    dropout: Dropout,
    dense: Linear<B>,
    output: Linear<B>,
}

impl<B: Backend> MusicRnn<B> {
    /// Logits over the vocabulary for each batch element.
    pub fn forward(&self, input: Tensor<B, 3>) -> Tensor<B, 2> {
        let [batch, seq_len, _] = input.dims();

        let (x, _) = self.lstm1.forward(input, None);
        let x = self.dropout.forward(x);
        let (x, _) = self.lstm2.forward(x, None);
        let x = self.dropout.forward(x);
        let (x, _) = self.lstm3.forward(x, None);

        // only the last timestep feeds the dense head
        let [_, _, hidden] = x.dims();
        let x = x
            .slice([0..batch, (seq_len - 1)..seq_len])
            .reshape([batch, hidden]);

        let x = self.dense.forward(x);
        let x = self.dropout.forward(x);
        self.output.forward(x)
    }
}

/// A trained network bound to a device, ready for the generation loop.
pub struct TrainedModel<B: Backend> {
    model: MusicRnn<B>,
    vocab_size: usize,
    device: B::Device,
}

impl<B: Backend> TrainedModel<B> {
    pub fn new(model: MusicRnn<B>, vocab_size: usize, device: B::Device) -> Self {
        Self {
            model,
            vocab_size,
            device,
        }
    }

    pub fn model(&self) -> &MusicRnn<B> {
        &self.model
    }
}

impl<B: Backend> NextTokenModel for TrainedModel<B> {
    fn vocab_len(&self) -> usize {
        self.vocab_size
    }

    fn predict(&self, window: &[f32]) -> cadenza_seq::Result<Vec<f32>> {
        let seq_len = window.len();
        let input =
            Tensor::<B, 1>::from_floats(window, &self.device).reshape([1, seq_len, 1]);
        let logits = self.model.forward(input);
        let probabilities = softmax(logits, 1);
        probabilities
            .into_data()
            .to_vec::<f32>()
            .map_err(|e| cadenza_seq::Error::Prediction(format!("{e:?}")))
    }
}
