//! Training loop: Adam over cross-entropy, best-loss checkpointing.

use crate::error::Error;
use crate::persist::save_weights;
use crate::rnn::MusicRnn;
use burn::config::Config;
use burn::module::AutodiffModule;
use burn::nn::loss::CrossEntropyLossConfig;
use burn::optim::{AdamConfig, GradientsParams, Optimizer};
use burn::tensor::backend::AutodiffBackend;
use burn::tensor::{ElementConversion, Int, Tensor};
use cadenza_seq::TrainingPair;
use std::path::Path;
use tracing::{debug, info};

/// Training hyperparameters.
#[derive(Config, Debug)]
pub struct TrainerConfig {
    #[config(default = 50)]
    pub epochs: usize,

    #[config(default = 64)]
    pub batch_size: usize,

    #[config(default = 1e-3)]
    pub learning_rate: f64,
}

/// Drives mini-batch gradient descent over (window → next index) pairs.
pub struct Trainer {
    config: TrainerConfig,
}

impl Trainer {
    pub fn new(config: TrainerConfig) -> Self {
        Self { config }
    }

    /// Train the model, returning its final state. When `best_path` is
    /// given, the weights of the best mean-loss epoch so far are
    /// checkpointed there after each improving epoch.
    pub fn train<B: AutodiffBackend>(
        &self,
        mut model: MusicRnn<B>,
        pairs: &[TrainingPair],
        vocab_size: usize,
        device: &B::Device,
        best_path: Option<&Path>,
    ) -> crate::error::Result<MusicRnn<B>> {
        if pairs.is_empty() {
            return Err(Error::NoTrainingData);
        }

        let mut optimizer = AdamConfig::new().init();
        let loss_fn = CrossEntropyLossConfig::new().init(device);
        let mut best_loss = f64::INFINITY;

        for epoch in 1..=self.config.epochs {
            let mut epoch_loss = 0.0;
            let mut batches = 0usize;

            for batch in pairs.chunks(self.config.batch_size) {
                let (input, targets) = batch_tensors::<B>(batch, vocab_size, device);
                let logits = model.forward(input);
                let loss = loss_fn.forward(logits, targets);

                let grads = GradientsParams::from_grads(loss.backward(), &model);
                epoch_loss += loss.into_scalar().elem::<f64>();
                batches += 1;

                model = optimizer.step(self.config.learning_rate, model, grads);
            }

            let mean_loss = epoch_loss / batches as f64;
            info!("epoch {}/{}: loss {:.4}", epoch, self.config.epochs, mean_loss);

            if mean_loss < best_loss {
                best_loss = mean_loss;
                if let Some(path) = best_path {
                    debug!("checkpointing best model (loss {:.4})", best_loss);
                    save_weights(model.valid(), path)?;
                }
            }
        }

        Ok(model)
    }
}

/// Pack a batch of pairs into a `[batch, seq_len, 1]` input tensor of
/// normalized indices and a `[batch]` target tensor.
fn batch_tensors<B: AutodiffBackend>(
    batch: &[TrainingPair],
    vocab_size: usize,
    device: &B::Device,
) -> (Tensor<B, 3>, Tensor<B, 1, Int>) {
    let seq_len = batch[0].window.len();

    let mut flat = Vec::with_capacity(batch.len() * seq_len);
    for pair in batch {
        flat.extend(pair.window.iter().map(|&i| i as f32 / vocab_size as f32));
    }
    let input =
        Tensor::<B, 1>::from_floats(flat.as_slice(), device).reshape([batch.len(), seq_len, 1]);

    let targets: Vec<i32> = batch.iter().map(|p| p.target as i32).collect();
    let targets = Tensor::<B, 1, Int>::from_ints(targets.as_slice(), device);

    (input, targets)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rnn::MusicRnnConfig;
    use crate::TrainBackend;

    fn tiny_pairs() -> Vec<TrainingPair> {
        // corpus [0,1,2,0,1,2,0,1] with L=3
        let indices = [0usize, 1, 2, 0, 1, 2, 0, 1];
        cadenza_seq::SequenceEncoder::new(3)
            .training_pairs(&indices)
            .unwrap()
    }

    #[test]
    fn test_one_epoch_runs() {
        let device = Default::default();
        let model = MusicRnnConfig::new(3)
            .with_hidden_size(8)
            .init::<TrainBackend>(&device);

        let trainer = Trainer::new(
            TrainerConfig::new()
                .with_epochs(1)
                .with_batch_size(4),
        );
        assert!(trainer
            .train(model, &tiny_pairs(), 3, &device, None)
            .is_ok());
    }

    #[test]
    fn test_empty_pairs_rejected() {
        let device = Default::default();
        let model = MusicRnnConfig::new(3)
            .with_hidden_size(8)
            .init::<TrainBackend>(&device);

        let trainer = Trainer::new(TrainerConfig::new().with_epochs(1));
        assert!(matches!(
            trainer.train(model, &[], 3, &device, None),
            Err(Error::NoTrainingData)
        ));
    }

    #[test]
    fn test_batch_tensors_shapes() {
        let device = Default::default();
        let pairs = tiny_pairs();
        let (input, targets) = batch_tensors::<TrainBackend>(&pairs, 3, &device);
        assert_eq!(input.dims(), [pairs.len(), 3, 1]);
        assert_eq!(targets.dims(), [pairs.len()]);
    }
}
