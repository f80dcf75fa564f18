//! Burn-based next-token model for cadenza.
//!
//! Implements the [`cadenza_seq::NextTokenModel`] seam with a stacked
//! LSTM: training over (window → next index) pairs, greedy-ready softmax
//! prediction, and record persistence with a metadata sidecar.
//!
//! Training runs on the CPU autodiff backend ([`TrainBackend`]); loading
//! a trained model for generation uses the plain backend
//! ([`InferBackend`]).

mod error;
pub use error::{Error, Result};

mod rnn;
pub use rnn::{MusicRnn, MusicRnnConfig, TrainedModel};

mod train;
pub use train::{Trainer, TrainerConfig};

mod persist;
pub use persist::{
    load_metadata, load_model, save_metadata, save_model, save_weights, ModelMetadata,
};

/// CPU training backend: NdArray with autodiff.
pub type TrainBackend = burn::backend::Autodiff<burn::backend::NdArray>;

/// CPU inference backend.
pub type InferBackend = burn::backend::NdArray;
