//! Error types for model training and persistence.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Failed to load model: {0}")]
    ModelLoad(String),

    #[error("Failed to save model: {0}")]
    ModelSave(String),

    #[error("Model metadata error: {0}")]
    Metadata(String),

    #[error("vocabulary mismatch: model was trained with {model_vocab} tokens, current vocabulary has {vocab}")]
    VocabularyMismatch { model_vocab: usize, vocab: usize },

    #[error("no training pairs provided")]
    NoTrainingData,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Sequence(#[from] cadenza_seq::Error),
}
