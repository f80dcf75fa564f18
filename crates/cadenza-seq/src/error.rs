//! Error types for the sequence core.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("corpus is empty")]
    EmptyCorpus,

    #[error("corpus too short: {corpus_len} tokens, sequence length {sequence_length} requires more")]
    InsufficientData {
        corpus_len: usize,
        sequence_length: usize,
    },

    #[error("token not in vocabulary: {0}")]
    UnknownToken(String),

    #[error("vocabulary mismatch: model was trained with {model_vocab} tokens, current vocabulary has {vocab}")]
    VocabularyMismatch { model_vocab: usize, vocab: usize },

    #[error("index {index} out of range for vocabulary of {vocab_len} tokens")]
    IndexOutOfRange { index: usize, vocab_len: usize },

    #[error("bad prediction distribution: expected length {expected}, got {found}")]
    BadDistribution { expected: usize, found: usize },

    #[error("seed window at {start} out of range for corpus of {corpus_len} tokens")]
    SeedOutOfRange { start: usize, corpus_len: usize },

    #[error("invalid chord component {component:?} in token {token:?}")]
    InvalidChordComponent { token: String, component: String },

    #[error("model prediction failed: {0}")]
    Prediction(String),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}
