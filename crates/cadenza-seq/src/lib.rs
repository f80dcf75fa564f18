//! Sequence core for cadenza.
//!
//! The shared data abstraction of the train and generate pipelines:
//! tokens, the deterministic vocabulary, sliding-window encoding, and the
//! greedy generation loop.
//!
//! This crate contains NO ML framework dependencies. The network sits
//! behind the [`NextTokenModel`] trait; `cadenza-model` provides the Burn
//! implementation, and anything that emits a probability distribution of
//! the right length can stand in for it.

mod error;
pub use error::{Error, Result};

mod token;
pub use token::{NoteEvent, Token, CHORD_SEPARATOR};

mod vocab;
pub use vocab::{load_corpus, save_corpus, Vocabulary};

mod encode;
pub use encode::{SequenceEncoder, TrainingPair, Window, DEFAULT_SEQUENCE_LENGTH};

mod model;
pub use model::NextTokenModel;

mod generate;
pub use generate::{argmax, Generator};
