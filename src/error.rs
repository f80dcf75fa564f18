//! Centralized error type for the cadenza umbrella crate.
//!
//! Wraps all subsystem errors so `?` propagates naturally across crate
//! boundaries.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Sequence(#[from] cadenza_seq::Error),

    #[error("MIDI: {0}")]
    Midi(#[from] cadenza_midi::Error),

    #[error("Model: {0}")]
    Model(#[from] cadenza_model::Error),

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
