//! Error types for MIDI corpus I/O.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("MIDI parse error: {0}")]
    MidiFileParse(String),

    #[error("Unsupported MIDI timing format")]
    UnsupportedTiming,

    #[error("Unknown pitch name: {0}")]
    UnknownPitchName(String),

    #[error(transparent)]
    Sequence(#[from] cadenza_seq::Error),
}

impl From<midly::Error> for Error {
    fn from(e: midly::Error) -> Self {
        Error::MidiFileParse(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
