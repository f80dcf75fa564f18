//! MIDI corpus I/O for cadenza.
//!
//! Reading: Standard MIDI Files → the flat token corpus the model trains
//! on (note onsets, chord grouping, normal-order encoding).
//! Writing: generated events → a playable SMF.
//!
//! Both directions use the `midly` crate; timecode-timed files are not
//! supported.

pub mod error;
pub use error::{Error, Result};

mod pitch;
pub use pitch::{pitch_key, pitch_name};

mod read;
pub use read::{corpus_from_dir, tokens_from_bytes, tokens_from_file};

mod write;
pub use write::{events_to_smf, write_midi};
