//! # Cadenza: LSTM note-sequence trainer and MIDI generator
//!
//! Trains a stacked-LSTM next-token model on a directory of MIDI files
//! and generates new music from it. Umbrella crate coordinating:
//!
//! - **cadenza-seq**: tokens, vocabulary, sliding windows, greedy
//!   generation loop
//! - **cadenza-midi**: MIDI corpus extraction and rendering (midly)
//! - **cadenza-model**: stacked-LSTM next-token model (Burn)
//!
//! ## Quick start
//!
//! ```ignore
//! use cadenza::{run_train, run_generate, TrainConfig, GenerateConfig};
//!
//! let train = TrainConfig::new("midi_songs", "data");
//! run_train(&train)?;
//!
//! let generate = GenerateConfig::new("data", "generated_music.mid");
//! run_generate(&generate)?;
//! ```
//!
//! Both pipelines are one-shot offline batch runs: no concurrency, no
//! retries, a failed step aborts the run.

/// Re-export of the sequence core for direct access.
pub use cadenza_seq as seq;

/// Re-export of MIDI corpus I/O.
pub use cadenza_midi as midi;

/// Re-export of the Burn model.
pub use cadenza_model as model;

mod error;
pub use error::{Error, Result};

mod pipeline;
pub use pipeline::{
    run_generate, run_train, GenerateConfig, TrainConfig, BEST_MODEL_FILE, CONFIG_FILE,
    CORPUS_FILE, MODEL_FILE,
};
