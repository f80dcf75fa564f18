//! Train the next-token model on a directory of MIDI files.
//!
//! Usage:
//!   train <midi-dir> [data-dir]
//!
//! Settings beyond the two paths come from `<data-dir>/cadenza.toml` when
//! one exists.

use std::path::PathBuf;
use std::process::ExitCode;
use tracing::error;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let args: Vec<String> = std::env::args().collect();
    let midi_dir = match args.get(1) {
        Some(path) => PathBuf::from(path),
        None => {
            eprintln!("usage: train <midi-dir> [data-dir]");
            return ExitCode::FAILURE;
        }
    };
    let data_dir = args
        .get(2)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("data"));

    let config = match cadenza::TrainConfig::load(midi_dir, data_dir) {
        Ok(config) => config,
        Err(e) => {
            error!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = cadenza::run_train(&config) {
        error!("training failed: {}", e);
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
