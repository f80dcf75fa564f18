//! Generate a MIDI file from a trained model.
//!
//! Usage:
//!   generate [data-dir] [output.mid]
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
    let data_dir = args
        .get(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("data"));
    let output = args
        .get(2)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("generated_music.mid"));

    let config = match cadenza::GenerateConfig::load(data_dir, output) {
        Ok(config) => config,
        Err(e) => {
            error!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = cadenza::run_generate(&config) {
        error!("generation failed: {}", e);
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
