//! The two offline pipelines.
//!
//! Training: MIDI directory → token corpus → vocabulary → sliding-window
//! pairs → LSTM fit → persisted corpus and model.
//! Generation: persisted corpus and model → seed window → greedy loop →
//! decoded events → MIDI file.
//!
//! Both are strictly sequential one-shot batch runs; a failure aborts the
//! run, rerunning is the retry policy.

use crate::error::{Error, Result};
use cadenza_midi::{corpus_from_dir, write_midi};
use cadenza_model::{
    load_metadata, load_model, save_metadata, save_model, InferBackend, ModelMetadata,
    MusicRnnConfig, TrainBackend, Trainer, TrainerConfig,
};
use cadenza_seq::{
    load_corpus, save_corpus, Generator, NoteEvent, SequenceEncoder, Vocabulary,
    DEFAULT_SEQUENCE_LENGTH,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

/// Persisted corpus file name inside the data directory.
pub const CORPUS_FILE: &str = "notes.json";

/// Final model artifact name (the recorder adds `.mpk`, the sidecar is
/// `.toml`).
pub const MODEL_FILE: &str = "music_model";

/// Best-epoch checkpoint name.
pub const BEST_MODEL_FILE: &str = "best_model";

/// Optional settings file looked up in the data directory.
pub const CONFIG_FILE: &str = "cadenza.toml";

fn default_sequence_length() -> usize {
    DEFAULT_SEQUENCE_LENGTH
}

fn default_hidden_size() -> usize {
    256
}

fn default_dropout() -> f64 {
    0.3
}

fn default_epochs() -> usize {
    50
}

fn default_batch_size() -> usize {
    64
}

fn default_learning_rate() -> f64 {
    1e-3
}

fn default_generation_count() -> usize {
    300
}

fn default_output() -> PathBuf {
    PathBuf::from("generated_music.mid")
}

/// Settings for the training pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainConfig {
    /// Directory of MIDI files to learn from.
    #[serde(default)]
    pub midi_dir: PathBuf,

    /// Where the corpus and model artifacts land.
    #[serde(default)]
    pub data_dir: PathBuf,

    #[serde(default = "default_sequence_length")]
    pub sequence_length: usize,

    #[serde(default = "default_hidden_size")]
    pub hidden_size: usize,

    #[serde(default = "default_dropout")]
    pub dropout: f64,

    #[serde(default = "default_epochs")]
    pub epochs: usize,

    #[serde(default = "default_batch_size")]
    pub batch_size: usize,

    #[serde(default = "default_learning_rate")]
    pub learning_rate: f64,
}

impl TrainConfig {
    pub fn new(midi_dir: impl Into<PathBuf>, data_dir: impl Into<PathBuf>) -> Self {
        Self {
            midi_dir: midi_dir.into(),
            data_dir: data_dir.into(),
            sequence_length: default_sequence_length(),
            hidden_size: default_hidden_size(),
            dropout: default_dropout(),
            epochs: default_epochs(),
            batch_size: default_batch_size(),
            learning_rate: default_learning_rate(),
        }
    }

    /// Defaults, overridden by a `cadenza.toml` in the data directory when
    /// one exists. The two paths always come from the caller.
    pub fn load(midi_dir: impl Into<PathBuf>, data_dir: impl Into<PathBuf>) -> Result<Self> {
        let midi_dir = midi_dir.into();
        let data_dir = data_dir.into();

        let mut config = match read_config_file::<Self>(&data_dir)? {
            Some(config) => config,
            None => Self::new(&midi_dir, &data_dir),
        };
        config.midi_dir = midi_dir;
        config.data_dir = data_dir;
        Ok(config)
    }
}

/// Settings for the generation pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateConfig {
    /// Directory holding the persisted corpus and model.
    #[serde(default)]
    pub data_dir: PathBuf,

    /// Output MIDI path.
    #[serde(default = "default_output")]
    pub output: PathBuf,

    #[serde(default = "default_generation_count")]
    pub generation_count: usize,

    /// Fixes the seed-window choice for reproducible runs; random
    /// otherwise.
    #[serde(default)]
    pub seed: Option<u64>,
}

impl GenerateConfig {
    pub fn new(data_dir: impl Into<PathBuf>, output: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            output: output.into(),
            generation_count: default_generation_count(),
            seed: None,
        }
    }

    /// Defaults, overridden by a `cadenza.toml` in the data directory when
    /// one exists.
    pub fn load(data_dir: impl Into<PathBuf>, output: impl Into<PathBuf>) -> Result<Self> {
        let data_dir = data_dir.into();
        let output = output.into();

        let mut config = match read_config_file::<Self>(&data_dir)? {
            Some(config) => config,
            None => Self::new(&data_dir, &output),
        };
        config.data_dir = data_dir;
        config.output = output;
        Ok(config)
    }
}

fn read_config_file<T: serde::de::DeserializeOwned>(data_dir: &Path) -> Result<Option<T>> {
    let path = data_dir.join(CONFIG_FILE);
    if !path.exists() {
        return Ok(None);
    }
    let contents = std::fs::read_to_string(&path)?;
    let config = toml::from_str(&contents).map_err(|e| Error::InvalidConfig(e.to_string()))?;
    info!("settings loaded from {}", path.display());
    Ok(Some(config))
}

/// Train a model on a MIDI corpus and persist the artifacts.
pub fn run_train(config: &TrainConfig) -> Result<()> {
    std::fs::create_dir_all(&config.data_dir)?;

    info!("loading MIDI files from {}", config.midi_dir.display());
    let corpus = corpus_from_dir(&config.midi_dir)?;
    info!("total notes extracted: {}", corpus.len());
    save_corpus(&corpus, config.data_dir.join(CORPUS_FILE))?;

    let vocab = Vocabulary::from_corpus(&corpus)?;
    let indices = vocab.encode_corpus(&corpus)?;
    let encoder = SequenceEncoder::new(config.sequence_length);
    let pairs = encoder.training_pairs(&indices)?;
    info!(
        "{} training patterns over a vocabulary of {}",
        pairs.len(),
        vocab.len()
    );

    let device = Default::default();
    let model = MusicRnnConfig::new(vocab.len())
        .with_hidden_size(config.hidden_size)
        .with_dropout(config.dropout)
        .init::<TrainBackend>(&device);

    let trainer = Trainer::new(
        TrainerConfig::new()
            .with_epochs(config.epochs)
            .with_batch_size(config.batch_size)
            .with_learning_rate(config.learning_rate),
    );
    let metadata = ModelMetadata {
        vocab_size: vocab.len(),
        hidden_size: config.hidden_size,
        sequence_length: config.sequence_length,
    };

    let best_path = config.data_dir.join(BEST_MODEL_FILE);
    let model = trainer.train(model, &pairs, vocab.len(), &device, Some(best_path.as_path()))?;
    // the checkpoint saved weights only; give it a matching sidecar
    save_metadata(&metadata, &best_path)?;

    save_model(model, &metadata, config.data_dir.join(MODEL_FILE))?;
    info!("training completed, model saved in {}", config.data_dir.display());
    Ok(())
}

/// Generate a MIDI file from the persisted corpus and model.
pub fn run_generate(config: &GenerateConfig) -> Result<()> {
    let corpus = load_corpus(config.data_dir.join(CORPUS_FILE))?;
    let vocab = Vocabulary::from_corpus(&corpus)?;
    let indices = vocab.encode_corpus(&corpus)?;

    let model_path = config.data_dir.join(MODEL_FILE);
    let metadata = load_metadata(&model_path)?;
    let device = Default::default();
    let model = load_model::<InferBackend>(&model_path, vocab.len(), &device)?;

    let sequence_length = metadata.sequence_length;
    let max_start = indices.len().saturating_sub(sequence_length);
    if max_start == 0 {
        return Err(cadenza_seq::Error::InsufficientData {
            corpus_len: indices.len(),
            sequence_length,
        }
        .into());
    }

    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let start = rng.gen_range(0..max_start);
    let encoder = SequenceEncoder::new(sequence_length);
    let seed_window = encoder.seed_window(&indices, start)?;
    info!("seeding generation from corpus position {}", start);

    let generator = Generator::new(sequence_length);
    let tokens = generator.run(&model, &vocab, &seed_window, config.generation_count)?;
    info!("generated {} tokens", tokens.len());

    let events: Vec<NoteEvent> = tokens
        .iter()
        .map(|t| t.decode())
        .collect::<cadenza_seq::Result<_>>()?;
    write_midi(&events, &config.output)?;
    info!("music written to {}", config.output.display());
    Ok(())
}
