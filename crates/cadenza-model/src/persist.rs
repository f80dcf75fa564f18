//! Model persistence: Burn records plus a TOML metadata sidecar.
//!
//! Weights go through `CompactRecorder` (`model.mpk`); a `model.toml`
//! sidecar next to them records the shape the model was trained with.
//! Loading checks the sidecar against the active vocabulary first, so a
//! model is never driven with a mapping it was not trained on.

use crate::error::{Error, Result};
use crate::rnn::{MusicRnn, MusicRnnConfig, TrainedModel};
use burn::module::Module;
use burn::record::CompactRecorder;
use burn::tensor::backend::Backend;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// Sidecar metadata written next to the weights.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelMetadata {
    /// Vocabulary size at training time; index meaning is not portable
    /// across vocabularies.
    pub vocab_size: usize,
    pub hidden_size: usize,
    pub sequence_length: usize,
}

/// Save weights only. The recorder appends its own `.mpk` extension.
pub fn save_weights<B: Backend>(model: MusicRnn<B>, path: impl AsRef<Path>) -> Result<()> {
    model
        .save_file(path.as_ref(), &CompactRecorder::new())
        .map_err(|e| Error::ModelSave(e.to_string()))
}

/// Save weights and the metadata sidecar.
pub fn save_model<B: Backend>(
    model: MusicRnn<B>,
    metadata: &ModelMetadata,
    path: impl AsRef<Path>,
) -> Result<()> {
    save_weights(model, path.as_ref())?;
    save_metadata(metadata, path.as_ref())?;
    debug!("model saved at {}", path.as_ref().display());
    Ok(())
}

/// Write the sidecar for weights at `path`.
pub fn save_metadata(metadata: &ModelMetadata, path: impl AsRef<Path>) -> Result<()> {
    let contents =
        toml::to_string_pretty(metadata).map_err(|e| Error::Metadata(e.to_string()))?;
    std::fs::write(path.as_ref().with_extension("toml"), contents)?;
    Ok(())
}

/// Read the sidecar for weights at `path`.
pub fn load_metadata(path: impl AsRef<Path>) -> Result<ModelMetadata> {
    let toml_path = path.as_ref().with_extension("toml");
    let contents = std::fs::read_to_string(&toml_path)?;
    toml::from_str(&contents).map_err(|e| Error::Metadata(e.to_string()))
}

/// Load a trained model, verifying it against the active vocabulary.
pub fn load_model<B: Backend>(
    path: impl AsRef<Path>,
    vocab_size: usize,
    device: &B::Device,
) -> Result<TrainedModel<B>> {
    let metadata = load_metadata(path.as_ref())?;
    if metadata.vocab_size != vocab_size {
        return Err(Error::VocabularyMismatch {
            model_vocab: metadata.vocab_size,
            vocab: vocab_size,
        });
    }

    let model = MusicRnnConfig::new(metadata.vocab_size)
        .with_hidden_size(metadata.hidden_size)
        .init::<B>(device)
        .load_file(path.as_ref(), &CompactRecorder::new(), device)
        .map_err(|e| Error::ModelLoad(e.to_string()))?;

    debug!(
        "model loaded from {} (vocab {}, hidden {})",
        path.as_ref().display(),
        metadata.vocab_size,
        metadata.hidden_size
    );
    Ok(TrainedModel::new(model, metadata.vocab_size, device.clone()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::InferBackend;

    fn metadata(vocab_size: usize) -> ModelMetadata {
        ModelMetadata {
            vocab_size,
            hidden_size: 8,
            sequence_length: 4,
        }
    }

    #[test]
    fn test_metadata_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model");

        let meta = metadata(7);
        save_metadata(&meta, &path).unwrap();
        assert_eq!(load_metadata(&path).unwrap(), meta);
    }

    #[test]
    fn test_save_and_load_model() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model");
        let device = Default::default();

        let model = MusicRnnConfig::new(5)
            .with_hidden_size(8)
            .init::<InferBackend>(&device);
        save_model(model, &metadata(5), &path).unwrap();

        let loaded = load_model::<InferBackend>(&path, 5, &device).unwrap();
        let dist = cadenza_seq::NextTokenModel::predict(&loaded, &[0.0, 0.5, 1.0, 0.5]).unwrap();
        assert_eq!(dist.len(), 5);
    }

    #[test]
    fn test_vocabulary_mismatch_detected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model");
        let device = Default::default();

        let model = MusicRnnConfig::new(5)
            .with_hidden_size(8)
            .init::<InferBackend>(&device);
        save_model(model, &metadata(5), &path).unwrap();

        assert!(matches!(
            load_model::<InferBackend>(&path, 6, &device),
            Err(Error::VocabularyMismatch {
                model_vocab: 5,
                vocab: 6
            })
        ));
    }

    #[test]
    fn test_missing_sidecar_fails() {
        let device = Default::default();
        assert!(load_model::<InferBackend>("/nonexistent/model", 5, &device).is_err());
    }
}
