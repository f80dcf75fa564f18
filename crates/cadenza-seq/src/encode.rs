//! Sliding-window sequence encoding.

use crate::error::{Error, Result};

/// Default model window length.
pub const DEFAULT_SEQUENCE_LENGTH: usize = 100;

/// An ordered sequence of exactly `sequence_length` vocabulary indices.
pub type Window = Vec<usize>;

/// One supervised example: a window and the index that follows it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrainingPair {
    pub window: Window,
    pub target: usize,
}

/// Produces fixed-length windows from an index-encoded corpus.
#[derive(Debug, Clone, Copy)]
pub struct SequenceEncoder {
    sequence_length: usize,
}

impl SequenceEncoder {
    pub fn new(sequence_length: usize) -> Self {
        Self { sequence_length }
    }

    pub fn sequence_length(&self) -> usize {
        self.sequence_length
    }

    /// All training pairs for the corpus, window advancing by one: pair `i`
    /// covers positions `[i, i+L)` with target at `i+L`. Exactly `N - L`
    /// pairs for a corpus of `N` indices.
    pub fn training_pairs(&self, indices: &[usize]) -> Result<Vec<TrainingPair>> {
        self.check_corpus_len(indices.len())?;

        let l = self.sequence_length;
        Ok((0..indices.len() - l)
            .map(|i| TrainingPair {
                window: indices[i..i + l].to_vec(),
                target: indices[i + l],
            })
            .collect())
    }

    /// A contiguous window starting at `start`, used to seed generation.
    pub fn seed_window(&self, indices: &[usize], start: usize) -> Result<Window> {
        self.check_corpus_len(indices.len())?;

        let end = start
            .checked_add(self.sequence_length)
            .filter(|&end| end <= indices.len())
            .ok_or(Error::SeedOutOfRange {
                start,
                corpus_len: indices.len(),
            })?;
        Ok(indices[start..end].to_vec())
    }

    /// Scale indices into `[0, 1]` by vocabulary size. The model only ever
    /// sees scaled inputs, so training and generation must both go through
    /// here.
    pub fn normalize(window: &[usize], vocab_len: usize) -> Vec<f32> {
        window
            .iter()
            .map(|&i| i as f32 / vocab_len as f32)
            .collect()
    }

    fn check_corpus_len(&self, corpus_len: usize) -> Result<()> {
        if corpus_len == 0 {
            return Err(Error::EmptyCorpus);
        }
        if self.sequence_length >= corpus_len {
            return Err(Error::InsufficientData {
                corpus_len,
                sequence_length: self.sequence_length,
            });
        }
        Ok(())
    }
}
