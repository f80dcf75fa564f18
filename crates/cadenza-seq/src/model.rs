//! The model seam.
//!
//! This crate owns sequence semantics and contains no ML framework
//! dependencies; the trained network lives behind [`NextTokenModel`].
//! `cadenza-model` provides the Burn implementation, and tests drive the
//! generation loop with closure-backed mocks.

use crate::error::Result;

/// A next-token predictor over a fixed vocabulary.
pub trait NextTokenModel {
    /// Size of the distribution this model emits. Must equal the length of
    /// the vocabulary the model was trained against.
    fn vocab_len(&self) -> usize;

    /// Probability distribution over the vocabulary for the token that
    /// follows `window`. The window is already normalized to `[0, 1]`.
    fn predict(&self, window: &[f32]) -> Result<Vec<f32>>;
}
