//! Greedy autoregressive generation.

use crate::encode::SequenceEncoder;
use crate::error::{Error, Result};
use crate::model::NextTokenModel;
use crate::token::Token;
use crate::vocab::Vocabulary;
use std::collections::VecDeque;
use tracing::debug;

/// Runs the generation loop: predict, pick, slide.
///
/// The window is a ring of exactly the configured sequence length. Each
/// step appends the predicted index and drops the oldest, so the length
/// invariant holds after every transition. Selection is always greedy:
/// the first index attaining the maximum probability wins.
#[derive(Debug, Clone, Copy)]
pub struct Generator {
    sequence_length: usize,
}

impl Generator {
    pub fn new(sequence_length: usize) -> Self {
        Self { sequence_length }
    }

    /// Generate `count` tokens starting from `seed`. A zero count yields an
    /// empty stream. The model and vocabulary must agree on size, and every
    /// seed index must be in range; otherwise the run would silently
    /// produce garbage, so both are checked up front.
    pub fn run(
        &self,
        model: &dyn NextTokenModel,
        vocab: &Vocabulary,
        seed: &[usize],
        count: usize,
    ) -> Result<Vec<Token>> {
        if seed.len() != self.sequence_length {
            return Err(Error::InsufficientData {
                corpus_len: seed.len(),
                sequence_length: self.sequence_length,
            });
        }
        if model.vocab_len() != vocab.len() {
            return Err(Error::VocabularyMismatch {
                model_vocab: model.vocab_len(),
                vocab: vocab.len(),
            });
        }
        if let Some(&index) = seed.iter().find(|&&i| i >= vocab.len()) {
            return Err(Error::IndexOutOfRange {
                index,
                vocab_len: vocab.len(),
            });
        }

        let mut window: VecDeque<usize> = seed.iter().copied().collect();
        let mut output = Vec::with_capacity(count);

        for step in 0..count {
            let scaled =
                SequenceEncoder::normalize(window.make_contiguous(), vocab.len());
            let distribution = model.predict(&scaled)?;
            if distribution.len() != vocab.len() {
                return Err(Error::BadDistribution {
                    expected: vocab.len(),
                    found: distribution.len(),
                });
            }

            let index = argmax(&distribution);
            let token = vocab.token_at(index).ok_or(Error::IndexOutOfRange {
                index,
                vocab_len: vocab.len(),
            })?;
            debug!("step {}: index {} -> {}", step, index, token);
            output.push(token.clone());

            window.push_back(index);
            window.pop_front();
            debug_assert_eq!(window.len(), self.sequence_length);
        }

        Ok(output)
    }
}

/// Index of the maximum value; the first index wins ties, so a fixed
/// distribution always selects the same token.
pub fn argmax(distribution: &[f32]) -> usize {
    let mut best = 0;
    let mut best_value = f32::NEG_INFINITY;
    for (i, &value) in distribution.iter().enumerate() {
        if value > best_value {
            best = i;
            best_value = value;
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Predicts a fixed rotation: after index `i`, always index
    /// `(i + 1) % vocab_len`.
    struct RotatingModel {
        vocab_len: usize,
    }

    impl NextTokenModel for RotatingModel {
        fn vocab_len(&self) -> usize {
            self.vocab_len
        }

        fn predict(&self, window: &[f32]) -> Result<Vec<f32>> {
            let last = (window[window.len() - 1] * self.vocab_len as f32).round() as usize;
            let next = (last + 1) % self.vocab_len;
            let mut dist = vec![0.0; self.vocab_len];
            dist[next] = 1.0;
            Ok(dist)
        }
    }

    fn vocab(tokens: &[&str]) -> Vocabulary {
        let corpus: Vec<Token> = tokens.iter().map(|&t| Token::from(t)).collect();
        Vocabulary::from_corpus(&corpus).unwrap()
    }

    #[test]
    fn test_zero_count_yields_empty() {
        let vocab = vocab(&["A4", "B4", "C4"]);
        let model = RotatingModel { vocab_len: 3 };
        let out = Generator::new(2).run(&model, &vocab, &[0, 1], 0).unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn test_greedy_rotation() {
        let vocab = vocab(&["A4", "B4", "C4"]);
        let model = RotatingModel { vocab_len: 3 };
        let out = Generator::new(2).run(&model, &vocab, &[0, 1], 4).unwrap();
        let names: Vec<&str> = out.iter().map(|t| t.as_str()).collect();
        // sorted vocab is [A4, B4, C4]; rotation from index 1: 2, 0, 1, 2
        assert_eq!(names, vec!["C4", "A4", "B4", "C4"]);
    }

    #[test]
    fn test_argmax_first_index_wins_ties() {
        assert_eq!(argmax(&[0.2, 0.4, 0.4, 0.1]), 1);
        assert_eq!(argmax(&[0.5, 0.5]), 0);
        assert_eq!(argmax(&[0.0]), 0);
    }

    #[test]
    fn test_vocab_size_mismatch_rejected() {
        let vocab = vocab(&["A4", "B4", "C4"]);
        let model = RotatingModel { vocab_len: 4 };
        assert!(matches!(
            Generator::new(2).run(&model, &vocab, &[0, 1], 1),
            Err(Error::VocabularyMismatch {
                model_vocab: 4,
                vocab: 3
            })
        ));
    }

    #[test]
    fn test_seed_index_out_of_range_rejected() {
        let vocab = vocab(&["A4", "B4"]);
        let model = RotatingModel { vocab_len: 2 };
        assert!(matches!(
            Generator::new(2).run(&model, &vocab, &[0, 5], 1),
            Err(Error::IndexOutOfRange {
                index: 5,
                vocab_len: 2
            })
        ));
    }

    #[test]
    fn test_wrong_seed_length_rejected() {
        let vocab = vocab(&["A4", "B4"]);
        let model = RotatingModel { vocab_len: 2 };
        assert!(matches!(
            Generator::new(3).run(&model, &vocab, &[0, 1], 1),
            Err(Error::InsufficientData { .. })
        ));
    }

    #[test]
    fn test_bad_distribution_length_rejected() {
        struct ShortModel;
        impl NextTokenModel for ShortModel {
            fn vocab_len(&self) -> usize {
                2
            }
            fn predict(&self, _window: &[f32]) -> Result<Vec<f32>> {
                Ok(vec![1.0])
            }
        }

        let vocab = vocab(&["A4", "B4"]);
        assert!(matches!(
            Generator::new(1).run(&ShortModel, &vocab, &[0], 1),
            Err(Error::BadDistribution {
                expected: 2,
                found: 1
            })
        ));
    }
}
