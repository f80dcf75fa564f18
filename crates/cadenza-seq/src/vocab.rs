//! Vocabulary: deterministic token ↔ index mapping.

use crate::error::{Error, Result};
use crate::token::Token;
use std::collections::HashMap;
use std::path::Path;
use tracing::debug;

/// Sorted, deduplicated token set with a bijective token ↔ index map.
///
/// Built once per corpus and immutable afterward. Ordering is plain
/// lexicographic sort, so the same corpus always yields the same mapping
/// and a persisted corpus fully determines index meaning. Hash-order
/// iteration is never used for indexing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Vocabulary {
    tokens: Vec<Token>,
    index: HashMap<Token, usize>,
}

impl Vocabulary {
    /// Build from an ordered corpus of at least one token.
    pub fn from_corpus(corpus: &[Token]) -> Result<Self> {
        if corpus.is_empty() {
            return Err(Error::EmptyCorpus);
        }

        let mut tokens = corpus.to_vec();
        tokens.sort();
        tokens.dedup();

        let index = tokens
            .iter()
            .cloned()
            .enumerate()
            .map(|(i, t)| (t, i))
            .collect();

        debug!(
            "vocabulary built: {} distinct tokens from {} corpus tokens",
            tokens.len(),
            corpus.len()
        );

        Ok(Self { tokens, index })
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn index_of(&self, token: &Token) -> Option<usize> {
        self.index.get(token).copied()
    }

    pub fn token_at(&self, index: usize) -> Option<&Token> {
        self.tokens.get(index)
    }

    /// Tokens in index order.
    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// Map a full corpus to indices. A token outside the vocabulary means
    /// the corpus and vocabulary are out of sync and is a hard error.
    pub fn encode_corpus(&self, corpus: &[Token]) -> Result<Vec<usize>> {
        corpus
            .iter()
            .map(|t| {
                self.index_of(t)
                    .ok_or_else(|| Error::UnknownToken(t.as_str().to_string()))
            })
            .collect()
    }
}

/// Persist a token corpus as a JSON array. The vocabulary itself is not
/// stored: rebuilding it from the corpus is deterministic.
pub fn save_corpus(corpus: &[Token], path: impl AsRef<Path>) -> Result<()> {
    let json = serde_json::to_string(corpus)?;
    std::fs::write(path.as_ref(), json)?;
    Ok(())
}

/// Load a persisted token corpus.
pub fn load_corpus(path: impl AsRef<Path>) -> Result<Vec<Token>> {
    let data = std::fs::read_to_string(path.as_ref())?;
    let corpus: Vec<Token> = serde_json::from_str(&data)?;
    if corpus.is_empty() {
        return Err(Error::EmptyCorpus);
    }
    Ok(corpus)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn corpus(tokens: &[&str]) -> Vec<Token> {
        tokens.iter().map(|&t| Token::from(t)).collect()
    }

    #[test]
    fn test_empty_corpus_fails() {
        assert!(matches!(
            Vocabulary::from_corpus(&[]),
            Err(Error::EmptyCorpus)
        ));
    }

    #[test]
    fn test_sorted_and_deduped() {
        let vocab = Vocabulary::from_corpus(&corpus(&["G4", "C4", "E4", "C4"])).unwrap();
        assert_eq!(vocab.len(), 3);
        let tokens: Vec<&str> = vocab.tokens().iter().map(|t| t.as_str()).collect();
        assert_eq!(tokens, vec!["C4", "E4", "G4"]);
    }

    #[test]
    fn test_reference_mapping() {
        // corpus = ["C4","E4","G4","C4"] -> {"C4":0, "E4":1, "G4":2}
        let vocab = Vocabulary::from_corpus(&corpus(&["C4", "E4", "G4", "C4"])).unwrap();
        assert_eq!(vocab.index_of(&Token::from("C4")), Some(0));
        assert_eq!(vocab.index_of(&Token::from("E4")), Some(1));
        assert_eq!(vocab.index_of(&Token::from("G4")), Some(2));
    }

    #[test]
    fn test_bijective() {
        let vocab = Vocabulary::from_corpus(&corpus(&["2.6.9", "C4", "B3"])).unwrap();
        for i in 0..vocab.len() {
            let token = vocab.token_at(i).unwrap();
            assert_eq!(vocab.index_of(token), Some(i));
        }
        assert_eq!(vocab.token_at(vocab.len()), None);
    }

    #[test]
    fn test_size_bounded_by_corpus() {
        let c = corpus(&["C4", "C4", "C4"]);
        let vocab = Vocabulary::from_corpus(&c).unwrap();
        assert!(vocab.len() <= c.len());
        assert_eq!(vocab.len(), 1);
    }

    #[test]
    fn test_deterministic_across_builds() {
        let c = corpus(&["E4", "2.6.9", "C4", "E4", "A2"]);
        let a = Vocabulary::from_corpus(&c).unwrap();
        let b = Vocabulary::from_corpus(&c).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_encode_corpus() {
        let c = corpus(&["C4", "E4", "G4", "C4"]);
        let vocab = Vocabulary::from_corpus(&c).unwrap();
        assert_eq!(vocab.encode_corpus(&c).unwrap(), vec![0, 1, 2, 0]);
    }

    #[test]
    fn test_unknown_token_rejected() {
        let vocab = Vocabulary::from_corpus(&corpus(&["C4"])).unwrap();
        assert!(matches!(
            vocab.encode_corpus(&corpus(&["C4", "D4"])),
            Err(Error::UnknownToken(_))
        ));
    }

    #[test]
    fn test_corpus_round_trip() {
        let dir = std::env::temp_dir().join("cadenza_seq_vocab_test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("notes.json");

        let c = corpus(&["C4", "2.6.9", "F#3"]);
        save_corpus(&c, &path).unwrap();
        let loaded = load_corpus(&path).unwrap();
        assert_eq!(loaded, c);

        std::fs::remove_file(&path).ok();
    }
}
