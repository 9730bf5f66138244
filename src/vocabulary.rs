// src/vocabulary.rs

use crate::matrix::{Matrix, MatrixError};
use std::collections::HashMap;

/// Tokens reserved at the start of every vocabulary, in id order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpecialToken {
    Pad,
    Bos,
    Eos,
    Unk,
}

impl SpecialToken {
    pub const ALL: [SpecialToken; 4] = [
        SpecialToken::Pad,
        SpecialToken::Bos,
        SpecialToken::Eos,
        SpecialToken::Unk,
    ];

    pub fn id(self) -> usize {
        self as usize
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SpecialToken::Pad => "<pad>",
            SpecialToken::Bos => "<bos>",
            SpecialToken::Eos => "<eos>",
            SpecialToken::Unk => "<unk>",
        }
    }
}

#[derive(Debug, PartialEq)]
pub enum VocabularyError {
    UnknownWord(String),
    Full(usize),
    Matrix(MatrixError),
}

impl std::fmt::Display for VocabularyError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VocabularyError::UnknownWord(w) => write!(f, "Word '{}' not found in vocabulary", w),
            VocabularyError::Full(cap) => write!(f, "Vocabulary already full ({} entries)", cap),
            VocabularyError::Matrix(e) => write!(f, "Matrix error: {}", e),
        }
    }
}

impl std::error::Error for VocabularyError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            VocabularyError::Matrix(ref e) => Some(e),
            _ => None,
        }
    }
}

impl From<MatrixError> for VocabularyError {
    fn from(err: MatrixError) -> VocabularyError {
        VocabularyError::Matrix(err)
    }
}

/// Word <-> id table with dense ids assigned in insertion order.
#[derive(Debug, Clone)]
pub struct Vocabulary {
    word_to_id: HashMap<String, usize>,
    id_to_word: Vec<String>,
    capacity: Option<usize>,
}

impl Default for Vocabulary {
    fn default() -> Self {
        Self::new()
    }
}

impl Vocabulary {
    /// Unbounded vocabulary holding only the special tokens.
    pub fn new() -> Self {
        Self::build(None)
    }

    /// Vocabulary that accepts at most `words` entries besides the special tokens.
    pub fn with_capacity(words: usize) -> Self {
        Self::build(Some(words + SpecialToken::ALL.len()))
    }

    fn build(capacity: Option<usize>) -> Self {
        let mut vocab = Vocabulary {
            word_to_id: HashMap::new(),
            id_to_word: Vec::new(),
            capacity,
        };
        for token in SpecialToken::ALL {
            vocab.insert(token.as_str());
        }
        vocab
    }

    fn insert(&mut self, word: &str) -> usize {
        let id = self.id_to_word.len();
        self.word_to_id.insert(word.to_string(), id);
        self.id_to_word.push(word.to_string());
        id
    }

    /// Returns the id of `word`, adding it if it is new.
    pub fn add_word(&mut self, word: &str) -> Result<usize, VocabularyError> {
        if let Some(&id) = self.word_to_id.get(word) {
            return Ok(id);
        }
        if let Some(cap) = self.capacity {
            if self.id_to_word.len() >= cap {
                return Err(VocabularyError::Full(cap));
            }
        }
        Ok(self.insert(word))
    }

    pub fn lookup_id(&self, word: &str) -> Option<usize> {
        self.word_to_id.get(word).copied()
    }

    pub fn get_word(&self, id: usize) -> Option<&str> {
        self.id_to_word.get(id).map(String::as_str)
    }

    /// `len() x 1` column vector with a 1.0 at the id of `word`.
    pub fn one_hot(&self, word: &str) -> Result<Matrix, VocabularyError> {
        let id = self
            .lookup_id(word)
            .ok_or_else(|| VocabularyError::UnknownWord(word.to_string()))?;
        Ok(Matrix::one_hot(self.len(), id)?)
    }

    pub fn len(&self) -> usize {
        self.id_to_word.len()
    }

    pub fn is_empty(&self) -> bool {
        self.id_to_word.is_empty()
    }

    /// Words in id order, special tokens first.
    pub fn words(&self) -> impl Iterator<Item = &str> {
        self.id_to_word.iter().map(String::as_str)
    }
}
