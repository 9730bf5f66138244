// src/corpus.rs

use crate::training::TrainingSample;
use crate::vocabulary::{Vocabulary, VocabularyError};

pub const DEFAULT_SENTENCES: [&str; 6] = [
    "Matrix dimensions don’t match? Shocking.",
    "Rain on the window? Wow, never seen that before.",
    "Starting is the hardest part? Groundbreaking insight.",
    "Traveling? Because who wouldn’t want to get lost in a new place?",
    "Books? Oh yeah, they’re just full of ideas or whatever.",
    "Time’s too short for pointless stuff... unless it’s procrastination.",
];

/// Splits on single spaces; punctuation stays attached to its word.
pub fn tokenize(sentence: &str) -> impl Iterator<Item = &str> {
    sentence.split(' ').filter(|w| !w.is_empty())
}

#[derive(Debug, Clone)]
pub struct Corpus {
    sentences: Vec<String>,
}

impl Default for Corpus {
    fn default() -> Self {
        Corpus::new(DEFAULT_SENTENCES.iter().map(|s| s.to_string()).collect())
    }
}

impl Corpus {
    pub fn new(sentences: Vec<String>) -> Self {
        Self { sentences }
    }

    pub fn sentences(&self) -> &[String] {
        &self.sentences
    }

    /// Special tokens followed by every word of the corpus in first-seen order.
    pub fn build_vocabulary(&self) -> Result<Vocabulary, VocabularyError> {
        let mut vocab = Vocabulary::new();
        for sentence in &self.sentences {
            for word in tokenize(sentence) {
                vocab.add_word(word)?;
            }
        }
        log::debug!("Built vocabulary of {} entries", vocab.len());
        Ok(vocab)
    }

    /// One (first word -> second word) pair per sentence.
    pub fn training_pairs(&self, vocab: &Vocabulary) -> Result<Vec<TrainingSample>, VocabularyError> {
        let mut samples = Vec::with_capacity(self.sentences.len());
        for sentence in &self.sentences {
            let mut words = tokenize(sentence);
            match (words.next(), words.next()) {
                (Some(first), Some(second)) => samples.push(TrainingSample {
                    input: vocab.one_hot(first)?,
                    target: vocab.one_hot(second)?,
                }),
                _ => log::warn!("Skipping sentence with fewer than two words: {:?}", sentence),
            }
        }
        Ok(samples)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_skips_repeated_spaces() {
        let words: Vec<&str> = tokenize("  Rain  on the window? ").collect();
        assert_eq!(words, vec!["Rain", "on", "the", "window?"]);
    }

    #[test]
    fn test_build_vocabulary_two_words() {
        let corpus = Corpus::new(vec!["a b".to_string()]);
        let vocab = corpus.build_vocabulary().unwrap();
        assert_eq!(vocab.len(), 6);
        assert_eq!(vocab.lookup_id("a"), Some(4));
        assert_eq!(vocab.lookup_id("b"), Some(5));
    }

    #[test]
    fn test_default_corpus_vocabulary() {
        let corpus = Corpus::default();
        let vocab = corpus.build_vocabulary().unwrap();
        assert_eq!(vocab.lookup_id("Matrix"), Some(4));
        // "the" appears twice but is stored once.
        let the_count = vocab.words().filter(|w| *w == "the").count();
        assert_eq!(the_count, 1);
    }

    #[test]
    fn test_training_pairs_first_two_words() {
        let corpus = Corpus::new(vec![
            "a b c".to_string(),
            "lonely".to_string(),
            "c a".to_string(),
        ]);
        let vocab = corpus.build_vocabulary().unwrap();
        let pairs = corpus.training_pairs(&vocab).unwrap();
        assert_eq!(pairs.len(), 2);
        assert_eq!(pairs[0].input, vocab.one_hot("a").unwrap());
        assert_eq!(pairs[0].target, vocab.one_hot("b").unwrap());
        assert_eq!(pairs[1].input, vocab.one_hot("c").unwrap());
        assert_eq!(pairs[1].target, vocab.one_hot("a").unwrap());
    }

    #[test]
    fn test_training_pairs_against_foreign_vocabulary() {
        let corpus = Corpus::new(vec!["x y".to_string()]);
        let vocab = Vocabulary::new();
        assert!(matches!(
            corpus.training_pairs(&vocab),
            Err(VocabularyError::UnknownWord(w)) if w == "x"
        ));
    }
}
