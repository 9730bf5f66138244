// src/text_generator.rs

use crate::matrix::{Matrix, MatrixError};
use crate::rnn::{NetworkError, RecurrentNetwork};
use crate::vocabulary::{Vocabulary, VocabularyError};

#[derive(Debug)]
pub enum TextGeneratorError {
    Network(NetworkError),
    Matrix(MatrixError),
    Vocabulary(VocabularyError),
    UnknownWord(String),
    UnknownToken(usize),
    InvalidInput(String),
}

impl std::fmt::Display for TextGeneratorError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TextGeneratorError::Network(e) => write!(f, "Network error: {}", e),
            TextGeneratorError::Matrix(e) => write!(f, "Matrix error: {}", e),
            TextGeneratorError::Vocabulary(e) => write!(f, "Vocabulary error: {}", e),
            TextGeneratorError::UnknownWord(w) => write!(f, "Word '{}' not found in vocabulary", w),
            TextGeneratorError::UnknownToken(id) => write!(f, "No word for predicted id {}", id),
            TextGeneratorError::InvalidInput(s) => write!(f, "Invalid input: {}", s),
        }
    }
}

impl std::error::Error for TextGeneratorError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TextGeneratorError::Network(ref e) => Some(e),
            TextGeneratorError::Matrix(ref e) => Some(e),
            TextGeneratorError::Vocabulary(ref e) => Some(e),
            _ => None,
        }
    }
}

impl From<NetworkError> for TextGeneratorError {
    fn from(err: NetworkError) -> TextGeneratorError {
        TextGeneratorError::Network(err)
    }
}

impl From<MatrixError> for TextGeneratorError {
    fn from(err: MatrixError) -> TextGeneratorError {
        TextGeneratorError::Matrix(err)
    }
}

impl From<VocabularyError> for TextGeneratorError {
    fn from(err: VocabularyError) -> TextGeneratorError {
        match err {
            VocabularyError::UnknownWord(w) => TextGeneratorError::UnknownWord(w),
            other => TextGeneratorError::Vocabulary(other),
        }
    }
}

/// Greedy continuation of `seed_word`: `length` words, space separated.
///
/// Each step feeds the previous prediction back in as a one-hot input, so
/// the network's hidden state advances `length` times.
pub fn generate_text(
    vocabulary: &Vocabulary,
    network: &mut RecurrentNetwork,
    seed_word: &str,
    length: usize,
) -> Result<String, TextGeneratorError> {
    let seed = vocabulary.one_hot(seed_word)?;
    if seed.rows() != network.input_size() {
        return Err(TextGeneratorError::InvalidInput(format!(
            "vocabulary has {} entries but the network expects {} inputs",
            seed.rows(),
            network.input_size()
        )));
    }

    let mut input = seed;
    let mut words: Vec<&str> = Vec::with_capacity(length);
    for step in 0..length {
        let output = network.forward(&input)?;
        let predicted_id = output.argmax()?;
        let word = vocabulary
            .get_word(predicted_id)
            .ok_or(TextGeneratorError::UnknownToken(predicted_id))?;
        log::debug!("Step {}: predicted id {} ('{}')", step, predicted_id, word);
        words.push(word);

        input = Matrix::one_hot(network.input_size(), predicted_id).map_err(|_| {
            TextGeneratorError::InvalidInput(format!(
                "predicted id {} does not fit the {}-wide network input",
                predicted_id,
                network.input_size()
            ))
        })?;
    }

    Ok(words.join(" "))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vocab_ab() -> Vocabulary {
        let mut v = Vocabulary::new();
        v.add_word("a").unwrap();
        v.add_word("b").unwrap();
        v
    }

    // Every input maps to a hidden activation that only scores output `target`.
    fn constant_network(size: usize, target: usize) -> RecurrentNetwork {
        let hidden_weights = Matrix::filled(1, size, 1.0).unwrap();
        let mut output_weights = Matrix::zeros(size, 1).unwrap();
        output_weights.set(target, 0, 1.0).unwrap();
        RecurrentNetwork::from_parts(0.1, hidden_weights, output_weights, Matrix::zeros(1, 1).unwrap())
            .unwrap()
    }

    #[test]
    fn test_generate_repeats_constant_prediction() {
        let v = vocab_ab();
        let mut net = constant_network(v.len(), 5);
        let text = generate_text(&v, &mut net, "a", 3).unwrap();
        assert_eq!(text, "b b b");
    }

    #[test]
    fn test_generate_single_word_has_no_trailing_space() {
        let v = vocab_ab();
        let mut net = constant_network(v.len(), 4);
        assert_eq!(generate_text(&v, &mut net, "b", 1).unwrap(), "a");
    }

    #[test]
    fn test_generate_zero_length() {
        let v = vocab_ab();
        let mut net = constant_network(v.len(), 4);
        assert_eq!(generate_text(&v, &mut net, "a", 0).unwrap(), "");
        assert_eq!(net.hidden_state().get(0, 0).unwrap(), 0.0);
    }

    #[test]
    fn test_generate_unknown_seed_word() {
        let v = vocab_ab();
        let mut net = constant_network(v.len(), 4);
        let result = generate_text(&v, &mut net, "zzz", 2);
        assert!(matches!(result, Err(TextGeneratorError::UnknownWord(w)) if w == "zzz"));
    }

    #[test]
    fn test_generate_vocabulary_size_mismatch() {
        let v = vocab_ab();
        let mut net = constant_network(v.len() + 1, 4);
        let result = generate_text(&v, &mut net, "a", 2);
        assert!(matches!(result, Err(TextGeneratorError::InvalidInput(_))));
    }

    #[test]
    fn test_generate_prediction_outside_vocabulary() {
        let v = vocab_ab();
        // Output layer wider than the vocabulary, scoring id 6.
        let hidden_weights = Matrix::filled(1, v.len(), 1.0).unwrap();
        let mut output_weights = Matrix::zeros(7, 1).unwrap();
        output_weights.set(6, 0, 1.0).unwrap();
        let mut net = RecurrentNetwork::from_parts(
            0.1,
            hidden_weights,
            output_weights,
            Matrix::zeros(1, 1).unwrap(),
        )
        .unwrap();
        let result = generate_text(&v, &mut net, "a", 1);
        assert!(matches!(result, Err(TextGeneratorError::UnknownToken(6))));
    }
}
