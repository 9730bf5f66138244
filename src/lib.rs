// src/lib.rs

// Recurrent next-word model trained one step at a time, with greedy text
// generation on top.

pub mod config;
pub mod corpus;
pub mod matrix;
pub mod model_loader;
pub mod rng;
pub mod rnn;
pub mod runtime_interface;
pub mod text_generator;
pub mod training;
pub mod vocabulary;

pub use matrix::{Matrix, MatrixError};
pub use rnn::{NetworkError, RecurrentNetwork};
pub use text_generator::generate_text;
pub use vocabulary::{SpecialToken, Vocabulary};
