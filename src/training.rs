// src/training.rs

use crate::matrix::{Matrix, MatrixError};
use crate::rnn::{NetworkError, RecurrentNetwork};

#[derive(Debug, Clone, PartialEq)]
pub struct TrainingSample {
    pub input: Matrix,
    pub target: Matrix,
}

#[derive(Debug, Clone, Copy)]
pub struct TrainingOptions {
    pub epochs: usize,
    /// Log the average loss every `log_every` epochs; 0 disables logging.
    pub log_every: usize,
}

impl Default for TrainingOptions {
    fn default() -> Self {
        Self { epochs: 5000, log_every: 1000 }
    }
}

#[derive(Debug, PartialEq)]
pub enum TrainingError {
    Network(NetworkError),
    Matrix(MatrixError),
    Empty,
}

impl std::fmt::Display for TrainingError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TrainingError::Network(e) => write!(f, "Network error: {}", e),
            TrainingError::Matrix(e) => write!(f, "Matrix error: {}", e),
            TrainingError::Empty => write!(f, "No training samples"),
        }
    }
}

impl std::error::Error for TrainingError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TrainingError::Network(ref e) => Some(e),
            TrainingError::Matrix(ref e) => Some(e),
            TrainingError::Empty => None,
        }
    }
}

impl From<NetworkError> for TrainingError {
    fn from(err: NetworkError) -> TrainingError {
        TrainingError::Network(err)
    }
}

impl From<MatrixError> for TrainingError {
    fn from(err: MatrixError) -> TrainingError {
        TrainingError::Matrix(err)
    }
}

/// One pass over `samples`, returning the average loss.
///
/// Each sample gets a `forward` (whose output is scored) followed by a
/// `backward`; both advance the hidden state.
pub fn train_epoch(
    net: &mut RecurrentNetwork,
    samples: &[TrainingSample],
) -> Result<f64, TrainingError> {
    if samples.is_empty() {
        return Err(TrainingError::Empty);
    }
    let mut epoch_loss = 0.0;
    for sample in samples {
        let output = net.forward(&sample.input)?;
        net.backward(&sample.input, &sample.target)?;
        epoch_loss += Matrix::mean_square_error(&output, &sample.target)?;
    }
    Ok(epoch_loss / samples.len() as f64)
}

/// Runs `options.epochs` epochs and returns the per-epoch average loss.
pub fn train(
    net: &mut RecurrentNetwork,
    samples: &[TrainingSample],
    options: &TrainingOptions,
) -> Result<Vec<f64>, TrainingError> {
    if samples.is_empty() {
        return Err(TrainingError::Empty);
    }
    log::info!(
        "Training on {} samples for {} epochs (learning rate {})",
        samples.len(),
        options.epochs,
        net.learning_rate()
    );
    let mut history = Vec::with_capacity(options.epochs);
    for epoch in 0..options.epochs {
        let avg_loss = train_epoch(net, samples)?;
        if options.log_every > 0 && epoch % options.log_every == 0 {
            log::info!("Epoch {}, Average Loss: {:.6}", epoch, avg_loss);
        }
        history.push(avg_loss);
    }
    Ok(history)
}
