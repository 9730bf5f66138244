// src/rnn.rs

use crate::matrix::{Matrix, MatrixError};
use crate::model_loader::{self, ModelLoaderError};
use rand::Rng;
use std::path::Path;

#[derive(Debug, PartialEq)]
pub enum NetworkError {
    Matrix(MatrixError),
    InvalidConfig(String),
    InputShape(String),
}

impl std::fmt::Display for NetworkError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NetworkError::Matrix(e) => write!(f, "Matrix error: {}", e),
            NetworkError::InvalidConfig(s) => write!(f, "Invalid network configuration: {}", s),
            NetworkError::InputShape(s) => write!(f, "Input shape error: {}", s),
        }
    }
}

impl std::error::Error for NetworkError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            NetworkError::Matrix(ref e) => Some(e),
            _ => None,
        }
    }
}

impl From<MatrixError> for NetworkError {
    fn from(err: MatrixError) -> NetworkError {
        NetworkError::Matrix(err)
    }
}

/// Single-layer recurrent network with a tanh hidden layer and a linear
/// output layer.
///
/// The hidden state is carried between calls: every `forward` replaces it
/// with the new activation and every `backward` replaces it with the
/// hidden-layer error, so the order of calls changes the results.
#[derive(Debug, Clone)]
pub struct RecurrentNetwork {
    input_size: usize,
    hidden_size: usize,
    output_size: usize,
    learning_rate: f64,
    hidden_weights: Matrix, // [hidden_size, input_size]
    output_weights: Matrix, // [output_size, hidden_size]
    hidden_state: Matrix,   // [hidden_size, 1]
}

fn check_learning_rate(learning_rate: f64) -> Result<(), NetworkError> {
    if !learning_rate.is_finite() || learning_rate <= 0.0 {
        return Err(NetworkError::InvalidConfig(format!(
            "learning_rate must be a positive finite number, got {}",
            learning_rate
        )));
    }
    Ok(())
}

impl RecurrentNetwork {
    /// Builds a network with Xavier-uniform weights and a zeroed hidden state.
    pub fn new<R: Rng + ?Sized>(
        input_size: usize,
        hidden_size: usize,
        output_size: usize,
        learning_rate: f64,
        rng: &mut R,
    ) -> Result<Self, NetworkError> {
        if input_size == 0 || hidden_size == 0 || output_size == 0 {
            return Err(NetworkError::InvalidConfig(format!(
                "sizes must be positive, got input={} hidden={} output={}",
                input_size, hidden_size, output_size
            )));
        }
        check_learning_rate(learning_rate)?;

        let mut hidden_weights = Matrix::zeros(hidden_size, input_size)?;
        hidden_weights.xavier_randomize(rng, input_size, hidden_size)?;

        let mut output_weights = Matrix::zeros(output_size, hidden_size)?;
        output_weights.xavier_randomize(rng, hidden_size, output_size)?;

        let hidden_state = Matrix::zeros(hidden_size, 1)?;

        Ok(Self {
            input_size,
            hidden_size,
            output_size,
            learning_rate,
            hidden_weights,
            output_weights,
            hidden_state,
        })
    }

    /// Assembles a network from existing parameters, deriving the sizes from
    /// the weight shapes.
    pub fn from_parts(
        learning_rate: f64,
        hidden_weights: Matrix,
        output_weights: Matrix,
        hidden_state: Matrix,
    ) -> Result<Self, NetworkError> {
        check_learning_rate(learning_rate)?;
        let (hidden_size, input_size) = hidden_weights.shape();
        let output_size = output_weights.rows();

        if input_size == 0 || hidden_size == 0 || output_size == 0 {
            return Err(NetworkError::InvalidConfig(format!(
                "sizes must be positive, got input={} hidden={} output={}",
                input_size, hidden_size, output_size
            )));
        }
        if output_weights.cols() != hidden_size {
            return Err(NetworkError::InvalidConfig(format!(
                "output_weights is {}x{}, expected {} columns to match hidden_weights {}x{}",
                output_size,
                output_weights.cols(),
                hidden_size,
                hidden_size,
                input_size
            )));
        }
        if hidden_state.shape() != (hidden_size, 1) {
            return Err(NetworkError::InvalidConfig(format!(
                "hidden_state is {}x{}, expected {}x1",
                hidden_state.rows(),
                hidden_state.cols(),
                hidden_size
            )));
        }

        Ok(Self {
            input_size,
            hidden_size,
            output_size,
            learning_rate,
            hidden_weights,
            output_weights,
            hidden_state,
        })
    }

    pub fn input_size(&self) -> usize {
        self.input_size
    }

    pub fn hidden_size(&self) -> usize {
        self.hidden_size
    }

    pub fn output_size(&self) -> usize {
        self.output_size
    }

    pub fn learning_rate(&self) -> f64 {
        self.learning_rate
    }

    pub fn hidden_weights(&self) -> &Matrix {
        &self.hidden_weights
    }

    pub fn output_weights(&self) -> &Matrix {
        &self.output_weights
    }

    pub fn hidden_state(&self) -> &Matrix {
        &self.hidden_state
    }

    /// Zeroes the hidden state so the next call starts a fresh sequence.
    pub fn reset_state(&mut self) {
        self.hidden_state.fill(0.0);
    }

    fn check_column(&self, m: &Matrix, rows: usize, what: &str) -> Result<(), NetworkError> {
        if m.shape() != (rows, 1) {
            return Err(NetworkError::InputShape(format!(
                "{} must be {}x1, got {}x{}",
                what,
                rows,
                m.rows(),
                m.cols()
            )));
        }
        Ok(())
    }

    /// `h = tanh(W_h * input + h_prev)`, returns `W_o * h`.
    ///
    /// The hidden state is replaced by `h`.
    pub fn forward(&mut self, input: &Matrix) -> Result<Matrix, NetworkError> {
        self.check_column(input, self.input_size, "input")?;

        let hidden_input = self.hidden_weights.dot(input)?;
        let pre_activation = hidden_input.add(&self.hidden_state)?;
        let activated = pre_activation.apply(f64::tanh)?;
        let output = self.output_weights.dot(&activated)?;

        self.hidden_state = activated;
        Ok(output)
    }

    /// One step of gradient descent on `(input, target)`.
    ///
    /// Runs `forward` first, so the hidden state advances before the update.
    /// The hidden-layer error is computed with the output weights *after*
    /// they have been updated, and becomes the new hidden state.
    pub fn backward(&mut self, input: &Matrix, target: &Matrix) -> Result<(), NetworkError> {
        self.check_column(input, self.input_size, "input")?;
        self.check_column(target, self.output_size, "target")?;

        let output = self.forward(input)?;
        let output_error = output.subtract(target)?;

        // dL/dW_o = e * h^T
        let output_weights_gradient = output_error.dot(&self.hidden_state.transpose()?)?;
        let updated_output_weights = self
            .output_weights
            .subtract(&output_weights_gradient.scale(self.learning_rate)?)?;

        let hidden_error = updated_output_weights.transpose()?.dot(&output_error)?;

        // dL/dW_h = e_h * x^T
        let hidden_weights_gradient = hidden_error.dot(&input.transpose()?)?;
        let updated_hidden_weights = self
            .hidden_weights
            .subtract(&hidden_weights_gradient.scale(self.learning_rate)?)?;

        self.output_weights = updated_output_weights;
        self.hidden_weights = updated_hidden_weights;
        self.hidden_state = hidden_error;
        Ok(())
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), ModelLoaderError> {
        model_loader::save_network(self, path)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ModelLoaderError> {
        model_loader::load_network(path)
    }
}
