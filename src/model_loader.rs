// src/model_loader.rs

use crate::matrix::{Matrix, MatrixError};
use crate::rnn::{NetworkError, RecurrentNetwork};
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Read, Write};
use std::path::Path;

// Model file layout:
//   i32 LE input_size | i32 LE hidden_size | i32 LE output_size | f64 LE learning_rate
//   hidden_weights, output_weights, hidden_state in the Matrix text format

#[derive(Debug)]
pub enum ModelLoaderError {
    IoError(io::Error),
    Matrix(MatrixError),
    Network(NetworkError),
    InvalidHeader(String),
    DataCorruption(String),
}

impl std::fmt::Display for ModelLoaderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ModelLoaderError::IoError(e) => write!(f, "IO error: {}", e),
            ModelLoaderError::Matrix(e) => write!(f, "Matrix error: {}", e),
            ModelLoaderError::Network(e) => write!(f, "Network error: {}", e),
            ModelLoaderError::InvalidHeader(s) => write!(f, "Invalid model header: {}", s),
            ModelLoaderError::DataCorruption(s) => write!(f, "Corrupted model data: {}", s),
        }
    }
}

impl std::error::Error for ModelLoaderError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ModelLoaderError::IoError(ref e) => Some(e),
            ModelLoaderError::Matrix(ref e) => Some(e),
            ModelLoaderError::Network(ref e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for ModelLoaderError {
    fn from(err: io::Error) -> ModelLoaderError {
        ModelLoaderError::IoError(err)
    }
}

impl From<MatrixError> for ModelLoaderError {
    fn from(err: MatrixError) -> ModelLoaderError {
        ModelLoaderError::Matrix(err)
    }
}

impl From<NetworkError> for ModelLoaderError {
    fn from(err: NetworkError) -> ModelLoaderError {
        ModelLoaderError::Network(err)
    }
}

fn size_to_i32(value: usize, name: &str) -> Result<i32, ModelLoaderError> {
    i32::try_from(value).map_err(|_| {
        ModelLoaderError::InvalidHeader(format!("{} = {} does not fit in an i32", name, value))
    })
}

fn read_size<R: Read + ?Sized>(reader: &mut R, name: &str) -> Result<usize, ModelLoaderError> {
    let mut bytes = [0u8; 4];
    reader.read_exact(&mut bytes)?;
    let value = i32::from_le_bytes(bytes);
    if value <= 0 {
        return Err(ModelLoaderError::InvalidHeader(format!(
            "{} must be positive, found {}",
            name, value
        )));
    }
    Ok(value as usize)
}

fn expect_shape(m: &Matrix, rows: usize, cols: usize, name: &str) -> Result<(), ModelLoaderError> {
    if m.shape() != (rows, cols) {
        return Err(ModelLoaderError::DataCorruption(format!(
            "{} is {}x{}, header implies {}x{}",
            name,
            m.rows(),
            m.cols(),
            rows,
            cols
        )));
    }
    Ok(())
}

pub fn write_network<W: Write + ?Sized>(
    net: &RecurrentNetwork,
    writer: &mut W,
) -> Result<(), ModelLoaderError> {
    let input_size = size_to_i32(net.input_size(), "input_size")?;
    let hidden_size = size_to_i32(net.hidden_size(), "hidden_size")?;
    let output_size = size_to_i32(net.output_size(), "output_size")?;

    writer.write_all(&input_size.to_le_bytes())?;
    writer.write_all(&hidden_size.to_le_bytes())?;
    writer.write_all(&output_size.to_le_bytes())?;
    writer.write_all(&net.learning_rate().to_le_bytes())?;

    net.hidden_weights().save(writer)?;
    net.output_weights().save(writer)?;
    net.hidden_state().save(writer)?;
    Ok(())
}

pub fn read_network<R: BufRead + ?Sized>(reader: &mut R) -> Result<RecurrentNetwork, ModelLoaderError> {
    let input_size = read_size(reader, "input_size")?;
    let hidden_size = read_size(reader, "hidden_size")?;
    let output_size = read_size(reader, "output_size")?;

    let mut lr_bytes = [0u8; 8];
    reader.read_exact(&mut lr_bytes)?;
    let learning_rate = f64::from_le_bytes(lr_bytes);
    if !learning_rate.is_finite() || learning_rate <= 0.0 {
        return Err(ModelLoaderError::InvalidHeader(format!(
            "learning_rate must be positive and finite, found {}",
            learning_rate
        )));
    }

    let hidden_weights = Matrix::load(reader)?;
    expect_shape(&hidden_weights, hidden_size, input_size, "hidden_weights")?;
    let output_weights = Matrix::load(reader)?;
    expect_shape(&output_weights, output_size, hidden_size, "output_weights")?;
    let hidden_state = Matrix::load(reader)?;
    expect_shape(&hidden_state, hidden_size, 1, "hidden_state")?;

    Ok(RecurrentNetwork::from_parts(
        learning_rate,
        hidden_weights,
        output_weights,
        hidden_state,
    )?)
}

pub fn save_network<P: AsRef<Path>>(net: &RecurrentNetwork, path: P) -> Result<(), ModelLoaderError> {
    let path = path.as_ref();
    let mut writer = BufWriter::new(File::create(path)?);
    write_network(net, &mut writer)?;
    writer.flush()?;
    log::info!(
        "Saved {}x{}x{} network to {}",
        net.input_size(),
        net.hidden_size(),
        net.output_size(),
        path.display()
    );
    Ok(())
}

pub fn load_network<P: AsRef<Path>>(path: P) -> Result<RecurrentNetwork, ModelLoaderError> {
    let path = path.as_ref();
    let mut reader = BufReader::new(File::open(path)?);
    let net = read_network(&mut reader)?;
    log::info!(
        "Loaded {}x{}x{} network from {}",
        net.input_size(),
        net.hidden_size(),
        net.output_size(),
        path.display()
    );
    Ok(net)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::io::Cursor;
    use tempfile::NamedTempFile;

    fn sample_network() -> RecurrentNetwork {
        let mut rng = StdRng::seed_from_u64(5);
        let mut net = RecurrentNetwork::new(3, 4, 2, 0.125, &mut rng).unwrap();
        // Give the hidden state non-zero content.
        net.forward(&Matrix::one_hot(3, 0).unwrap()).unwrap();
        net
    }

    fn assert_matrices_close(a: &Matrix, b: &Matrix) {
        assert_eq!(a.shape(), b.shape());
        for (x, y) in a.as_slice().iter().zip(b.as_slice()) {
            assert_abs_diff_eq!(*x, *y, epsilon = 5e-7);
        }
    }

    #[test]
    fn test_header_layout() {
        let net = sample_network();
        let mut bytes = Vec::new();
        write_network(&net, &mut bytes).unwrap();
        assert_eq!(&bytes[0..4], &3i32.to_le_bytes());
        assert_eq!(&bytes[4..8], &4i32.to_le_bytes());
        assert_eq!(&bytes[8..12], &2i32.to_le_bytes());
        assert_eq!(&bytes[12..20], &0.125f64.to_le_bytes());
        assert!(bytes[20..].starts_with(b"4\n3\n"));
    }

    #[test]
    fn test_save_and_load_file() {
        let net = sample_network();
        let temp_file = NamedTempFile::new().unwrap();
        save_network(&net, temp_file.path()).unwrap();

        let loaded = load_network(temp_file.path()).unwrap();
        assert_eq!(loaded.input_size(), 3);
        assert_eq!(loaded.hidden_size(), 4);
        assert_eq!(loaded.output_size(), 2);
        assert_eq!(loaded.learning_rate(), 0.125);
        assert_matrices_close(loaded.hidden_weights(), net.hidden_weights());
        assert_matrices_close(loaded.output_weights(), net.output_weights());
        assert_matrices_close(loaded.hidden_state(), net.hidden_state());
    }

    #[test]
    fn test_file_not_found() {
        let result = load_network("non_existent_model.bin");
        assert!(matches!(result, Err(ModelLoaderError::IoError(_))));
    }

    #[test]
    fn test_header_too_short() {
        let mut cursor = Cursor::new(vec![3u8, 0, 0, 0, 4, 0]);
        let result = read_network(&mut cursor);
        assert!(matches!(result, Err(ModelLoaderError::IoError(e)) if e.kind() == io::ErrorKind::UnexpectedEof));
    }

    #[test]
    fn test_non_positive_size_in_header() {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&3i32.to_le_bytes());
        bytes.extend_from_slice(&(-4i32).to_le_bytes());
        bytes.extend_from_slice(&2i32.to_le_bytes());
        bytes.extend_from_slice(&0.1f64.to_le_bytes());
        let result = read_network(&mut Cursor::new(bytes));
        assert!(matches!(result, Err(ModelLoaderError::InvalidHeader(s)) if s.contains("hidden_size")));
    }

    #[test]
    fn test_truncated_matrix_data() {
        let net = sample_network();
        let mut bytes = Vec::new();
        write_network(&net, &mut bytes).unwrap();
        bytes.truncate(bytes.len() - 12);
        let result = read_network(&mut Cursor::new(bytes));
        assert!(matches!(
            result,
            Err(ModelLoaderError::Matrix(MatrixError::Truncated(_)))
        ));
    }

    #[test]
    fn test_matrix_shape_disagrees_with_header() {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&2i32.to_le_bytes());
        bytes.extend_from_slice(&1i32.to_le_bytes());
        bytes.extend_from_slice(&2i32.to_le_bytes());
        bytes.extend_from_slice(&0.1f64.to_le_bytes());
        // hidden_weights should be 1x2
        bytes.extend_from_slice(b"2\n1\n0.1\n0.2\n");
        let result = read_network(&mut Cursor::new(bytes));
        assert!(matches!(result, Err(ModelLoaderError::DataCorruption(s)) if s.contains("hidden_weights")));
    }
}
