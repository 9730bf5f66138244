// src/matrix.rs

use rand::distributions::{Distribution, Uniform};
use rand::Rng;
use std::fmt;
use std::io::{BufRead, Write};

#[derive(Debug, PartialEq)]
pub enum MatrixError {
    ShapeMismatch(String),
    IncompatibleShapes(String), // For dot/multiply
    InvalidDimension(String),
    OutOfBounds(String),
    Allocation(String),
    Truncated(String),
    Parse(String),
    Io(String),
}

impl std::fmt::Display for MatrixError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MatrixError::ShapeMismatch(s) => write!(f, "Shape mismatch: {}", s),
            MatrixError::IncompatibleShapes(s) => write!(f, "Incompatible shapes: {}", s),
            MatrixError::InvalidDimension(s) => write!(f, "Invalid dimension: {}", s),
            MatrixError::OutOfBounds(s) => write!(f, "Out of bounds: {}", s),
            MatrixError::Allocation(s) => write!(f, "Allocation failed: {}", s),
            MatrixError::Truncated(s) => write!(f, "Truncated matrix data: {}", s),
            MatrixError::Parse(s) => write!(f, "Malformed matrix data: {}", s),
            MatrixError::Io(s) => write!(f, "Matrix I/O error: {}", s),
        }
    }
}

impl std::error::Error for MatrixError {}

impl From<std::io::Error> for MatrixError {
    fn from(err: std::io::Error) -> MatrixError {
        MatrixError::Io(err.to_string())
    }
}

/// Dense row-major matrix of `f64`.
///
/// Every operation that produces a matrix hands back a freshly allocated,
/// independently owned value; only `fill`, `set`, `randomize` and
/// `xavier_randomize` mutate in place.
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

// Empty buffer with room for rows * cols entries.
fn reserve(rows: usize, cols: usize) -> Result<Vec<f64>, MatrixError> {
    let len = rows.checked_mul(cols).ok_or_else(|| {
        MatrixError::Allocation(format!("{}x{} overflows the element count", rows, cols))
    })?;
    let mut data = Vec::new();
    data.try_reserve_exact(len).map_err(|e| {
        MatrixError::Allocation(format!("Cannot allocate {}x{} matrix: {}", rows, cols, e))
    })?;
    Ok(data)
}

impl Matrix {
    pub fn zeros(rows: usize, cols: usize) -> Result<Self, MatrixError> {
        Self::filled(rows, cols, 0.0)
    }

    pub fn filled(rows: usize, cols: usize, value: f64) -> Result<Self, MatrixError> {
        let mut data = reserve(rows, cols)?;
        data.resize(rows * cols, value);
        Ok(Matrix { rows, cols, data })
    }

    pub fn from_vec(rows: usize, cols: usize, data: Vec<f64>) -> Result<Self, MatrixError> {
        let expected = rows.checked_mul(cols).ok_or_else(|| {
            MatrixError::InvalidDimension(format!("{}x{} overflows the element count", rows, cols))
        })?;
        if data.len() != expected {
            return Err(MatrixError::ShapeMismatch(format!(
                "Data length {} does not match shape {}x{}",
                data.len(),
                rows,
                cols
            )));
        }
        Ok(Matrix { rows, cols, data })
    }

    /// Column vector of length `size` with a single 1.0 at `index`.
    pub fn one_hot(size: usize, index: usize) -> Result<Self, MatrixError> {
        if index >= size {
            return Err(MatrixError::OutOfBounds(format!(
                "One-hot index {} out of bounds for size {}",
                index, size
            )));
        }
        let mut m = Self::zeros(size, 1)?;
        m.data[index] = 1.0;
        Ok(m)
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    pub fn same_shape(&self, other: &Matrix) -> bool {
        self.rows == other.rows && self.cols == other.cols
    }

    fn flat_index(&self, row: usize, col: usize) -> Result<usize, MatrixError> {
        if row >= self.rows || col >= self.cols {
            return Err(MatrixError::OutOfBounds(format!(
                "Index ({}, {}) out of bounds for {}x{} matrix",
                row, col, self.rows, self.cols
            )));
        }
        Ok(row * self.cols + col)
    }

    pub fn get(&self, row: usize, col: usize) -> Result<f64, MatrixError> {
        let idx = self.flat_index(row, col)?;
        Ok(self.data[idx])
    }

    pub fn set(&mut self, row: usize, col: usize, value: f64) -> Result<(), MatrixError> {
        let idx = self.flat_index(row, col)?;
        self.data[idx] = value;
        Ok(())
    }

    pub fn fill(&mut self, value: f64) {
        for v in self.data.iter_mut() {
            *v = value;
        }
    }

    /// Fills every entry with `min + u * (max - min)`, `u` uniform in `[0, 1)`.
    pub fn randomize<R: Rng + ?Sized>(&mut self, rng: &mut R, min: f64, max: f64) {
        for v in self.data.iter_mut() {
            *v = min + rng.gen::<f64>() * (max - min);
        }
    }

    /// Xavier/Glorot uniform init over `[-L, L]`, `L = sqrt(6 / (fan_in + fan_out))`.
    pub fn xavier_randomize<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
        input_size: usize,
        output_size: usize,
    ) -> Result<(), MatrixError> {
        let fan = input_size + output_size;
        if fan == 0 {
            return Err(MatrixError::InvalidDimension(
                "Xavier init needs input_size + output_size > 0".to_string(),
            ));
        }
        let limit = (6.0 / fan as f64).sqrt();
        let dist = Uniform::new_inclusive(-limit, limit);
        for v in self.data.iter_mut() {
            *v = dist.sample(rng);
        }
        Ok(())
    }

    fn map<F: Fn(f64) -> f64>(&self, f: F) -> Result<Matrix, MatrixError> {
        let mut data = reserve(self.rows, self.cols)?;
        data.extend(self.data.iter().map(|&v| f(v)));
        Ok(Matrix { rows: self.rows, cols: self.cols, data })
    }

    fn zip_with<F: Fn(f64, f64) -> f64>(
        &self,
        other: &Matrix,
        op: &str,
        f: F,
    ) -> Result<Matrix, MatrixError> {
        if !self.same_shape(other) {
            return Err(MatrixError::ShapeMismatch(format!(
                "{}: {}x{} and {}x{}",
                op, self.rows, self.cols, other.rows, other.cols
            )));
        }
        let mut data = reserve(self.rows, self.cols)?;
        data.extend(self.data.iter().zip(other.data.iter()).map(|(&a, &b)| f(a, b)));
        Ok(Matrix { rows: self.rows, cols: self.cols, data })
    }

    pub fn add(&self, other: &Matrix) -> Result<Matrix, MatrixError> {
        self.zip_with(other, "add", |a, b| a + b)
    }

    pub fn subtract(&self, other: &Matrix) -> Result<Matrix, MatrixError> {
        self.zip_with(other, "subtract", |a, b| a - b)
    }

    /// Matrix product: `self` is `m x k`, `other` is `k x n`, result is `m x n`.
    pub fn dot(&self, other: &Matrix) -> Result<Matrix, MatrixError> {
        if self.cols != other.rows {
            return Err(MatrixError::IncompatibleShapes(format!(
                "Incompatible shapes for dot: A has shape [{}, {}], B has shape [{}, {}]",
                self.rows, self.cols, other.rows, other.cols
            )));
        }
        let n = other.cols;
        let mut data = reserve(self.rows, n)?;
        for i in 0..self.rows {
            let a_row = &self.data[i * self.cols..(i + 1) * self.cols];
            for j in 0..n {
                let mut sum = 0.0;
                for (k, &a) in a_row.iter().enumerate() {
                    sum += a * other.data[k * n + j];
                }
                data.push(sum);
            }
        }
        Ok(Matrix { rows: self.rows, cols: n, data })
    }

    /// Same product as [`Matrix::dot`].
    pub fn multiply(&self, other: &Matrix) -> Result<Matrix, MatrixError> {
        self.dot(other)
    }

    pub fn apply<F: Fn(f64) -> f64>(&self, f: F) -> Result<Matrix, MatrixError> {
        self.map(f)
    }

    pub fn scale(&self, n: f64) -> Result<Matrix, MatrixError> {
        self.map(|v| v * n)
    }

    pub fn add_scalar(&self, n: f64) -> Result<Matrix, MatrixError> {
        self.map(|v| v + n)
    }

    pub fn transpose(&self) -> Result<Matrix, MatrixError> {
        let mut data = reserve(self.cols, self.rows)?;
        for j in 0..self.cols {
            for i in 0..self.rows {
                data.push(self.data[i * self.cols + j]);
            }
        }
        Ok(Matrix { rows: self.cols, cols: self.rows, data })
    }

    /// Row index of the largest entry of a column vector.
    ///
    /// The running best starts at `0.0` and is only replaced by a strictly
    /// greater entry, so ties keep the lowest index and a vector with no
    /// positive entry yields `0`.
    pub fn argmax(&self) -> Result<usize, MatrixError> {
        if self.cols != 1 || self.rows == 0 {
            return Err(MatrixError::InvalidDimension(format!(
                "argmax expects a non-empty column vector, got {}x{}",
                self.rows, self.cols
            )));
        }
        let mut max_score = 0.0;
        let mut max_idx = 0;
        for (i, &v) in self.data.iter().enumerate() {
            if v > max_score {
                max_score = v;
                max_idx = i;
            }
        }
        Ok(max_idx)
    }

    pub fn mean_square_error(output: &Matrix, target: &Matrix) -> Result<f64, MatrixError> {
        if !output.same_shape(target) {
            return Err(MatrixError::ShapeMismatch(format!(
                "mean_square_error: {}x{} and {}x{}",
                output.rows, output.cols, target.rows, target.cols
            )));
        }
        if output.data.is_empty() {
            return Err(MatrixError::InvalidDimension(
                "mean_square_error of an empty matrix".to_string(),
            ));
        }
        let sum: f64 = output
            .data
            .iter()
            .zip(target.data.iter())
            .map(|(&o, &t)| (o - t).powi(2))
            .sum();
        Ok(sum / output.data.len() as f64)
    }

    pub fn row(&self, row_index: usize) -> Result<Matrix, MatrixError> {
        if row_index >= self.rows {
            return Err(MatrixError::OutOfBounds(format!(
                "Row {} out of bounds for {}x{} matrix",
                row_index, self.rows, self.cols
            )));
        }
        let start = row_index * self.cols;
        let mut data = reserve(1, self.cols)?;
        data.extend_from_slice(&self.data[start..start + self.cols]);
        Ok(Matrix { rows: 1, cols: self.cols, data })
    }

    pub fn sum_elements(&self) -> f64 {
        self.data.iter().sum()
    }

    /// Writes `rows`, `cols` and then every entry (row-major, 6 decimals),
    /// one value per line.
    pub fn save<W: Write + ?Sized>(&self, writer: &mut W) -> Result<(), MatrixError> {
        writeln!(writer, "{}", self.rows)?;
        writeln!(writer, "{}", self.cols)?;
        for v in &self.data {
            writeln!(writer, "{:.6}", v)?;
        }
        log::debug!("Saved {}x{} matrix", self.rows, self.cols);
        Ok(())
    }

    pub fn load<R: BufRead + ?Sized>(reader: &mut R) -> Result<Matrix, MatrixError> {
        let mut line = String::new();
        let rows: usize = parse_line(reader, &mut line, "row count")?;
        let cols: usize = parse_line(reader, &mut line, "column count")?;

        let mut data = reserve(rows, cols)?;
        for idx in 0..rows * cols {
            let value: f64 = parse_line(reader, &mut line, "entry").map_err(|e| match e {
                MatrixError::Truncated(_) => MatrixError::Truncated(format!(
                    "expected {} entries for {}x{} matrix, found {}",
                    rows * cols,
                    rows,
                    cols,
                    idx
                )),
                other => other,
            })?;
            data.push(value);
        }
        log::debug!("Loaded {}x{} matrix", rows, cols);
        Ok(Matrix { rows, cols, data })
    }
}

fn parse_line<R, T>(reader: &mut R, line: &mut String, what: &str) -> Result<T, MatrixError>
where
    R: BufRead + ?Sized,
    T: std::str::FromStr,
    T::Err: fmt::Display,
{
    line.clear();
    if reader.read_line(line)? == 0 {
        return Err(MatrixError::Truncated(format!("missing {}", what)));
    }
    let text = line.trim();
    text.parse::<T>()
        .map_err(|e| MatrixError::Parse(format!("bad {} '{}': {}", what, text, e)))
}

impl fmt::Display for Matrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Rows: {} Columns: {}", self.rows, self.cols)?;
        for i in 0..self.rows {
            for v in &self.data[i * self.cols..(i + 1) * self.cols] {
                write!(f, "{:.3} ", v)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
