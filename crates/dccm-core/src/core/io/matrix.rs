use nalgebra::DMatrix;
use std::io::{Read, Write};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MatrixIoError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Expected {expected} labels for a {expected}x{expected} matrix, got {found}")]
    LabelCount { expected: usize, found: usize },
    #[error("Matrix must be square, got {rows}x{cols}")]
    NotSquare { rows: usize, cols: usize },
    #[error("Invalid value '{value}' at row {row}, column {col}")]
    InvalidValue {
        row: usize,
        col: usize,
        value: String,
    },
    #[error("Row {row} has {found} values, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },
}

/// Writes a labelled square matrix as CSV.
///
/// The header row is an empty cell followed by the labels; each data row
/// starts with its label. Values are written with full round-trip precision.
pub fn write_matrix_csv<W: Write>(
    matrix: &DMatrix<f64>,
    labels: &[String],
    writer: W,
) -> Result<(), MatrixIoError> {
    if matrix.nrows() != matrix.ncols() {
        return Err(MatrixIoError::NotSquare {
            rows: matrix.nrows(),
            cols: matrix.ncols(),
        });
    }
    if labels.len() != matrix.nrows() {
        return Err(MatrixIoError::LabelCount {
            expected: matrix.nrows(),
            found: labels.len(),
        });
    }

    let mut csv_writer = csv::Writer::from_writer(writer);

    let mut header = Vec::with_capacity(labels.len() + 1);
    header.push(String::new());
    header.extend(labels.iter().cloned());
    csv_writer.write_record(&header)?;

    for (i, label) in labels.iter().enumerate() {
        let mut record = Vec::with_capacity(labels.len() + 1);
        record.push(label.clone());
        record.extend(matrix.row(i).iter().map(|v| v.to_string()));
        csv_writer.write_record(&record)?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Reads a matrix written by [`write_matrix_csv`], returning it with its labels.
pub fn read_matrix_csv<R: Read>(reader: R) -> Result<(DMatrix<f64>, Vec<String>), MatrixIoError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(reader);

    let labels: Vec<String> = csv_reader
        .headers()?
        .iter()
        .skip(1)
        .map(str::to_string)
        .collect();
    let n = labels.len();

    let mut values = Vec::with_capacity(n * n);
    let mut rows = 0;
    for (row, record) in csv_reader.records().enumerate() {
        let record = record?;
        let found = record.len().saturating_sub(1);
        if found != n {
            return Err(MatrixIoError::RaggedRow {
                row,
                expected: n,
                found,
            });
        }
        for (col, field) in record.iter().skip(1).enumerate() {
            let value = field.trim().parse::<f64>().map_err(|_| MatrixIoError::InvalidValue {
                row,
                col,
                value: field.to_string(),
            })?;
            values.push(value);
        }
        rows += 1;
    }
    if rows != n {
        return Err(MatrixIoError::NotSquare { rows, cols: n });
    }

    Ok((DMatrix::from_row_slice(n, n, &values), labels))
}
