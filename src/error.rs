//! Error types for parameter validation and record export

use thiserror::Error;

#[derive(Debug, Error)]
pub enum MoldingError {
    #[error("{parameter} = {value} is outside the allowed range [{min}, {max}]")]
    InvalidInput {
        parameter: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("failed to write SQLite record: {0}")]
    Export(#[from] rusqlite::Error),

    #[error("failed to write export file: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, MoldingError>;
