use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FmmError {
    #[error("IO Error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV Parsing Error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON Parsing Error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration Error: {0}")]
    Config(String),

    #[error("Parse Error: {0}")]
    Parse(String),

    #[error("Unsupported file format: {}", .0.display())]
    UnsupportedFormat(PathBuf),

    #[error("Shape Error: {0}")]
    Shape(String),
}

pub type FmmResult<T> = Result<T, FmmError>;
