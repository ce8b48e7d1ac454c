// error.rs

use thiserror::Error;

#[derive(Error, Debug)]
pub enum HistError {
    #[error("Invalid shape: {bins} bins over [{low}, {high}] is not a valid axis")]
    InvalidShape { bins: u32, low: f64, high: f64 },

    #[error("Invalid fill on '{name}': position {pos}, weight {weight} (both must be finite)")]
    InvalidInput { name: String, pos: f64, weight: f64 },

    #[error("Incompatible merge candidate '{candidate}': {reason}")]
    IncompatibleMerge { candidate: String, reason: String },

    #[error("No foreign storage kind for scalar type {0}")]
    UnsupportedExportType(&'static str),

    #[error("File already exists: {0}")]
    AlreadyExists(String),

    #[error("IO error: {0}")]
    IOError(#[from] std::io::Error),

    #[error("Bincode error: {0}")]
    BincodeError(String),

    #[error("{0}")]
    StringError(String),
}

// Add a convenience implementation for &str errors
impl From<&str> for HistError {
    fn from(error: &str) -> Self {
        HistError::StringError(error.to_string())
    }
}

impl From<Box<bincode::ErrorKind>> for HistError {
    fn from(error: Box<bincode::ErrorKind>) -> Self {
        HistError::BincodeError(error.to_string())
    }
}
