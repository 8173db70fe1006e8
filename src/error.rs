//! Crate-level error type and `Result` alias for stable, structured error handling.
//! Every public engine operation converts underlying I/O and GDAL failures into
//! one of these semantic variants at its own boundary; callers never see an
//! opaque library error.
use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("source not found: {}", path.display())]
    SourceNotFound { path: PathBuf },

    #[error("unsupported format: {}", path.display())]
    UnsupportedFormat { path: PathBuf },

    #[error("invalid parameter: {param}={value}")]
    InvalidParameter { param: &'static str, value: String },

    #[error("geometry mismatch: {0}")]
    GeometryMismatch(String),

    #[error("processing failed: {0}")]
    Processing(String),

    #[error("failed to write {}: {detail}", path.display())]
    Persistence { path: PathBuf, detail: String },
}

impl Error {
    pub fn processing<E: std::fmt::Display>(e: E) -> Self {
        Error::Processing(e.to_string())
    }

    pub fn persistence<E: std::fmt::Display>(path: &std::path::Path, e: E) -> Self {
        Error::Persistence {
            path: path.to_path_buf(),
            detail: e.to_string(),
        }
    }
}
