use thiserror::Error;

/// Application-specific errors for the CLI
#[derive(Debug, Error)]
pub enum AppError {
    #[error("unsupported input file: {0}. Expected .tif, .tiff, .img or .shp")]
    UnsupportedInput(String),

    #[error(transparent)]
    Core(#[from] geostack::Error),
}
