use thiserror::Error;

#[derive(Debug, Error)]
pub enum AtlasError {
    #[error("Invalid image dimensions: {width}x{height} (both sides must be positive)")]
    InvalidDimensions { width: u32, height: u32 },
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("No power-of-two atlas can hold an image of {width}x{height}")]
    DimensionOverflow { width: u32, height: u32 },
}

pub type Result<T> = std::result::Result<T, AtlasError>;
