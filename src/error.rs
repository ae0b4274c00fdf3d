use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CompressionError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Cannot decode image: {0}")]
    Decode(String),

    #[error("Image encoding error: {0}")]
    Encode(String),

    #[error("PNG optimization error: {0}")]
    PngOptimization(String),

    #[error("Archive error: {0}")]
    Archive(#[from] zip::result::ZipError),

    #[error("Unsupported parameter: {0}")]
    UnsupportedParameter(String),

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Failed to create output directory: {0}")]
    DirectoryCreationFailed(PathBuf),
}

impl From<image::ImageError> for CompressionError {
    fn from(err: image::ImageError) -> Self {
        match err {
            image::ImageError::IoError(e) => CompressionError::Io(e),
            image::ImageError::Encoding(e) => CompressionError::Encode(e.to_string()),
            other => CompressionError::Decode(other.to_string()),
        }
    }
}

impl From<tempfile::PersistError> for CompressionError {
    fn from(err: tempfile::PersistError) -> Self {
        CompressionError::Io(err.error)
    }
}

impl CompressionError {
    /// Whether this error belongs to the I/O family (storage read/write or archive).
    pub fn is_io(&self) -> bool {
        matches!(
            self,
            CompressionError::Io(_)
                | CompressionError::Archive(_)
                | CompressionError::FileNotFound(_)
                | CompressionError::DirectoryCreationFailed(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, CompressionError>;
