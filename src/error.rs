use thiserror::Error;

/// Errors that can occur while fetching or decoding an image asset
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Image source unreachable: {src} ({reason})")]
    Unreachable { src: String, reason: String },

    #[error("Malformed data URL: {0}")]
    InvalidDataUrl(String),

    #[error("Failed to decode image {src}: {source}")]
    Decode {
        src: String,
        #[source]
        source: image::ImageError,
    },
}

/// Errors raised when a canvas snapshot cannot be read back
#[derive(Debug, Error)]
pub enum DeserializationError {
    #[error("Malformed snapshot: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("Duplicate object id in snapshot: {0}")]
    DuplicateId(String),
}

/// Top-level error for fallible editor operations
#[derive(Debug, Error)]
pub enum EditorError {
    #[error(transparent)]
    Load(#[from] LoadError),

    #[error(transparent)]
    Deserialization(#[from] DeserializationError),

    #[error("Failed to serialize canvas: {0}")]
    Serialization(serde_json::Error),

    #[error("Failed to encode canvas image: {0}")]
    Export(#[from] image::ImageError),
}

/// Result type for editor operations
pub type EditorResult<T> = Result<T, EditorError>;
