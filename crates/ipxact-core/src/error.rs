//! Error types for document model operations.

use std::path::PathBuf;

/// Errors that can occur while building or loading documents.
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    /// TOML deserialization error.
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// TOML serialization error.
    #[error("TOML serialization error: {0}")]
    TomlSer(#[from] toml::ser::Error),

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error reading document files.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Document file not found.
    #[error("document file not found: {}", path.display())]
    NotFound {
        /// The path that was not found.
        path: PathBuf,
    },

    /// File extension is neither `.toml` nor `.json`.
    #[error("unsupported document format: {}", path.display())]
    UnsupportedFormat {
        /// The offending path.
        path: PathBuf,
    },

    /// A VLNV string does not have four colon separated parts.
    #[error("invalid VLNV '{text}': expected vendor:library:name:version")]
    InvalidVlnv {
        /// The text that failed to parse.
        text: String,
    },

    /// Two documents in one library share a VLNV.
    #[error("duplicate document {vlnv}")]
    DuplicateDocument {
        /// The repeated identifier.
        vlnv: String,
    },
}

/// Result type for model operations.
pub type Result<T> = std::result::Result<T, ModelError>;
