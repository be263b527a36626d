//! Error types for the quicknote library
//!
//! Parsing, rendering and reducing never fail: malformed markup degrades into
//! literal text. Errors only arise from configuration and from the stores the
//! host application plugs in.

use thiserror::Error;

/// Configuration errors raised while compiling a [`crate::config::ConversionConfig`]
#[derive(Debug, Clone, PartialEq, Eq, Error, uniffi::Error)]
pub enum ConfigError {
    /// The video marker glyph is empty
    #[error("Video marker must not be empty")]
    EmptyVideoMarker,

    /// The note link URL scheme is empty
    #[error("Note link scheme must not be empty")]
    EmptyNoteScheme,

    /// A configured value contains characters reserved by the markup grammar
    #[error("Reserved character in {field}: {value:?}")]
    ReservedCharacter { field: String, value: String },

    /// A configured pattern failed to compile
    #[error("Invalid pattern: {0}")]
    InvalidPattern(String),
}

impl ConfigError {
    /// Create a reserved character error
    pub fn reserved_character(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self::ReservedCharacter {
            field: field.into(),
            value: value.into(),
        }
    }

    /// Create an invalid pattern error
    pub fn invalid_pattern(reason: impl Into<String>) -> Self {
        Self::InvalidPattern(reason.into())
    }
}

impl From<regex::Error> for ConfigError {
    fn from(err: regex::Error) -> Self {
        Self::invalid_pattern(err.to_string())
    }
}

/// Result type for configuration
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Errors from the document and attachment stores
#[derive(Debug, Clone, PartialEq, Eq, Error, uniffi::Error)]
pub enum StoreError {
    /// The given string is not a canonical note identifier
    #[error("Invalid note ID: {0}")]
    InvalidId(String),

    /// Note not found
    #[error("Note not found: {0}")]
    NotFound(String),

    /// A lock guarding shared state was poisoned by a panicking writer
    #[error("Store lock poisoned")]
    Poisoned,

    /// General store error
    #[error("Store error: {0}")]
    Other(String),
}

impl StoreError {
    /// Create an invalid ID error
    pub fn invalid_id(id: impl Into<String>) -> Self {
        Self::InvalidId(id.into())
    }

    /// Create a not found error
    pub fn not_found(id: impl Into<String>) -> Self {
        Self::NotFound(id.into())
    }

    /// Create a generic store error
    pub fn other(reason: impl Into<String>) -> Self {
        Self::Other(reason.into())
    }
}

impl<T> From<std::sync::PoisonError<T>> for StoreError {
    fn from(_: std::sync::PoisonError<T>) -> Self {
        Self::Poisoned
    }
}

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Main unified error type that can represent any quicknote error
#[derive(Debug, Clone, PartialEq, Eq, Error, uniffi::Error)]
pub enum NoteError {
    /// Configuration error
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Store error
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Result type for quicknote operations
pub type NoteResult<T> = Result<T, NoteError>;
