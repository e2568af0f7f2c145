//! Error types for schema definition and document assembly.

use thiserror::Error;

/// Raised by a record when an association accessor is missing or fails.
///
/// Records build these themselves; the assembler forwards them untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AccessorError {
    /// The record has no association under this key.
    #[error("record has no association `{0}`")]
    Missing(String),

    /// The association exists but could not be loaded.
    #[error("failed to load association `{key}`: {reason}")]
    Failed { key: String, reason: String },
}

impl AccessorError {
    pub fn missing(key: impl Into<String>) -> Self {
        Self::Missing(key.into())
    }

    pub fn failed(key: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Failed {
            key: key.into(),
            reason: reason.into(),
        }
    }
}

/// Errors raised while defining schemas or assembling documents.
#[derive(Debug, Error)]
pub enum DocumentError {
    /// A schema may declare only one primary resource.
    #[error("primary resource `{existing}` already declared; cannot declare `{attempted}`")]
    DuplicateResource { existing: String, attempted: String },

    /// No serializer is registered for a resource key.
    #[error("no serializer registered for `{0}`")]
    UnresolvedSerializer(String),

    /// Assembly was attempted on a schema without a primary resource.
    #[error("schema declares no primary resource")]
    MissingResource,

    /// A typed serializer was bound to a record of another type.
    #[error("serializer `{serializer}` cannot serialize a `{found}` record")]
    SubjectMismatch { serializer: String, found: String },

    /// A metadata resolver failed.
    #[error("metadata `{key}` failed: {reason}")]
    Metadata { key: String, reason: String },

    /// A record accessor failed.
    #[error(transparent)]
    Accessor(#[from] AccessorError),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl DocumentError {
    /// Failure reported by a metadata resolver.
    pub fn metadata(key: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Metadata {
            key: key.into(),
            reason: reason.into(),
        }
    }
}

/// Result type for serializer operations.
pub type Result<T> = std::result::Result<T, DocumentError>;
