//! Error types for clientprint-core.
//!
//! Only the digest engine and configuration validation can fail. Missing host
//! capabilities are never errors: probes report them as typed sentinel values
//! inside the record.

use thiserror::Error;

/// Result alias used across the core crate.
pub type ClientprintResult<T> = Result<T, ClientprintError>;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ClientprintError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("serialization failed: {0}")]
    Serialization(String),

    /// The requested hash primitive is not available in this build.
    #[error("hash algorithm unavailable: {algorithm}")]
    HashUnavailable { algorithm: String },

    #[error("invariant violated: {0}")]
    Invariant(String),
}

impl ClientprintError {
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    pub fn serialization(msg: impl Into<String>) -> Self {
        Self::Serialization(msg.into())
    }

    pub fn hash_unavailable(algorithm: impl Into<String>) -> Self {
        Self::HashUnavailable {
            algorithm: algorithm.into(),
        }
    }

    pub fn invariant(msg: impl Into<String>) -> Self {
        Self::Invariant(msg.into())
    }

    /// True for failures the caller cannot recover from by retrying with the
    /// same configuration.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::HashUnavailable { .. } | Self::Invariant(_))
    }
}

impl From<serde_json::Error> for ClientprintError {
    fn from(e: serde_json::Error) -> Self {
        Self::serialization(e.to_string())
    }
}
