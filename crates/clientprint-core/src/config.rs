//! Configuration structures for clientprint-core.
//!
//! This module defines explicit configuration objects used by higher-level
//! components (probe collector, CLI) to control hashing and collection.
//!
//! The core crate itself does not read environment variables. All configuration
//! must be provided explicitly by the caller.

use std::time::Duration;

use crate::errors::{ClientprintError, ClientprintResult};

/// Global configuration container.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CoreConfig {
    pub hashing: HashingConfig,
    pub collection: CollectionConfig,
}

/// Hashing-related configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HashingConfig {
    pub algorithm: HashAlgorithm,
}

impl Default for HashingConfig {
    fn default() -> Self {
        Self {
            algorithm: HashAlgorithm::Sha256,
        }
    }
}

/// Collection-related configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CollectionConfig {
    /// Upper bound on the wait for the audio render-completion notification.
    ///
    /// `None` waits until the host fires the notification, however long that
    /// takes.
    pub audio_timeout: Option<Duration>,
}

/// Supported hash algorithms. Both produce 256-bit digests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HashAlgorithm {
    Sha256,
    Blake3,
}

impl HashAlgorithm {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sha256 => "sha256",
            Self::Blake3 => "blake3",
        }
    }

    pub fn parse(s: &str) -> ClientprintResult<Self> {
        match s {
            "sha256" => Ok(Self::Sha256),
            "blake3" => Ok(Self::Blake3),
            _ => Err(ClientprintError::invalid_argument(format!(
                "unsupported hash algorithm: {s}"
            ))),
        }
    }

    /// Whether the primitive was compiled into this build.
    pub fn is_available(&self) -> bool {
        match self {
            Self::Sha256 => cfg!(feature = "sha256"),
            Self::Blake3 => cfg!(feature = "blake3"),
        }
    }

    /// All algorithms, available or not, in a stable order.
    pub fn all() -> [HashAlgorithm; 2] {
        [Self::Sha256, Self::Blake3]
    }
}

/// Validate a full configuration object.
pub fn validate_config(cfg: &CoreConfig) -> ClientprintResult<()> {
    if !cfg.hashing.algorithm.is_available() {
        return Err(ClientprintError::hash_unavailable(
            cfg.hashing.algorithm.as_str(),
        ));
    }

    if let Some(t) = cfg.collection.audio_timeout {
        if t.is_zero() {
            return Err(ClientprintError::invalid_argument(
                "audio timeout must be greater than zero",
            ));
        }
    }

    Ok(())
}
