//! clientprint-core
//!
//! Core primitives for clientprint:
//! - `SignalRecord` and the seven per-category signal models
//! - Canonical JSON encoding (declaration order, canonical numbers)
//! - Digest engine (sha256 by default) rendering 64-char lowercase hex
//! - Explicit configuration and error types
//!
//! This crate performs no host queries and no I/O. Probing lives in
//! `clientprint-probes`.

pub mod config;
pub mod determinism;
pub mod errors;
pub mod model;

pub use crate::determinism::hashing::{digest, digest_with, Digest};
pub use crate::errors::{ClientprintError, ClientprintResult};

/// Convenience re-exports.
pub mod prelude {
    pub use crate::config::{CollectionConfig, CoreConfig, HashAlgorithm, HashingConfig};
    pub use crate::determinism::canonical_json::{format_number, to_canonical_bytes};
    pub use crate::determinism::hashing::{digest, digest_with, Digest};
    pub use crate::model::{
        AudioFingerprint, AudioSignal, CanvasSignal, Category, CompressorParams, FontSignal,
        NetworkSignal, ParamValue, PluginSignal, SignalRecord, UserAgentSignal, WebGlInfo,
        WebGlParams, WebGlSignal,
    };
    pub use crate::{ClientprintError, ClientprintResult};
}
