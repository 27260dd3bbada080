//! clientprint data models.
//!
//! This module defines the strongly-typed Rust representations of a collection
//! run: the `SignalRecord` and the seven per-category signal types.
//!
//! Design goals:
//! - **Closed shape:** every category has a fixed type; there is no open-ended map.
//! - **Explicit sentinels:** an absent capability is a value (`CanvasSignal::Unsupported`,
//!   `AudioSignal::Unsupported`, `WebGlSignal(None)`, empty lists), never a missing key.
//! - **Deterministic serialization:** field order is declaration order. The bytes used
//!   for hashing are produced by `crate::determinism::canonical_json`, not by default
//!   serde formatting.
//!
//! Models are "dumb" data. Probing and policy live in `clientprint-probes`.

pub mod record;
pub mod signals;

pub use record::{Category, SignalRecord};
pub use signals::{
    AudioFingerprint, AudioSignal, CanvasSignal, CompressorParams, FontSignal, NetworkSignal,
    ParamValue, PluginSignal, UserAgentSignal, WebGlInfo, WebGlParams, WebGlSignal,
    CANVAS_UNSUPPORTED,
};

/// Structural checks for records that arrive as untyped JSON (saved files, IPC).
pub mod validate {
    use serde_json::Value;

    use super::*;
    use crate::errors::{ClientprintError, ClientprintResult};

    /// Check that `value` is an object holding exactly the seven category keys
    /// in declared order, then decode it.
    pub fn record_from_value(value: Value) -> ClientprintResult<SignalRecord> {
        let obj = value
            .as_object()
            .ok_or_else(|| ClientprintError::invalid_argument("record must be a JSON object"))?;

        let keys: Vec<&str> = obj.keys().map(|k| k.as_str()).collect();
        if let Some(unknown) = keys.iter().find(|k| Category::from_key(k).is_none()) {
            return Err(ClientprintError::invalid_argument(format!(
                "unknown record category {unknown:?}"
            )));
        }
        let expected: Vec<&str> = Category::ALL.iter().map(|c| c.key()).collect();
        if keys != expected {
            return Err(ClientprintError::invalid_argument(format!(
                "record keys must be exactly {expected:?} in order, got {keys:?}"
            )));
        }

        Ok(serde_json::from_value(value)?)
    }
}
