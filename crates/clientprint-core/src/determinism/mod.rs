//! Deterministic encoding and hashing.

pub mod canonical_json;
pub mod hashing;
