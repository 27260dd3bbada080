//! Digest engine for clientprint.
//!
//! A digest is a pure function of a record's canonical bytes: the hash is
//! applied to exactly those bytes, with no prefix, salt or domain tag, and
//! rendered as 64 lowercase hex characters.
//!
//! Supported algorithms:
//! - sha256 (default, feature `sha256`)
//! - blake3 (feature `blake3`)
//!
//! Selecting an algorithm that is not compiled in is fatal; there is no fallback.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::{HashAlgorithm, HashingConfig};
use crate::determinism::canonical_json::to_canonical_bytes;
use crate::errors::{ClientprintError, ClientprintResult};
use crate::model::SignalRecord;

/// Length of a rendered digest in hex characters.
pub const DIGEST_HEX_LEN: usize = 64;

/// Hash raw bytes using the selected algorithm.
pub fn hash_bytes(alg: HashAlgorithm, bytes: &[u8]) -> ClientprintResult<Vec<u8>> {
    match alg {
        #[cfg(feature = "sha256")]
        HashAlgorithm::Sha256 => {
            use sha2::{Digest as _, Sha256};

            let mut h = Sha256::new();
            h.update(bytes);
            Ok(h.finalize().to_vec())
        }
        #[cfg(feature = "blake3")]
        HashAlgorithm::Blake3 => Ok(blake3::hash(bytes).as_bytes().to_vec()),
        #[allow(unreachable_patterns)]
        other => Err(ClientprintError::hash_unavailable(other.as_str())),
    }
}

/// Hash raw bytes and return lowercase hex string.
pub fn hash_bytes_hex(alg: HashAlgorithm, bytes: &[u8]) -> ClientprintResult<String> {
    Ok(hex::encode(hash_bytes(alg, bytes)?))
}

/// A 256-bit fingerprint digest as lowercase hex.
///
/// Consumers treat it as an opaque correlation token.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Digest(String);

impl Digest {
    /// Validate and wrap a hex digest string.
    pub fn parse(s: &str) -> ClientprintResult<Self> {
        if s.len() != DIGEST_HEX_LEN {
            return Err(ClientprintError::invalid_argument(format!(
                "digest must be {DIGEST_HEX_LEN} hex characters, got {}",
                s.len()
            )));
        }
        if !s.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f')) {
            return Err(ClientprintError::invalid_argument(
                "digest must be lowercase hex",
            ));
        }
        Ok(Self(s.to_string()))
    }

    fn from_hash(bytes: &[u8]) -> ClientprintResult<Self> {
        if bytes.len() * 2 != DIGEST_HEX_LEN {
            return Err(ClientprintError::invariant(format!(
                "hash output must be 32 bytes, got {}",
                bytes.len()
            )));
        }
        Ok(Self(hex::encode(bytes)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Digest {
    type Error = ClientprintError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Digest::parse(&s)
    }
}

impl From<Digest> for String {
    fn from(d: Digest) -> Self {
        d.0
    }
}

/// Digest a record with the default configuration (sha256).
pub fn digest(record: &SignalRecord) -> ClientprintResult<Digest> {
    digest_with(record, &HashingConfig::default())
}

/// Digest a record with an explicit hashing configuration.
pub fn digest_with(record: &SignalRecord, cfg: &HashingConfig) -> ClientprintResult<Digest> {
    let bytes = to_canonical_bytes(record)?;
    let d = Digest::from_hash(&hash_bytes(cfg.algorithm, &bytes)?)?;
    tracing::debug!(
        algorithm = cfg.algorithm.as_str(),
        canonical_len = bytes.len(),
        digest = %d,
        "record digested"
    );
    Ok(d)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sha256_known_vector() {
        let h = hash_bytes_hex(HashAlgorithm::Sha256, b"abc").unwrap();
        assert_eq!(
            h,
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn hash_bytes_stable() {
        let h1 = hash_bytes_hex(HashAlgorithm::Sha256, b"abc").unwrap();
        let h2 = hash_bytes_hex(HashAlgorithm::Sha256, b"abc").unwrap();
        assert_eq!(h1, h2);
    }

    #[test]
    fn digest_parse_rejects_bad_input() {
        assert!(Digest::parse("abc").is_err());
        assert!(Digest::parse(&"A".repeat(64)).is_err());
        assert!(Digest::parse(&"0f".repeat(32)).is_ok());
    }

    #[cfg(not(feature = "blake3"))]
    #[test]
    fn blake3_unavailable_is_fatal() {
        let e = hash_bytes(HashAlgorithm::Blake3, b"x").unwrap_err();
        assert!(matches!(e, ClientprintError::HashUnavailable { .. }));
    }

    #[cfg(feature = "blake3")]
    #[test]
    fn blake3_is_256_bit() {
        let h = hash_bytes_hex(HashAlgorithm::Blake3, b"x").unwrap();
        assert_eq!(h.len(), DIGEST_HEX_LEN);
    }
}
