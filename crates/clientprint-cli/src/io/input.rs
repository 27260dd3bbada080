//! File inputs: host profiles and saved records.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Result;

use clientprint_core::model::validate::record_from_value;
use clientprint_core::model::SignalRecord;
use clientprint_core::ClientprintError;
use clientprint_probes::{HostProfile, ProfileHost};

#[derive(Debug, thiserror::Error)]
pub enum InputError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid json in {}: {source}", path.display())]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("{} is not a signal record: {source}", path.display())]
    Record {
        path: PathBuf,
        source: ClientprintError,
    },
}

pub fn read_json_file(path: &Path) -> Result<serde_json::Value, InputError> {
    let raw = fs::read_to_string(path).map_err(|source| InputError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&raw).map_err(|source| InputError::Json {
        path: path.to_path_buf(),
        source,
    })
}

/// Load and validate a saved record.
pub fn read_record(path: &Path) -> Result<SignalRecord, InputError> {
    let value = read_json_file(path)?;
    record_from_value(value).map_err(|source| InputError::Record {
        path: path.to_path_buf(),
        source,
    })
}

/// Load a host profile, or the bundled reference profile when no path is given.
pub fn load_host(path: Option<&Path>) -> Result<ProfileHost> {
    let profile = match path {
        Some(p) => HostProfile::load(p)?,
        None => {
            tracing::debug!("no host profile given; using the bundled reference profile");
            HostProfile::reference()?
        }
    };
    Ok(ProfileHost::new(profile))
}
