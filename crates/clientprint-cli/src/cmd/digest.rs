use std::path::Path;

use anyhow::Result;
use serde::Serialize;

use clientprint_core::config::HashingConfig;
use clientprint_core::{digest_with, Digest};

use crate::io::input;
use crate::output;

#[derive(Debug, Serialize)]
pub struct DigestOut {
    pub record: String,
    pub algorithm: &'static str,
    pub digest: Digest,
}

pub async fn run(record_path: &Path, hashing: &HashingConfig) -> Result<()> {
    let record = input::read_record(record_path)?;
    let digest = digest_with(&record, hashing)?;

    if output::is_json() {
        output::print(&DigestOut {
            record: record_path.display().to_string(),
            algorithm: hashing.algorithm.as_str(),
            digest,
        })
    } else {
        println!("{digest}");
        Ok(())
    }
}
