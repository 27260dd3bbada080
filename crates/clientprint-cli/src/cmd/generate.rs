use anyhow::Result;
use serde::Serialize;

use clientprint_core::config::CoreConfig;
use clientprint_core::Digest;
use clientprint_probes::{Collector, HostProbes};

use crate::args::HostArgs;
use crate::io::input;
use crate::output;

#[derive(Debug, Serialize)]
pub struct GenerateOut {
    pub algorithm: &'static str,
    pub digest: Digest,
}

pub async fn run(host_args: &HostArgs, config: CoreConfig) -> Result<()> {
    let host = input::load_host(host_args.host.as_deref())?;
    let algorithm = config.hashing.algorithm.as_str();
    let collector = Collector::with_config(HostProbes::new(host), config)?;

    let pb = output::spinner("generating fingerprint");
    let digest = collector.generate().await;
    pb.finish_and_clear();
    let digest = digest?;

    if output::is_json() {
        output::print(&GenerateOut { algorithm, digest })
    } else {
        println!("{digest}");
        Ok(())
    }
}
