use anyhow::Result;
use serde::Serialize;

use clientprint_core::config::CoreConfig;
use clientprint_core::model::{AudioSignal, Category, SignalRecord};
use clientprint_core::{digest_with, Digest};
use clientprint_probes::{Collector, HostProbes};

use crate::args::HostArgs;
use crate::io::input;
use crate::output;

#[derive(Debug, Serialize)]
pub struct CollectOut {
    pub record: SignalRecord,
    pub algorithm: &'static str,
    pub digest: Digest,
}

pub async fn run(host_args: &HostArgs, config: CoreConfig) -> Result<()> {
    let host = input::load_host(host_args.host.as_deref())?;
    let collector = Collector::with_config(HostProbes::new(host), config)?;

    let pb = output::spinner("rendering audio and collecting signals");
    let record = collector.collect().await;
    pb.finish_and_clear();

    let hashing = &collector.config().hashing;
    let digest = digest_with(&record, hashing)?;

    if output::is_json() {
        return output::print(&CollectOut {
            record,
            algorithm: hashing.algorithm.as_str(),
            digest,
        });
    }

    for category in Category::ALL {
        output::heading(category.key())?;
        let value = record.category_value(category)?;
        println!("{}", serde_json::to_string_pretty(&value)?);
    }
    if record.audio == AudioSignal::TimedOut {
        output::eprintln_line("note: the audio render did not complete in time");
    }
    println!();
    output::field(hashing.algorithm.as_str(), digest.as_str())?;
    Ok(())
}
