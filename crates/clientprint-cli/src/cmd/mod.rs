use std::time::Duration;

use anyhow::Result;

use clientprint_core::config::{validate_config, CollectionConfig, CoreConfig, HashingConfig};

use crate::args::{Cli, Command, HostArgs};

mod collect;
mod digest;
mod doctor;
mod generate;
mod probes;

pub async fn dispatch(cli: Cli) -> Result<()> {
    let hashing = HashingConfig {
        algorithm: cli.hash.into(),
    };
    match cli.command {
        Command::Collect { host } => collect::run(&host, core_config(hashing, &host)?).await,
        Command::Generate { host } => generate::run(&host, core_config(hashing, &host)?).await,
        Command::Digest { record } => digest::run(&record, &hashing).await,
        Command::Probes { host } => probes::run(host.as_deref()).await,
        Command::Doctor => doctor::run().await,
    }
}

fn core_config(hashing: HashingConfig, host: &HostArgs) -> Result<CoreConfig> {
    let config = CoreConfig {
        hashing,
        collection: CollectionConfig {
            audio_timeout: host.audio_timeout_ms.map(Duration::from_millis),
        },
    };
    validate_config(&config)?;
    Ok(config)
}
