use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand, ValueEnum};

use clientprint_core::config::HashAlgorithm;

#[derive(Parser, Debug, Clone)]
#[command(name = "clientprint", version, about = "Client environment fingerprinting")]
pub struct Cli {
    /// Emit JSON output on stdout.
    #[arg(long, global = true)]
    pub json: bool,

    /// Emit logs as JSON lines on stderr.
    #[arg(long, global = true)]
    pub log_json: bool,

    /// Raise log verbosity (-v info, -vv debug). RUST_LOG overrides.
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Digest algorithm.
    #[arg(long, global = true, value_enum, default_value_t = HashArg::Sha256)]
    pub hash: HashArg,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum HashArg {
    Sha256,
    Blake3,
}

impl From<HashArg> for HashAlgorithm {
    fn from(h: HashArg) -> Self {
        match h {
            HashArg::Sha256 => HashAlgorithm::Sha256,
            HashArg::Blake3 => HashAlgorithm::Blake3,
        }
    }
}

/// Host selection and collection options.
#[derive(clap::Args, Debug, Clone)]
pub struct HostArgs {
    /// Host profile JSON (default: bundled reference profile).
    #[arg(long)]
    pub host: Option<PathBuf>,

    /// Give up on the audio render after this many milliseconds.
    #[arg(long)]
    pub audio_timeout_ms: Option<u64>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Collect every signal and print the record followed by its digest.
    Collect {
        #[command(flatten)]
        host: HostArgs,
    },

    /// Collect and print only the digest.
    Generate {
        #[command(flatten)]
        host: HostArgs,
    },

    /// Digest a saved record JSON file.
    Digest {
        /// Path to a record JSON file.
        record: PathBuf,
    },

    /// List probes and, with a host, whether each runs fully or degrades.
    Probes {
        /// Host profile JSON to evaluate against.
        #[arg(long)]
        host: Option<PathBuf>,
    },

    /// Report build capabilities.
    Doctor,
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_generate_with_timeout() {
        let cli = Cli::try_parse_from([
            "clientprint",
            "--json",
            "generate",
            "--host",
            "p.json",
            "--audio-timeout-ms",
            "250",
        ])
        .unwrap();
        assert!(cli.json);
        assert_eq!(cli.hash, HashArg::Sha256);
        match cli.command {
            Command::Generate { host } => {
                assert_eq!(host.host, Some(PathBuf::from("p.json")));
                assert_eq!(host.audio_timeout_ms, Some(250));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn verbosity_counts() {
        let cli = Cli::try_parse_from(["clientprint", "-vv", "doctor"]).unwrap();
        assert_eq!(cli.verbose, 2);
    }
}
