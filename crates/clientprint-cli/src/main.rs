use std::process::ExitCode;

use clap::Parser;

use clientprint_core::ClientprintError;

mod args;
mod cmd;
mod io;
mod logging;
mod output;

/// Exit status for a failed command: 2 when the build or configuration can
/// never succeed as invoked, 1 otherwise.
fn exit_code(err: &anyhow::Error) -> u8 {
    let fatal = err
        .chain()
        .find_map(|cause| cause.downcast_ref::<ClientprintError>())
        .is_some_and(ClientprintError::is_fatal);
    if fatal {
        2
    } else {
        1
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = args::Cli::parse();
    output::init(cli.json);
    logging::init(cli.verbose, cli.log_json);

    match cmd::dispatch(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            output::eprintln_line(&format!("error: {e:#}"));
            ExitCode::from(exit_code(&e))
        }
    }
}
