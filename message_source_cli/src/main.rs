//! CLI entrypoint for `msgsource`.

use std::io::{self, Write};
use std::process::ExitCode;

use clap::Parser;
use message_source_cli::cli::Args;
use message_source_cli::commands;
use tracing_subscriber::EnvFilter;

const LOG_ENV: &str = "MSGSOURCE_LOG";

fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(args.verbose);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    match commands::run(&args, &mut out) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let mut stderr = io::stderr().lock();
            if writeln!(stderr, "msgsource: {err}").is_err() {
                tracing::error!(error = %err, "command failed");
            }
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbose: bool) {
    let fallback = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(fallback));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .compact()
        .init();
}
