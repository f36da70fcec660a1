//! `stanza-file` binary: parses arguments, runs one edit, prints the JSON report

use std::io::Write;
use std::process::ExitCode;

use anyhow::Context;
use serde::Serialize;
use stanza_cli::{command, run, EditArgs, Failure};
use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter
const LOG_ENV: &str = "STANZA_LOG";

fn main() -> ExitCode {
    // stdout carries the JSON report only
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let matches = command().get_matches();

    let printed = match EditArgs::from_matches(&matches).and_then(|args| run(&args)) {
        Ok(report) => print_json(&report).map(|()| ExitCode::SUCCESS),
        Err(err) => {
            tracing::error!(error = %err, "edit failed");
            print_json(&Failure::from(&err)).map(|()| ExitCode::FAILURE)
        }
    };

    printed.unwrap_or_else(|err| {
        eprintln!("stanza-file: {err:#}");
        ExitCode::FAILURE
    })
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    let json = serde_json::to_string(value).context("failed to serialize report")?;
    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{json}").context("failed to write report")?;
    Ok(())
}
