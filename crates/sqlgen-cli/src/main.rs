//! sqlgen: compile directories of named-parameter SQL into Rust accessors.

mod config;

use std::io::IsTerminal;
use std::process::ExitCode;

use clap::Parser;
use owo_colors::{OwoColorize, Stream};
use sqlgen_qgen::{Error, Sink, collect, generate_rust_code};
use tracing::info;

use crate::config::Cli;

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Logs go to stderr (stdout may be the output sink)
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .with_env_filter(cli.env_filter())
        .init();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        // Already rendered as a full diagnostic report
        Err(err @ Error::Malformed(_)) => {
            eprint!("{err}");
            ExitCode::FAILURE
        }
        Err(err) => {
            let prefix = "error:".if_supports_color(Stream::Stderr, |text| text.red());
            eprintln!("{prefix} {err}");
            ExitCode::FAILURE
        }
    }
}

/// Compile every query, then write the result once. A failure at any step
/// leaves the output untouched.
fn run(cli: &Cli) -> Result<(), Error> {
    let options = cli.options()?;
    let catalog = collect(&cli.root, &options)?;
    let generated = generate_rust_code(&catalog, &options);

    let sink = Sink::from_args(&cli.out, &cli.perms)?;
    sink.write(&generated.code)?;

    info!(
        queries = catalog.len(),
        namespaces = catalog.groups.len(),
        out = %cli.out,
        "generated query accessors"
    );
    Ok(())
}
