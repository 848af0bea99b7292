//! Tracktable command-line front end.

use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use tracktable::cli;

fn main() -> anyhow::Result<()> {
    let args = cli::Cli::parse();

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env().add_directive("tracktable=info".parse()?))
        .init();

    cli::run_command(&args)
}
