//! symauth - CLI tool for Symphony certificate authentication.
//!
//! This is a thin wrapper over the `symphony-auth` library, intended for
//! checking certificates and endpoint configuration by hand. Tokens go to
//! stdout; progress, logs and errors go to stderr.

mod cli;
mod commands;
mod output;

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use cli::{Cli, Commands};
use commands::{authenticate, show_config};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    init_logging(cli.verbose, cli.json_logs);

    let result = match cli.command {
        Commands::Authenticate(args) => authenticate::run(args).await,
        Commands::ShowConfig(args) => show_config::run(args),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            output::failure(&err);
            ExitCode::FAILURE
        }
    }
}

/// Only this binary and the library log above `warn`; `-v` raises both
/// together. `RUST_LOG` overrides the whole filter.
fn init_logging(verbosity: u8, json: bool) {
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let directives = format!("warn,symauth={level},symphony_auth={level}");

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directives));
    let layer = fmt::layer().with_writer(std::io::stderr);

    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(layer.json().with_current_span(true))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(layer.with_target(verbosity > 2))
            .init();
    }
}
