//! CLI argument definitions.

use clap::{Parser, Subcommand};

use crate::commands::{authenticate::AuthenticateArgs, show_config::ShowConfigArgs};

/// Symphony certificate authentication tool.
#[derive(Parser, Debug)]
#[command(name = "symauth")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Output logs as JSON
    #[arg(long, global = true)]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Obtain a session token and a key manager token
    Authenticate(AuthenticateArgs),

    /// Print the resolved endpoints and TLS material (passwords hidden)
    ShowConfig(ShowConfigArgs),
}
