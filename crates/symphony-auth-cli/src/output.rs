//! Terminal output for the subcommands.
//!
//! Results go to stdout so they can be piped; failures go to stderr.

use anyhow::Result;
use colored::Colorize;
use serde::Serialize;
use symphony_auth::Token;

pub fn success(msg: &str) {
    println!("{} {}", "✓".green(), msg);
}

/// Print a labeled field.
pub fn field(label: &str, value: &str) {
    println!("{}: {}", label.dimmed(), value);
}

/// Print a granted token as its name followed by its value.
pub fn token(label: &str, token: &Token) {
    println!("{} {} {}", format!("{label}:").dimmed(), token.name().bold(), token.token());
}

pub fn json_pretty<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Print an error and each of its causes, outermost first.
pub fn failure(err: &anyhow::Error) {
    eprintln!("{} {}", "✗".red(), err.to_string().red());
    for cause in err.chain().skip(1) {
        eprintln!("  {} {}", "caused by:".dimmed(), cause);
    }
}
