//! Authenticate command implementation.

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use serde::Serialize;

use symphony_auth::Token;

use super::EndpointArgs;
use crate::output;

#[derive(Args, Debug)]
pub struct AuthenticateArgs {
    #[command(flatten)]
    pub endpoints: EndpointArgs,

    /// Print the tokens as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct TokenOutput<'a> {
    session_token: &'a Token,
    key_token: &'a Token,
}

pub async fn run(args: AuthenticateArgs) -> Result<()> {
    let mut client = args.endpoints.client()?;

    eprintln!("{}", "Authenticating...".dimmed());

    client
        .authenticate()
        .await
        .context("Failed to authenticate")?;

    let session_token = client.session_token()?;
    let key_token = client.key_token()?;

    if args.json {
        return output::json_pretty(&TokenOutput {
            session_token,
            key_token,
        });
    }

    output::success("Authenticated successfully");
    println!();
    output::token("Session", session_token);
    output::token("Key manager", key_token);

    Ok(())
}
