//! Show-config command implementation.

use anyhow::Result;
use clap::Args;

use super::EndpointArgs;
use crate::output;

#[derive(Args, Debug)]
pub struct ShowConfigArgs {
    #[command(flatten)]
    pub endpoints: EndpointArgs,
}

pub fn run(args: ShowConfigArgs) -> Result<()> {
    let endpoints = &args.endpoints;

    output::field("Session URL", endpoints.session_url.as_deref().unwrap_or("<unset>"));
    output::field("Key manager URL", endpoints.key_url.as_deref().unwrap_or("<unset>"));

    let Some(tls) = endpoints.tls_config()? else {
        output::field("TLS", "no trust store or key store configured");
        return Ok(());
    };

    let path = |p: Option<&std::path::Path>| {
        p.map(|p| p.display().to_string())
            .unwrap_or_else(|| "<unset>".to_string())
    };
    let password = |set: bool| if set { "[REDACTED]" } else { "<unset>" };

    output::field("Server truststore", &path(tls.trust_store()));
    output::field("Truststore password", password(tls.trust_store_password().is_some()));
    output::field("Client keystore", &path(tls.key_store()));
    output::field("Keystore password", password(tls.key_store_password().is_some()));
    output::field("Keystore type", tls.key_store_type().as_str());

    Ok(())
}
