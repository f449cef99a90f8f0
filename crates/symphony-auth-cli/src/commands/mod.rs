//! Subcommand implementations.

pub mod authenticate;
pub mod show_config;

use anyhow::{Context, Result};
use clap::Args;
use tracing::debug;

use symphony_auth::tls::{self, TlsConfig};
use symphony_auth::AuthorizationClient;

/// Endpoint and TLS options shared by all subcommands.
#[derive(Args, Debug)]
pub struct EndpointArgs {
    /// Session authentication base URL
    #[arg(long, env = "SYMPHONY_SESSION_URL")]
    pub session_url: Option<String>,

    /// Key manager authentication base URL
    #[arg(long, env = "SYMPHONY_KEY_URL")]
    pub key_url: Option<String>,

    /// Server trust store (PEM bundle or DER certificate)
    #[arg(long, env = "SYMPHONY_TRUSTSTORE")]
    pub truststore: Option<String>,

    /// Trust store password
    #[arg(long, env = "SYMPHONY_TRUSTSTORE_PASSWORD", hide_env_values = true)]
    pub truststore_password: Option<String>,

    /// Client key store holding certificate and private key
    #[arg(long, env = "SYMPHONY_KEYSTORE")]
    pub keystore: Option<String>,

    /// Key store password
    #[arg(long, env = "SYMPHONY_KEYSTORE_PASSWORD", hide_env_values = true)]
    pub keystore_password: Option<String>,

    /// Key store format: pkcs12 or pem
    #[arg(long, env = "SYMPHONY_KEYSTORE_TYPE")]
    pub keystore_type: Option<String>,
}

impl EndpointArgs {
    /// Resolve the TLS options into a configuration, if any store is set.
    pub fn tls_config(&self) -> Result<Option<TlsConfig>> {
        TlsConfig::from_lookup(|key| match key {
            tls::ENV_TRUSTSTORE => self.truststore.clone(),
            tls::ENV_TRUSTSTORE_PASSWORD => self.truststore_password.clone(),
            tls::ENV_KEYSTORE => self.keystore.clone(),
            tls::ENV_KEYSTORE_PASSWORD => self.keystore_password.clone(),
            tls::ENV_KEYSTORE_TYPE => self.keystore_type.clone(),
            _ => None,
        })
        .context("Invalid TLS configuration")
    }

    /// Build an authorization client from the options.
    ///
    /// Missing URLs are passed through as empty strings so the library
    /// reports them.
    pub fn client(&self) -> Result<AuthorizationClient> {
        let mut client = AuthorizationClient::new(
            self.session_url.clone().unwrap_or_default(),
            self.key_url.clone().unwrap_or_default(),
        );

        match self.tls_config()? {
            Some(config) => {
                debug!(
                    session_url = client.session_url(),
                    key_url = client.key_url(),
                    trust_store = ?config.trust_store(),
                    key_store = ?config.key_store(),
                    key_store_type = %config.key_store_type(),
                    "Using TLS material from the command line"
                );
                client.set_tls_config(config);
            }
            None => debug!(
                session_url = client.session_url(),
                key_url = client.key_url(),
                "No TLS material given"
            ),
        }

        Ok(client)
    }
}
