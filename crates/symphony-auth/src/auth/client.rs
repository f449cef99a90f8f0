//! Certificate-based authorization against the session and key manager
//! services.

use std::path::{Path, PathBuf};

use tracing::{debug, error, info, instrument};

use crate::api::AuthenticationApi;
use crate::error::{AuthorizationError, AuthorizationErrorKind, Error};
use crate::tls::TlsConfig;
use crate::types::ServiceUrl;

use super::bundle::CredentialBundle;
use super::token::Token;

/// Obtains a session token and a key manager token for a client
/// certificate.
///
/// The handshake is two `POST .../v1/authenticate` calls, first against the
/// session service and then against the key manager, both over the same
/// mutually authenticated TLS transport. The transport is either supplied by
/// the caller or built from the TLS material configured on this client
/// (falling back to the `SYMPHONY_*` environment variables).
///
/// # Example
///
/// ```no_run
/// use symphony_auth::AuthorizationClient;
///
/// # async fn example() -> Result<(), symphony_auth::Error> {
/// let mut client = AuthorizationClient::new(
///     "https://pod.example.com:8444/sessionauth",
///     "https://km.example.com:8444/keyauth",
/// );
/// client.set_keystores("/certs/truststore.pem", "changeit", "/certs/bot.p12", "secret");
///
/// let bundle = client.authenticate().await?;
/// println!("session token: {:?}", bundle.session_token());
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct AuthorizationClient {
    session_url: String,
    key_url: String,
    http_client: Option<reqwest::Client>,
    keystores: Option<TlsConfig>,
    bundle: Option<CredentialBundle>,
}

impl AuthorizationClient {
    /// Create a client that builds its own transport from TLS material.
    ///
    /// The URLs are not checked here; an empty or malformed URL makes
    /// [`authenticate()`](Self::authenticate) fail.
    pub fn new(session_url: impl Into<String>, key_url: impl Into<String>) -> Self {
        Self {
            session_url: session_url.into(),
            key_url: key_url.into(),
            http_client: None,
            keystores: None,
            bundle: None,
        }
    }

    /// Create a client that uses `http_client` for both calls.
    ///
    /// The caller is responsible for configuring the client certificate on
    /// `http_client`; keystores set on this client are ignored.
    pub fn with_http_client(
        session_url: impl Into<String>,
        key_url: impl Into<String>,
        http_client: reqwest::Client,
    ) -> Self {
        Self {
            http_client: Some(http_client),
            ..Self::new(session_url, key_url)
        }
    }

    /// Set the server trust store and the PKCS#12 client key store.
    ///
    /// The settings apply to this client only.
    pub fn set_keystores(
        &mut self,
        server_trust_store: impl Into<PathBuf>,
        trust_store_password: impl Into<String>,
        client_key_store: impl Into<PathBuf>,
        key_store_password: impl Into<String>,
    ) {
        self.keystores = Some(TlsConfig::new(
            server_trust_store,
            trust_store_password,
            client_key_store,
            key_store_password,
        ));
    }

    /// Replace the TLS material with a fully specified configuration.
    pub fn set_tls_config(&mut self, config: TlsConfig) {
        self.keystores = Some(config);
    }

    /// Returns the TLS material set on this client, if any.
    pub fn tls_config(&self) -> Option<&TlsConfig> {
        self.keystores.as_ref()
    }

    pub fn session_url(&self) -> &str {
        &self.session_url
    }

    pub fn key_url(&self) -> &str {
        &self.key_url
    }

    /// Run the handshake and return the resulting bundle.
    ///
    /// The bundle is also kept on the client, replacing the previous one.
    /// If either call fails the kept bundle is unauthenticated, even when the
    /// session token was granted.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Authorization`] when a URL is missing or invalid, the
    /// TLS material cannot be loaded, or either endpoint call fails.
    #[instrument(skip(self), fields(session_url = %self.session_url, key_url = %self.key_url))]
    pub async fn authenticate(&mut self) -> Result<CredentialBundle, Error> {
        info!("Authenticating");

        let mut bundle = CredentialBundle::new(&self.session_url, &self.key_url);
        let outcome = self.run(&mut bundle).await;

        match outcome {
            Ok((session_token, key_token)) => {
                bundle.complete(session_token, key_token);
                info!("Authorization succeeded");
                self.bundle = Some(bundle.clone());
                Ok(bundle)
            }
            Err(err) => {
                error!(error = %err, "Authorization failed");
                self.bundle = Some(bundle);
                Err(err.into())
            }
        }
    }

    /// Returns the session and key manager tokens. A session token granted
    /// before a failed key manager call is left on `bundle`.
    async fn run(
        &self,
        bundle: &mut CredentialBundle,
    ) -> Result<(Token, Token), AuthorizationError> {
        let tls = match self.http_client {
            Some(_) => Ok(None),
            None => self.resolve_tls(),
        };

        if self.session_url.is_empty() || self.key_url.is_empty() {
            let known = tls.as_ref().ok().and_then(Option::as_ref);
            return Err(self.failure(AuthorizationErrorKind::MissingConfiguration, known));
        }

        let tls = tls?;
        let session_url = self.parse_url(&self.session_url, tls.as_ref())?;
        let key_url = self.parse_url(&self.key_url, tls.as_ref())?;
        bundle.set_tls(tls.clone());

        let client = match &self.http_client {
            Some(client) => {
                bundle.set_http_client(client.clone());
                client.clone()
            }
            None => tls
                .clone()
                .unwrap_or_default()
                .build_client()
                .map_err(|e| {
                    self.failure(AuthorizationErrorKind::Tls, tls.as_ref())
                        .with_source(e)
                })?,
        };

        let api = AuthenticationApi::new(client);

        let session_token = api
            .authenticate(&session_url)
            .await
            .map_err(|e| self.failure(e.kind(), tls.as_ref()).with_source(e))?;
        debug!(name = session_token.name(), "Session token granted");
        bundle.set_session_token(session_token.clone());

        let key_token = api
            .authenticate(&key_url)
            .await
            .map_err(|e| self.failure(e.kind(), tls.as_ref()).with_source(e))?;
        debug!(name = key_token.name(), "Key manager token granted");

        Ok((session_token, key_token))
    }

    /// Keystores set on this client win over the environment.
    fn resolve_tls(&self) -> Result<Option<TlsConfig>, AuthorizationError> {
        if let Some(config) = &self.keystores {
            return Ok(Some(config.clone()));
        }

        TlsConfig::from_env()
            .map_err(|e| self.failure(AuthorizationErrorKind::Tls, None).with_source(e))
    }

    fn parse_url(
        &self,
        url: &str,
        tls: Option<&TlsConfig>,
    ) -> Result<ServiceUrl, AuthorizationError> {
        ServiceUrl::new(url)
            .map_err(|e| self.failure(AuthorizationErrorKind::InvalidUrl, tls).with_source(e))
    }

    fn failure(&self, kind: AuthorizationErrorKind, tls: Option<&TlsConfig>) -> AuthorizationError {
        let trust_store = tls.and_then(TlsConfig::trust_store).map(Path::to_path_buf);
        let key_store = tls.and_then(TlsConfig::key_store).map(Path::to_path_buf);

        AuthorizationError::new(kind, &self.session_url, &self.key_url)
            .with_stores(trust_store, key_store)
    }

    /// Returns true once an `authenticate()` call has succeeded and no later
    /// call has failed.
    pub fn is_logged_in(&self) -> bool {
        self.bundle
            .as_ref()
            .is_some_and(CredentialBundle::is_authenticated)
    }

    /// Returns the bundle of the latest attempt, authenticated or not.
    pub fn bundle(&self) -> Option<&CredentialBundle> {
        self.bundle.as_ref()
    }

    /// Returns the current session token.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotAuthenticated`] before a successful
    /// `authenticate()`.
    pub fn session_token(&self) -> Result<&Token, Error> {
        self.authenticated()?
            .session_token()
            .ok_or(Error::NotAuthenticated)
    }

    /// Replace the session token of the current bundle.
    pub fn set_session_token(&mut self, token: Token) -> Result<(), Error> {
        self.authenticated_mut()?.set_session_token(token);
        Ok(())
    }

    /// Returns the current key manager token.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotAuthenticated`] before a successful
    /// `authenticate()`.
    pub fn key_token(&self) -> Result<&Token, Error> {
        self.authenticated()?
            .key_token()
            .ok_or(Error::NotAuthenticated)
    }

    /// Replace the key manager token of the current bundle.
    pub fn set_key_token(&mut self, token: Token) -> Result<(), Error> {
        self.authenticated_mut()?.set_key_token(token);
        Ok(())
    }

    fn authenticated(&self) -> Result<&CredentialBundle, Error> {
        self.bundle
            .as_ref()
            .filter(|b| b.is_authenticated())
            .ok_or(Error::NotAuthenticated)
    }

    fn authenticated_mut(&mut self) -> Result<&mut CredentialBundle, Error> {
        self.bundle
            .as_mut()
            .filter(|b| b.is_authenticated())
            .ok_or(Error::NotAuthenticated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tls::{KeyStoreType, Secret};

    #[tokio::test]
    async fn empty_session_url_fails() {
        let mut client = AuthorizationClient::new("", "https://km.example.com/keyauth");
        let err = client.authenticate().await.unwrap_err();

        match err {
            Error::Authorization(e) => {
                assert_eq!(e.kind(), AuthorizationErrorKind::MissingConfiguration);
                assert_eq!(e.key_url(), "https://km.example.com/keyauth");
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(!client.is_logged_in());
    }

    #[tokio::test]
    async fn malformed_url_fails_as_invalid_url() {
        let mut client = AuthorizationClient::with_http_client(
            "not a url",
            "https://km.example.com/keyauth",
            reqwest::Client::new(),
        );
        let err = client.authenticate().await.unwrap_err();

        assert!(matches!(
            err,
            Error::Authorization(ref e) if e.kind() == AuthorizationErrorKind::InvalidUrl
        ));
        assert!(!client.is_logged_in());
    }

    #[test]
    fn tokens_unavailable_before_authenticate() {
        let client = AuthorizationClient::new("https://a.example.com", "https://b.example.com");
        assert!(matches!(client.session_token(), Err(Error::NotAuthenticated)));
        assert!(matches!(client.key_token(), Err(Error::NotAuthenticated)));
        assert!(client.bundle().is_none());
    }

    #[test]
    fn token_setters_fail_before_authenticate() {
        let mut client = AuthorizationClient::new("https://a.example.com", "https://b.example.com");
        let result = client.set_key_token(Token::new("keyManagerToken", "k"));
        assert!(matches!(result, Err(Error::NotAuthenticated)));
    }

    #[test]
    fn set_keystores_records_all_values() {
        let mut client = AuthorizationClient::new("https://a.example.com", "https://b.example.com");
        client.set_keystores("/a/trust.jks", "tpass", "/a/key.p12", "kpass");

        let tls = client.tls_config().unwrap();
        assert_eq!(tls.trust_store(), Some(Path::new("/a/trust.jks")));
        assert_eq!(tls.trust_store_password().map(Secret::expose), Some("tpass"));
        assert_eq!(tls.key_store(), Some(Path::new("/a/key.p12")));
        assert_eq!(tls.key_store_password().map(Secret::expose), Some("kpass"));
        assert_eq!(tls.key_store_type(), KeyStoreType::Pkcs12);
    }

    #[test]
    fn keystores_are_per_client() {
        let mut first = AuthorizationClient::new("https://a.example.com", "https://b.example.com");
        let second = AuthorizationClient::new("https://a.example.com", "https://b.example.com");
        first.set_keystores("/a/trust.jks", "tpass", "/a/key.p12", "kpass");

        assert!(first.tls_config().is_some());
        assert!(second.tls_config().is_none());
    }
}
