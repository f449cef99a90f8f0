//! Credential bundle produced by an authorization attempt.

use crate::tls::TlsConfig;

use super::token::Token;

/// Whether a bundle holds a complete set of tokens.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AuthState {
    /// The attempt has not finished, or it failed part way.
    #[default]
    Unauthenticated,
    /// Both the session token and the key token were granted.
    Authenticated,
}

/// Everything an authorization attempt produced.
///
/// Besides the two tokens the bundle keeps the endpoint URLs and the
/// transport settings it was obtained with, so the same handshake can be
/// repeated later.
///
/// A bundle only counts as valid when [`state()`](Self::state) is
/// [`AuthState::Authenticated`]. A failed attempt can leave the session
/// token set and the key token missing; such a bundle stays
/// unauthenticated.
#[derive(Debug, Clone)]
pub struct CredentialBundle {
    session_url: String,
    key_url: String,
    session_token: Option<Token>,
    key_token: Option<Token>,
    http_client: Option<reqwest::Client>,
    tls: Option<TlsConfig>,
    state: AuthState,
}

impl CredentialBundle {
    pub(crate) fn new(session_url: impl Into<String>, key_url: impl Into<String>) -> Self {
        Self {
            session_url: session_url.into(),
            key_url: key_url.into(),
            session_token: None,
            key_token: None,
            http_client: None,
            tls: None,
            state: AuthState::Unauthenticated,
        }
    }

    pub(crate) fn set_http_client(&mut self, client: reqwest::Client) {
        self.http_client = Some(client);
    }

    pub(crate) fn set_tls(&mut self, tls: Option<TlsConfig>) {
        self.tls = tls;
    }

    pub(crate) fn set_session_token(&mut self, token: Token) {
        self.session_token = Some(token);
    }

    pub(crate) fn set_key_token(&mut self, token: Token) {
        self.key_token = Some(token);
    }

    /// Store both granted tokens and mark the bundle authenticated.
    pub(crate) fn complete(&mut self, session_token: Token, key_token: Token) {
        self.session_token = Some(session_token);
        self.key_token = Some(key_token);
        self.state = AuthState::Authenticated;
    }

    /// Returns the session authentication URL.
    pub fn session_url(&self) -> &str {
        &self.session_url
    }

    /// Returns the key manager authentication URL.
    pub fn key_url(&self) -> &str {
        &self.key_url
    }

    /// Returns the session token, if it was granted.
    pub fn session_token(&self) -> Option<&Token> {
        self.session_token.as_ref()
    }

    /// Returns the key manager token, if it was granted.
    pub fn key_token(&self) -> Option<&Token> {
        self.key_token.as_ref()
    }

    /// Returns the caller-supplied HTTP client, if one was used.
    pub fn http_client(&self) -> Option<&reqwest::Client> {
        self.http_client.as_ref()
    }

    /// Returns the TLS material the transport was built from.
    ///
    /// `None` when an explicit HTTP client was used or no stores were
    /// configured.
    pub fn tls_config(&self) -> Option<&TlsConfig> {
        self.tls.as_ref()
    }

    pub fn state(&self) -> AuthState {
        self.state
    }

    pub fn is_authenticated(&self) -> bool {
        self.state == AuthState::Authenticated
    }
}
