//! Error types for the symphony-auth library.
//!
//! Every failure of the authentication handshake surfaces as a single
//! [`AuthorizationError`]. Its [`AuthorizationErrorKind`] lets callers tell
//! configuration problems apart from endpoint failures when they need to.

use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// The unified error type for symphony-auth operations.
#[derive(Debug, Error)]
pub enum Error {
    /// The authentication handshake failed.
    #[error(transparent)]
    Authorization(#[from] AuthorizationError),

    /// A token was accessed before a successful `authenticate()`.
    #[error("not authenticated: call authenticate() first")]
    NotAuthenticated,

    /// Input validation errors (malformed service URL).
    #[error("invalid input: {0}")]
    InvalidInput(#[from] InvalidInputError),
}

/// Broad category of an authorization failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthorizationErrorKind {
    /// The session URL or key manager URL is not set.
    MissingConfiguration,
    /// A service URL is set but is not usable.
    InvalidUrl,
    /// Trust store or key store could not be loaded.
    Tls,
    /// The request never got a response (connect, TLS handshake, timeout).
    Transport,
    /// The endpoint answered with an error or an unreadable body.
    Endpoint,
}

impl fmt::Display for AuthorizationErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AuthorizationErrorKind::MissingConfiguration => "missing configuration",
            AuthorizationErrorKind::InvalidUrl => "invalid URL",
            AuthorizationErrorKind::Tls => "TLS configuration",
            AuthorizationErrorKind::Transport => "transport",
            AuthorizationErrorKind::Endpoint => "endpoint",
        };
        f.write_str(s)
    }
}

/// Failure of `AuthorizationClient::authenticate()`.
///
/// The message names both service URLs and the trust/key store paths in
/// use. Passwords are never part of it.
#[derive(Debug)]
pub struct AuthorizationError {
    kind: AuthorizationErrorKind,
    session_url: String,
    key_url: String,
    trust_store: Option<PathBuf>,
    key_store: Option<PathBuf>,
    source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
}

impl AuthorizationError {
    pub(crate) fn new(
        kind: AuthorizationErrorKind,
        session_url: impl Into<String>,
        key_url: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            session_url: session_url.into(),
            key_url: key_url.into(),
            trust_store: None,
            key_store: None,
            source: None,
        }
    }

    pub(crate) fn with_stores(
        mut self,
        trust_store: Option<PathBuf>,
        key_store: Option<PathBuf>,
    ) -> Self {
        self.trust_store = trust_store;
        self.key_store = key_store;
        self
    }

    pub(crate) fn with_source(
        mut self,
        source: impl Into<Box<dyn std::error::Error + Send + Sync + 'static>>,
    ) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Returns the failure category.
    pub fn kind(&self) -> AuthorizationErrorKind {
        self.kind
    }

    /// Returns the session URL as configured.
    pub fn session_url(&self) -> &str {
        &self.session_url
    }

    /// Returns the key manager URL as configured.
    pub fn key_url(&self) -> &str {
        &self.key_url
    }

    /// Returns the server trust store path, if one was configured.
    pub fn trust_store(&self) -> Option<&Path> {
        self.trust_store.as_deref()
    }

    /// Returns the client key store path, if one was configured.
    pub fn key_store(&self) -> Option<&Path> {
        self.key_store.as_deref()
    }
}

impl fmt::Display for AuthorizationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn or_unset(s: &str) -> &str {
            if s.is_empty() { "<unset>" } else { s }
        }

        fn path_or_unset(p: Option<&Path>) -> String {
            p.map(|p| p.display().to_string())
                .unwrap_or_else(|| "<unset>".to_string())
        }

        write!(
            f,
            "authorization failed ({}): please check certificates, tokens and paths: \
             session URL: {}, key manager URL: {}, server truststore: {}, client keystore: {}",
            self.kind,
            or_unset(&self.session_url),
            or_unset(&self.key_url),
            path_or_unset(self.trust_store()),
            path_or_unset(self.key_store()),
        )
    }
}

impl std::error::Error for AuthorizationError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_deref()
            .map(|e| e as &(dyn std::error::Error + 'static))
    }
}

/// Failure of a single authenticate call.
#[derive(Debug, Error)]
pub enum EndpointError {
    /// No usable response was received.
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// The endpoint answered with an error status.
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),
}

impl From<reqwest::Error> for EndpointError {
    fn from(err: reqwest::Error) -> Self {
        EndpointError::Transport(TransportError::from(err))
    }
}

impl EndpointError {
    pub(crate) fn kind(&self) -> AuthorizationErrorKind {
        match self {
            EndpointError::Transport(TransportError::Decode { .. }) => {
                AuthorizationErrorKind::Endpoint
            }
            EndpointError::Transport(_) => AuthorizationErrorKind::Transport,
            EndpointError::Protocol(_) => AuthorizationErrorKind::Endpoint,
        }
    }
}

/// Transport-level errors.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Network connection failed.
    #[error("connection failed: {message}")]
    Connection { message: String },

    /// Request timed out.
    #[error("request timed out: {message}")]
    Timeout { message: String },

    /// Response body could not be decoded.
    #[error("invalid response body: {message}")]
    Decode { message: String },

    /// Generic HTTP error.
    #[error("HTTP error: {message}")]
    Http { message: String },
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            TransportError::Timeout {
                message: err.to_string(),
            }
        } else if err.is_connect() {
            TransportError::Connection {
                message: err.to_string(),
            }
        } else if err.is_decode() {
            TransportError::Decode {
                message: err.to_string(),
            }
        } else {
            TransportError::Http {
                message: err.to_string(),
            }
        }
    }
}

/// TLS material errors.
#[derive(Debug, Error)]
pub enum TlsError {
    /// A store file could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A store file was read but its contents were rejected.
    #[error("invalid TLS material in {}: {message}", path.display())]
    Invalid { path: PathBuf, message: String },

    /// Unknown key store type name.
    #[error("unknown key store type '{0}'")]
    UnknownKeyStoreType(String),

    /// The HTTP client could not be built from the TLS material.
    #[error("failed to build HTTP client: {message}")]
    Client { message: String },
}

/// Error responses from the authentication endpoint.
#[derive(Debug)]
pub struct ProtocolError {
    /// HTTP status code.
    pub status: u16,
    /// Error message from the server (if present).
    pub message: Option<String>,
}

impl fmt::Display for ProtocolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HTTP {}", self.status)?;
        if let Some(ref message) = self.message {
            write!(f, ": {}", message)?;
        }
        Ok(())
    }
}

impl std::error::Error for ProtocolError {}

impl ProtocolError {
    /// Create a new protocol error.
    pub fn new(status: u16, message: Option<String>) -> Self {
        Self { status, message }
    }

    /// Check if the endpoint rejected the client certificate.
    pub fn is_auth_error(&self) -> bool {
        self.status == 401 || self.status == 403
    }
}

/// Input validation errors.
#[derive(Debug, Error)]
pub enum InvalidInputError {
    /// Invalid service URL format.
    #[error("invalid service URL '{value}': {reason}")]
    ServiceUrl { value: String, reason: String },
}
