//! Token type returned by the authentication endpoints.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A named token granted by an authentication endpoint.
///
/// Both the session endpoint and the key manager endpoint answer with the
/// same shape: `{"name": "sessionToken", "token": "..."}`.
///
/// # Security
///
/// - Never logged or displayed in Debug output
/// - Treat as opaque; do not parse or inspect
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    name: String,
    token: String,
}

impl Token {
    /// Create a new token.
    pub fn new(name: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            token: token.into(),
        }
    }

    /// Returns the token name, e.g. `sessionToken` or `keyManagerToken`.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the token value for use in request headers.
    ///
    /// # Security
    ///
    /// Use only when constructing API requests.
    pub fn token(&self) -> &str {
        &self.token
    }
}

// Hide token value in Debug output
impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Token")
            .field("name", &self.name)
            .field("token", &"[REDACTED]")
            .finish()
    }
}
