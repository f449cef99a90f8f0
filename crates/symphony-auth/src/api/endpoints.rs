//! Wire types of the authentication endpoints.

use serde::Deserialize;

/// Error body returned by the authentication services.
///
/// Only some deployments send one; a missing or non-JSON body is tolerated.
#[derive(Debug, Deserialize)]
pub struct ErrorResponse {
    #[serde(default)]
    pub code: Option<i64>,
    #[serde(default)]
    pub message: Option<String>,
}

impl ErrorResponse {
    /// Collapse code and message into a single diagnostic string.
    pub fn into_message(self) -> Option<String> {
        match (self.code, self.message) {
            (Some(code), Some(message)) => Some(format!("{} (code {})", message, code)),
            (None, Some(message)) => Some(message),
            (Some(code), None) => Some(format!("code {}", code)),
            (None, None) => None,
        }
    }
}
