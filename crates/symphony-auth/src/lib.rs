//! symphony-auth - certificate authentication for Symphony services
//!
//! This library exchanges a TLS client certificate for the two tokens a
//! Symphony client needs: a session token from the session authentication
//! service and a key manager token from the key manager.
//!
//! # Example
//!
//! ```no_run
//! use symphony_auth::AuthorizationClient;
//!
//! # async fn example() -> Result<(), symphony_auth::Error> {
//! let mut client = AuthorizationClient::new(
//!     "https://pod.example.com:8444/sessionauth",
//!     "https://km.example.com:8444/keyauth",
//! );
//! client.set_keystores(
//!     "/certs/truststore.pem",
//!     "changeit",
//!     "/certs/bot.p12",
//!     "secret",
//! );
//!
//! let bundle = client.authenticate().await?;
//! assert!(client.is_logged_in());
//! println!("{}", client.session_token()?.name());
//! # let _ = bundle;
//! # Ok(())
//! # }
//! ```

mod api;
pub mod auth;
pub mod error;
pub mod tls;
pub mod types;

// Re-export primary types at crate root for convenience
pub use auth::{AuthState, AuthorizationClient, CredentialBundle, Token};
pub use error::{AuthorizationError, AuthorizationErrorKind, Error};
pub use tls::{KeyStoreType, Secret, TlsConfig};
pub use types::ServiceUrl;

/// Result type alias using the crate's Error type.
pub type Result<T> = std::result::Result<T, Error>;
