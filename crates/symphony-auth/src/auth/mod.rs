//! Authorization handshake and its results.
//!
//! [`AuthorizationClient`] runs the two authenticate calls and keeps the
//! resulting [`CredentialBundle`].

mod bundle;
mod client;
mod token;

pub use bundle::{AuthState, CredentialBundle};
pub use client::AuthorizationClient;
pub use token::Token;
