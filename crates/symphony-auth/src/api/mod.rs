//! Authentication endpoint client.
//!
//! This module provides the HTTP call shared by the session and key manager
//! authentication services.

mod client;
mod endpoints;

pub(crate) use client::AuthenticationApi;
