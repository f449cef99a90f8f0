//! Validated input types.

mod service_url;

pub use service_url::{AUTHENTICATE_SEGMENTS, ServiceUrl};
