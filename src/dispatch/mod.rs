//! Provider Dispatch
//!
//! Routes a generation request to the gateway path of its model, attaches the
//! provider's authentication header and normalizes the outcome. Callers get a
//! typed result; deciding how to surface failures is left to them.

pub mod client;
pub mod endpoint;
pub mod error;

pub use client::Dispatcher;
pub use endpoint::{endpoint_path, resolve_auth, resolve_endpoint};
pub use error::{classify_message, DispatchError};
