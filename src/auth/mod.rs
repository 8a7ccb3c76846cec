//! Authentication module
//!
//! The partner API authenticates every request with a pair of static header
//! values. `Credentials` holds the pair, `HeaderNames` the header names they
//! are sent under, and `Authenticator` stamps both onto outgoing requests.

mod authenticator;
mod types;

pub use authenticator::Authenticator;
pub use types::{Credentials, HeaderNames};

#[cfg(test)]
mod tests;
