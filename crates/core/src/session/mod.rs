//! Stateless session tokens
//!
//! A session token is a signed, time-limited JWT carrying the user name and
//! the upstream ERP access token. Nothing is stored server-side.

mod codec;

pub use codec::{SessionClaims, SessionTokenCodec};
