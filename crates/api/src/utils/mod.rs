//! Shared helpers for the HTTP layer

pub mod logging;
