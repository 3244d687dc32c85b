//! # ERPGate API
//!
//! HTTP application layer - routes and main entry point.
//!
//! This crate contains:
//! - Axum routes (browser/frontend → backend bridge)
//! - Session extraction for protected endpoints
//! - Application context (dependency injection)
//!
//! ## Architecture
//! - Depends on `domain`, `core`, and `infra`
//! - Wires up the hexagonal architecture
//! - Middleware layers are attached by the binary, so tests drive the bare
//!   router

pub mod context;
pub mod error;
pub mod extractors;
pub mod routes;
pub mod utils;

pub use context::AppContext;
pub use error::ApiError;
pub use extractors::AuthenticatedUser;
pub use routes::build_router;
