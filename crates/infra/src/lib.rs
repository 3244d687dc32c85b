//! # ERPGate Infrastructure
//!
//! Infrastructure implementations of core domain ports.
//!
//! This crate contains:
//! - SQLite data access for the project hierarchy
//! - HTTP client plumbing
//! - ERP integrations (authentication handshake, order submission)
//! - Configuration loading from environment and files
//!
//! ## Architecture
//! - Implements traits defined in `erpgate-core`
//! - Contains all "impure" code (I/O, network)

pub mod config;
pub mod database;
pub mod errors;
pub mod http;
pub mod integrations;

// Re-export commonly used items
pub use database::SqliteProjectRepository;
pub use errors::InfraError;
pub use http::{HttpClient, HttpFailure};
pub use integrations::erp::{ErpAuthClient, ErpOrderClient};
