//! # ERPGate Domain
//!
//! Business domain types and models for ERPGate.
//!
//! This crate contains:
//! - Order payloads and their sanitization rules
//! - Session and upstream credential types
//! - Read models for the project/cell/product hierarchy
//! - Domain error types and Result definitions
//! - Configuration structures
//!
//! ## Architecture
//! - No dependencies on other ERPGate crates
//! - Only external dependencies allowed
//! - Pure domain models and data structures

pub mod config;
pub mod constants;
pub mod errors;
pub mod macros;
pub mod types;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use types::*;
