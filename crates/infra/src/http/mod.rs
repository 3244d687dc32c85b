//! Outbound HTTP plumbing shared by the ERP adapters

pub mod client;

pub use client::{HttpClient, HttpClientBuilder, HttpFailure};
