//! Domain types and models

pub mod auth;
pub mod order;
pub mod project;
pub mod submission;

pub use auth::{token_prefix, SessionIdentity, UpstreamCredential};
pub use order::{CellOrder, ItemOrder, OrderPayload};
pub use project::{CellSummary, ProductLine, ProductStatistics, ProjectSummary};
pub use submission::{SubmissionOutcome, SubmissionResult};
