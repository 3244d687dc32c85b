//! # ERPGate Core
//!
//! Pure business logic layer - no infrastructure dependencies.
//!
//! This crate contains:
//! - Port/adapter interfaces (traits) for the ERP and the project database
//! - The stateless session token codec
//! - Login, project query and requisition services
//!
//! ## Architecture Principles
//! - Only depends on `erpgate-domain`
//! - No database, HTTP, or platform code
//! - All external dependencies via traits
//! - Time is injected through [`Clock`] so expiry logic is testable

pub mod clock;
pub mod ports;
pub mod services;
pub mod session;

pub use clock::{Clock, MockClock, SystemClock};
pub use ports::{OrderSubmitter, ProjectRepository, UpstreamAuthenticator};
pub use services::login::{LoginService, LoginSuccess};
pub use services::projects::{ProductListing, ProjectService};
pub use services::requisition::{validate_order, RequisitionReceipt, RequisitionService};
pub use session::SessionTokenCodec;
