//! Port interfaces implemented by the infrastructure layer

use async_trait::async_trait;
use erpgate_domain::{
    CellSummary, OrderPayload, ProductLine, ProjectSummary, Result, SubmissionError,
    SubmissionResult, UpstreamAuthError, UpstreamCredential,
};

/// Exchanges a user's ERP credentials for an upstream token pair.
#[async_trait]
pub trait UpstreamAuthenticator: Send + Sync {
    /// Run the probe/token handshake. Single attempt, no retries.
    async fn authenticate(
        &self,
        username: &str,
        password: &str,
    ) -> std::result::Result<UpstreamCredential, UpstreamAuthError>;
}

/// Forwards requisitions to the ERP order endpoint.
#[async_trait]
pub trait OrderSubmitter: Send + Sync {
    /// Submit `payload` on behalf of the holder of `upstream_token`.
    ///
    /// Every upstream HTTP outcome, including network failures, is reported
    /// through [`SubmissionResult`]. Errors are reserved for requests that
    /// never left the process.
    async fn submit(
        &self,
        payload: OrderPayload,
        upstream_token: &str,
    ) -> std::result::Result<SubmissionResult, SubmissionError>;
}

/// Read access to the project → cell → product hierarchy.
#[async_trait]
pub trait ProjectRepository: Send + Sync {
    /// All project revisions, ordered by project then revision.
    async fn list_projects(&self) -> Result<Vec<ProjectSummary>>;

    /// Cells of one project revision with aggregated quantities.
    async fn list_cells(&self, project: &str, revision: &str) -> Result<Vec<CellSummary>>;

    /// Product lines of one cell.
    async fn list_products(
        &self,
        project: &str,
        revision: &str,
        cell: &str,
    ) -> Result<Vec<ProductLine>>;
}
