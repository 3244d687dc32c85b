//! Application context - dependency injection container

use std::sync::Arc;

use erpgate_core::{
    Clock, LoginService, OrderSubmitter, ProjectRepository, ProjectService, RequisitionService,
    SessionTokenCodec, SystemClock, UpstreamAuthenticator,
};
use erpgate_domain::{Config, Result};
use erpgate_infra::{ErpAuthClient, ErpOrderClient, SqliteProjectRepository};

/// Type alias for the upstream authenticator port trait object
type DynAuthenticator = dyn UpstreamAuthenticator + Send + Sync + 'static;

/// Type alias for the order submitter port trait object
type DynOrderSubmitter = dyn OrderSubmitter + Send + Sync + 'static;

/// Type alias for the project repository port trait object
type DynProjectRepository = dyn ProjectRepository + Send + Sync + 'static;

/// Application context - holds all services and dependencies.
///
/// Built once at startup and shared read-only by every request.
pub struct AppContext {
    pub config: Config,
    pub codec: Arc<SessionTokenCodec>,
    pub login: Arc<LoginService>,
    pub projects: Arc<ProjectService>,
    pub requisitions: Arc<RequisitionService>,
}

impl AppContext {
    /// Wire the production adapters (ERP over HTTP, SQLite on disk).
    ///
    /// # Errors
    /// Returns `ErpGateError::Config` when the session secret is blank or the
    /// HTTP clients cannot be constructed.
    pub fn new(config: Config) -> Result<Self> {
        let authenticator: Arc<DynAuthenticator> = Arc::new(ErpAuthClient::new(&config.erp)?);
        let submitter: Arc<DynOrderSubmitter> = Arc::new(ErpOrderClient::new(&config.erp)?);
        let repository: Arc<DynProjectRepository> =
            Arc::new(SqliteProjectRepository::new(&config.database.path));

        tracing::info!(
            erp = %config.erp.base_url,
            database = %config.database.path,
            probe_policy = %config.erp.probe_policy,
            token_encoding = %config.erp.token_encoding,
            "application context initialised"
        );

        Self::from_parts(config, Arc::new(SystemClock), authenticator, submitter, repository)
    }

    /// Wire the context from explicit port implementations.
    pub fn from_parts(
        config: Config,
        clock: Arc<dyn Clock>,
        authenticator: Arc<DynAuthenticator>,
        submitter: Arc<DynOrderSubmitter>,
        repository: Arc<DynProjectRepository>,
    ) -> Result<Self> {
        let codec = Arc::new(SessionTokenCodec::new(&config.session.secret, clock.clone())?);

        Ok(Self {
            login: Arc::new(LoginService::new(authenticator, codec.clone())),
            projects: Arc::new(ProjectService::new(repository)),
            requisitions: Arc::new(RequisitionService::new(submitter, clock)),
            codec,
            config,
        })
    }
}
