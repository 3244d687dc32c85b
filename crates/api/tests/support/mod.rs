//! Shared fakes for router tests.
#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use chrono::{TimeZone, Utc};
use erpgate_api::{build_router, AppContext};
use erpgate_core::{Clock, MockClock, OrderSubmitter, ProjectRepository, UpstreamAuthenticator};
use erpgate_domain::{
    CellSummary, Config, DatabaseConfig, ErpConfig, ErpGateError, OrderPayload, ProductLine,
    ProjectSummary, Result, ServerConfig, SessionConfig, SubmissionError, SubmissionResult,
    UpstreamAuthError, UpstreamCredential,
};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

pub const SECRET: &str = "router-test-secret";

pub fn config() -> Config {
    Config {
        server: ServerConfig::default(),
        erp: ErpConfig::with_base_url("http://erp.invalid/rest"),
        session: SessionConfig { secret: SECRET.into() },
        database: DatabaseConfig { path: "unused.db".into() },
    }
}

/// Accepts one username/password pair.
pub struct FakeAuthenticator {
    pub username: &'static str,
    pub password: &'static str,
    pub failure: Option<UpstreamAuthError>,
}

impl Default for FakeAuthenticator {
    fn default() -> Self {
        Self { username: "ana", password: "s3cret", failure: None }
    }
}

#[async_trait]
impl UpstreamAuthenticator for FakeAuthenticator {
    async fn authenticate(
        &self,
        username: &str,
        password: &str,
    ) -> std::result::Result<UpstreamCredential, UpstreamAuthError> {
        if let Some(err) = &self.failure {
            return Err(err.clone());
        }
        if username == self.username && password == self.password {
            Ok(UpstreamCredential::new("erp-access-token", None))
        } else {
            Err(UpstreamAuthError::Rejected { status: 401, body: "invalid user".into() })
        }
    }
}

/// Records every forwarded order and answers with a fixed result.
pub struct FakeSubmitter {
    pub answer: std::result::Result<SubmissionResult, SubmissionError>,
    pub seen: Mutex<Vec<(OrderPayload, String)>>,
}

impl FakeSubmitter {
    pub fn answering(answer: std::result::Result<SubmissionResult, SubmissionError>) -> Self {
        Self { answer, seen: Mutex::new(Vec::new()) }
    }

    pub fn seen(&self) -> Vec<(OrderPayload, String)> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl OrderSubmitter for FakeSubmitter {
    async fn submit(
        &self,
        payload: OrderPayload,
        upstream_token: &str,
    ) -> std::result::Result<SubmissionResult, SubmissionError> {
        self.seen.lock().unwrap().push((payload, upstream_token.to_string()));
        self.answer.clone()
    }
}

#[derive(Default)]
pub struct FakeRepository {
    pub broken: bool,
}

#[async_trait]
impl ProjectRepository for FakeRepository {
    async fn list_projects(&self) -> Result<Vec<ProjectSummary>> {
        if self.broken {
            return Err(ErpGateError::Database("no such table: AF8010".into()));
        }
        Ok(vec![ProjectSummary {
            project: "PRJ001".into(),
            revision: "0001".into(),
            name: "Acme Foods".into(),
        }])
    }

    async fn list_cells(&self, project: &str, revision: &str) -> Result<Vec<CellSummary>> {
        Ok(vec![CellSummary {
            project: project.into(),
            revision: revision.into(),
            cell: "CEL-A".into(),
            required: 15.0,
            requested: 6.0,
            delivered: 3.0,
        }])
    }

    async fn list_products(
        &self,
        project: &str,
        _revision: &str,
        cell: &str,
    ) -> Result<Vec<ProductLine>> {
        let line = |product: &str, description: &str, required, requested, delivered| {
            ProductLine {
                project: project.into(),
                cell: cell.into(),
                product: product.into(),
                description: description.into(),
                required,
                requested,
                delivered,
            }
        };
        Ok(vec![line("P100", "Bolt", 10.0, 4.0, 3.0), line("P200", "Nut", 5.0, 2.0, 0.0)])
    }
}

/// Router plus handles on the pieces tests need to poke.
pub struct Harness {
    pub router: axum::Router,
    pub ctx: Arc<AppContext>,
    pub clock: Arc<MockClock>,
    pub submitter: Arc<FakeSubmitter>,
}

impl Harness {
    pub fn new() -> Self {
        Self::with(
            FakeAuthenticator::default(),
            FakeSubmitter::answering(Ok(SubmissionResult::accepted(
                "order 123 created",
                Some(serde_json::json!({ "numero_ordem": "123" })),
            ))),
            FakeRepository::default(),
        )
    }

    pub fn with(
        authenticator: FakeAuthenticator,
        submitter: FakeSubmitter,
        repository: FakeRepository,
    ) -> Self {
        let clock = Arc::new(MockClock::at(Utc.with_ymd_and_hms(2025, 3, 14, 9, 30, 0).unwrap()));
        let submitter = Arc::new(submitter);
        let ctx = Arc::new(
            AppContext::from_parts(
                config(),
                clock.clone() as Arc<dyn Clock>,
                Arc::new(authenticator),
                submitter.clone(),
                Arc::new(repository),
            )
            .unwrap(),
        );
        Self { router: build_router(ctx.clone()), ctx, clock, submitter }
    }

    /// Session token for `user` carrying the fake upstream token.
    pub fn session_for(&self, user: &str) -> String {
        self.ctx.codec.issue(user, &UpstreamCredential::new("erp-access-token", None)).unwrap()
    }
}

/// Drive the router with a single request and return (status, headers, json body).
pub async fn call(
    router: &axum::Router,
    req: Request<Body>,
) -> (StatusCode, axum::http::HeaderMap, Value) {
    let resp = router.clone().oneshot(req).await.expect("oneshot failed");
    let status = resp.status();
    let headers = resp.headers().clone();
    let bytes = resp.into_body().collect().await.expect("body collect failed").to_bytes();
    let body = if bytes.is_empty() { Value::Null } else { serde_json::from_slice(&bytes).unwrap() };
    (status, headers, body)
}

pub fn get(uri: &str, bearer: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(token) = bearer {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    builder.body(Body::empty()).unwrap()
}

pub fn post_json(uri: &str, bearer: Option<&str>, body: Value) -> Request<Body> {
    let mut builder =
        Request::builder().method("POST").uri(uri).header("content-type", "application/json");
    if let Some(token) = bearer {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}
