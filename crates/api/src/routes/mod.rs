//! Axum router and HTTP handlers.
//!
//! `build_router` is the single entry point; `main.rs` calls it and attaches
//! middleware layers so tests can drive the bare router.

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;

use crate::context::AppContext;

pub mod auth;
pub mod health;
pub mod projects;
pub mod requisition;

/// Build the complete application router wired to the given context.
pub fn build_router(ctx: Arc<AppContext>) -> Router {
    Router::new()
        .route("/health", get(health::health))
        .route("/api/auth/login", post(auth::login))
        .route("/logout", get(auth::logout))
        .route("/api/projetos", get(projects::list_projects))
        .route("/api/celulas/{project}/{revision}", get(projects::list_cells))
        .route("/api/produtos/{project}/{revision}/{cell}", get(projects::list_products))
        .route("/api/requisicao", post(requisition::submit))
        .with_state(ctx)
}
