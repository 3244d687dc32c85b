//! Read-only project hierarchy endpoints

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::Json;
use erpgate_domain::{CellSummary, ProductLine, ProductStatistics, ProjectSummary};
use serde::Serialize;

use crate::context::AppContext;
use crate::error::ApiError;
use crate::extractors::AuthenticatedUser;
use crate::utils::logging::log_route_outcome;

#[derive(Debug, Serialize)]
pub struct ProductsResponse {
    pub success: bool,
    pub data: Vec<ProductLine>,
    pub count: usize,
    pub estatisticas: ProductStatistics,
}

/// `GET /api/projetos`
pub async fn list_projects(
    State(ctx): State<Arc<AppContext>>,
    AuthenticatedUser(identity): AuthenticatedUser,
) -> Result<Json<Vec<ProjectSummary>>, ApiError> {
    let result = ctx.projects.list_projects().await;
    log_route_outcome("/api/projetos", &identity.user, result.is_ok());
    Ok(Json(result?))
}

/// `GET /api/celulas/{project}/{revision}`
pub async fn list_cells(
    State(ctx): State<Arc<AppContext>>,
    AuthenticatedUser(identity): AuthenticatedUser,
    Path((project, revision)): Path<(String, String)>,
) -> Result<Json<Vec<CellSummary>>, ApiError> {
    let result = ctx.projects.list_cells(&project, &revision).await;
    log_route_outcome("/api/celulas", &identity.user, result.is_ok());
    Ok(Json(result?))
}

/// `GET /api/produtos/{project}/{revision}/{cell}`
pub async fn list_products(
    State(ctx): State<Arc<AppContext>>,
    AuthenticatedUser(identity): AuthenticatedUser,
    Path((project, revision, cell)): Path<(String, String, String)>,
) -> Result<Json<ProductsResponse>, ApiError> {
    let result = ctx.projects.list_products(&project, &revision, &cell).await;
    log_route_outcome("/api/produtos", &identity.user, result.is_ok());

    let listing = result?;
    Ok(Json(ProductsResponse {
        success: true,
        count: listing.lines.len(),
        data: listing.lines,
        estatisticas: listing.statistics,
    }))
}
