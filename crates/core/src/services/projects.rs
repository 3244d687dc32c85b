//! Project hierarchy queries

use std::sync::Arc;

use erpgate_domain::{
    CellSummary, ErpGateError, ProductLine, ProductStatistics, ProjectSummary, Result,
};
use serde::Serialize;

use crate::ports::ProjectRepository;

/// Product lines of a cell together with their delivery statistics.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ProductListing {
    pub lines: Vec<ProductLine>,
    pub statistics: ProductStatistics,
}

/// Read-side service over the project repository.
pub struct ProjectService {
    repository: Arc<dyn ProjectRepository>,
}

impl ProjectService {
    pub fn new(repository: Arc<dyn ProjectRepository>) -> Self {
        Self { repository }
    }

    pub async fn list_projects(&self) -> Result<Vec<ProjectSummary>> {
        self.repository.list_projects().await
    }

    pub async fn list_cells(&self, project: &str, revision: &str) -> Result<Vec<CellSummary>> {
        let project = required("project", project)?;
        let revision = required("revision", revision)?;
        self.repository.list_cells(project, revision).await
    }

    pub async fn list_products(
        &self,
        project: &str,
        revision: &str,
        cell: &str,
    ) -> Result<ProductListing> {
        let project = required("project", project)?;
        let revision = required("revision", revision)?;
        let cell = required("cell", cell)?;

        let lines = self.repository.list_products(project, revision, cell).await?;
        let statistics = ProductStatistics::from_lines(&lines);
        Ok(ProductListing { lines, statistics })
    }
}

fn required<'a>(name: &str, value: &'a str) -> Result<&'a str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ErpGateError::InvalidInput(format!("{name} is required")));
    }
    Ok(trimmed)
}
