//! SQLite-backed implementation of the `ProjectRepository` port.
//!
//! Reads the project hierarchy from the ERP's project-management tables:
//! AF8010 (projects), AFC010 (structure/cells), AF9010 (tasks), AFA010
//! (task resources) and SCP010 (pre-requisitions). Only live rows
//! (`D_E_L_E_T_ = ' '`) of branch `01` are considered. Each call opens its
//! own read-only connection on the blocking pool.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use erpgate_core::ProjectRepository;
use erpgate_domain::{CellSummary, ErpGateError, ProductLine, ProjectSummary, Result};
use rusqlite::{Connection, OpenFlags, Row, ToSql};
use tokio::task;
use tracing::debug;

use crate::errors::InfraError;

/// Repository over a SQLite copy of the ERP project tables.
#[derive(Debug, Clone)]
pub struct SqliteProjectRepository {
    path: PathBuf,
}

impl SqliteProjectRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn run<T, F>(&self, label: &'static str, query: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&Connection) -> rusqlite::Result<T> + Send + 'static,
    {
        let path = self.path.clone();
        task::spawn_blocking(move || -> Result<T> {
            let conn = open_read_only(&path)?;
            debug!(query = label, "executing project query");
            query(&conn).map_err(|err| ErpGateError::from(InfraError::from(err)))
        })
        .await
        .map_err(map_join_error)?
    }
}

#[async_trait]
impl ProjectRepository for SqliteProjectRepository {
    async fn list_projects(&self) -> Result<Vec<ProjectSummary>> {
        self.run("projects", |conn| query_rows(conn, PROJECTS_QUERY, &[], map_project)).await
    }

    async fn list_cells(&self, project: &str, revision: &str) -> Result<Vec<CellSummary>> {
        let params = [project.to_string(), revision.to_string()];
        self.run("cells", move |conn| {
            let refs: [&dyn ToSql; 2] = [&params[0], &params[1]];
            query_rows(conn, CELLS_QUERY, &refs, map_cell)
        })
        .await
    }

    async fn list_products(
        &self,
        project: &str,
        revision: &str,
        cell: &str,
    ) -> Result<Vec<ProductLine>> {
        let params = [project.to_string(), revision.to_string(), cell.to_string()];
        self.run("products", move |conn| {
            let refs: [&dyn ToSql; 3] = [&params[0], &params[1], &params[2]];
            query_rows(conn, PRODUCTS_QUERY, &refs, map_product)
        })
        .await
    }
}

fn open_read_only(path: &Path) -> Result<Connection> {
    let flags = OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX;
    Connection::open_with_flags(path, flags)
        .map_err(|err| ErpGateError::from(InfraError::from(err)))
}

fn query_rows<T>(
    conn: &Connection,
    sql: &str,
    params: &[&dyn ToSql],
    map: fn(&Row<'_>) -> rusqlite::Result<T>,
) -> rusqlite::Result<Vec<T>> {
    let mut stmt = conn.prepare(sql)?;
    let rows = stmt.query_map(params, map)?;
    rows.collect()
}

fn map_project(row: &Row<'_>) -> rusqlite::Result<ProjectSummary> {
    Ok(ProjectSummary {
        project: text(row, 0)?,
        revision: text(row, 1)?,
        name: text(row, 2)?,
    })
}

fn map_cell(row: &Row<'_>) -> rusqlite::Result<CellSummary> {
    Ok(CellSummary {
        project: text(row, 0)?,
        revision: text(row, 1)?,
        cell: text(row, 2)?,
        required: quantity(row, 3)?,
        requested: quantity(row, 4)?,
        delivered: quantity(row, 5)?,
    })
}

fn map_product(row: &Row<'_>) -> rusqlite::Result<ProductLine> {
    Ok(ProductLine {
        project: text(row, 0)?,
        cell: text(row, 1)?,
        product: text(row, 2)?,
        description: text(row, 3)?,
        required: quantity(row, 4)?,
        requested: quantity(row, 5)?,
        delivered: quantity(row, 6)?,
    })
}

/// Fixed-width ERP columns come back space padded.
fn text(row: &Row<'_>, idx: usize) -> rusqlite::Result<String> {
    let value: Option<String> = row.get(idx)?;
    Ok(value.map(|v| v.trim().to_string()).unwrap_or_default())
}

fn quantity(row: &Row<'_>, idx: usize) -> rusqlite::Result<f64> {
    let value: Option<f64> = row.get(idx)?;
    Ok(value.unwrap_or(0.0))
}

fn map_join_error(err: task::JoinError) -> ErpGateError {
    ErpGateError::Internal(format!("project query task failed: {err}"))
}

// Protheus keys are fixed-width CHAR columns. SQL Server ignores trailing
// padding when comparing them and SQLite does not, so every key comparison
// goes through RTRIM and blank flags are tested with TRIM(..) = ''.
const PROJECTS_QUERY: &str = "SELECT DISTINCT RTRIM(AF8_PROJET), RTRIM(AF8_REVISA), AF8_XNOMCL
    FROM AF8010 AF8
    JOIN AFC010 AFC ON TRIM(AFC.D_E_L_E_T_) = ''
        AND RTRIM(AFC_FILIAL) = '01'
        AND RTRIM(AFC_PROJET) = RTRIM(AF8_PROJET)
        AND RTRIM(AFC_REVISA) = RTRIM(AF8_REVISA)
        AND TRIM(AFC_XPROD) <> ''
        AND TRIM(AFC_XPRODU) = ''
    WHERE TRIM(AF8.D_E_L_E_T_) = ''
      AND RTRIM(AF8_FILIAL) = '01'
      AND TRIM(AF8_XCC) = ''
    ORDER BY 1, 2";

/// Joins shared by the cell and product aggregations.
macro_rules! hierarchy_from {
    () => {
        "FROM AF8010 AF8
    JOIN AFC010 AFC ON TRIM(AFC.D_E_L_E_T_) = ''
        AND RTRIM(AFC_FILIAL) = '01'
        AND RTRIM(AFC_PROJET) = RTRIM(AF8_PROJET)
        AND RTRIM(AFC_REVISA) = RTRIM(AF8_REVISA)
        AND TRIM(AFC_XPROD) <> ''
        AND TRIM(AFC_XPRODU) = ''
    JOIN AF9010 AF9 ON TRIM(AF9.D_E_L_E_T_) = ''
        AND RTRIM(AF9_FILIAL) = '01'
        AND RTRIM(AF9_PROJET) = RTRIM(AFC_PROJET)
        AND RTRIM(AF9_REVISA) = RTRIM(AFC_REVISA)
        AND RTRIM(AF9_EDTPAI) = RTRIM(AFC_EDT)
    JOIN AFA010 AFA ON TRIM(AFA.D_E_L_E_T_) = ''
        AND RTRIM(AFA_FILIAL) = '01'
        AND RTRIM(AFA_PROJET) = RTRIM(AF9_PROJET)
        AND RTRIM(AFA_REVISA) = RTRIM(AF9_REVISA)
        AND RTRIM(AFA_TAREFA) = RTRIM(AF9_TAREFA)
        AND RTRIM(AFA_XESTRU) = 'S'
    LEFT JOIN SCP010 SCP ON TRIM(SCP.D_E_L_E_T_) = ''
        AND RTRIM(CP_FILIAL) = '01'
        AND RTRIM(CP_XPROJET) = RTRIM(AFA_PROJET)
        AND RTRIM(CP_XPROD) = RTRIM(AFC_XPROD)
        AND RTRIM(CP_XTAREFA) = RTRIM(AFA_TAREFA)
        AND RTRIM(CP_XITTARE) = RTRIM(AFA_ITEM)
        AND RTRIM(CP_PRODUTO) = RTRIM(AFA_PRODUT)
        AND RTRIM(CP_PREREQU) = 'S'"
    };
}

const CELLS_QUERY: &str = concat!(
    "SELECT RTRIM(AF8_PROJET), RTRIM(AF8_REVISA), RTRIM(AFC_XPROD),
        SUM(AFA_QUANT) AS AFA_QUANT,
        SUM(COALESCE(CP_QUANT, 0)) AS CP_QUANT,
        SUM(COALESCE(CP_XQUPR, 0)) AS CP_XQUPR
    ",
    hierarchy_from!(),
    "
    WHERE TRIM(AF8.D_E_L_E_T_) = ''
      AND RTRIM(AF8_FILIAL) = '01'
      AND RTRIM(AF8_PROJET) = ?1
      AND RTRIM(AF8_REVISA) = ?2
      AND TRIM(AF8_XCC) = ''
    GROUP BY 1, 2, 3
    ORDER BY 3"
);

const PRODUCTS_QUERY: &str = concat!(
    "SELECT RTRIM(AF8_PROJET), RTRIM(AFC_XPROD), RTRIM(AFA_PRODUT), AFA_XDESCR,
        SUM(AFA_QUANT) AS AFA_QUANT,
        SUM(COALESCE(CP_QUANT, 0)) AS CP_QUANT,
        SUM(COALESCE(CP_XQUPR, 0)) AS CP_XQUPR
    ",
    hierarchy_from!(),
    "
    WHERE TRIM(AF8.D_E_L_E_T_) = ''
      AND RTRIM(AF8_FILIAL) = '01'
      AND RTRIM(AF8_PROJET) = ?1
      AND RTRIM(AF8_REVISA) = ?2
      AND RTRIM(AFC_XPROD) = ?3
      AND TRIM(AF8_XCC) = ''
    GROUP BY 1, 2, 3, AFA_XDESCR
    ORDER BY 3"
);
