//! Mapping of third-party failures onto `ErpGateError`.

use erpgate_domain::ErpGateError;
use reqwest::Error as HttpError;
use rusqlite::Error as SqlError;

use crate::http::HttpFailure;

/// Wrapper that lets infrastructure code use `?` on foreign errors while
/// callers still receive an `ErpGateError`.
#[derive(Debug)]
pub struct InfraError(pub ErpGateError);

impl From<InfraError> for ErpGateError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<ErpGateError> for InfraError {
    fn from(value: ErpGateError) -> Self {
        InfraError(value)
    }
}

trait IntoErpGateError {
    fn into_erpgate(self) -> ErpGateError;
}

// rusqlite: the project database is opened read-only, so the interesting
// failures are "cannot open", "schema drift" and "value of unexpected type".
impl IntoErpGateError for SqlError {
    fn into_erpgate(self) -> ErpGateError {
        use rusqlite::ffi::ErrorCode;

        match self {
            SqlError::SqliteFailure(err, detail) => {
                let detail = detail.unwrap_or_else(|| err.to_string());
                let summary = match err.code {
                    ErrorCode::CannotOpen => "project database cannot be opened",
                    ErrorCode::NotADatabase => "project database file is not SQLite",
                    ErrorCode::DatabaseBusy | ErrorCode::DatabaseLocked => {
                        "project database is busy"
                    }
                    ErrorCode::PermissionDenied => "project database is not readable",
                    _ => "project database query failed",
                };
                ErpGateError::Database(format!("{summary}: {detail}"))
            }
            SqlError::QueryReturnedNoRows => {
                ErpGateError::NotFound("no matching rows in project database".into())
            }
            SqlError::InvalidColumnType(index, name, ty) => ErpGateError::Database(format!(
                "column {name} (#{index}) has unexpected type {ty}"
            )),
            SqlError::FromSqlConversionFailure(index, ty, cause) => ErpGateError::Database(
                format!("column #{index} of type {ty} could not be read: {cause}"),
            ),
            other => ErpGateError::Database(other.to_string()),
        }
    }
}

impl From<SqlError> for InfraError {
    fn from(value: SqlError) -> Self {
        InfraError(value.into_erpgate())
    }
}

// reqwest errors only surface from client construction; request failures are
// classified by `HttpClient` into `HttpFailure`.
impl IntoErpGateError for HttpError {
    fn into_erpgate(self) -> ErpGateError {
        if self.is_builder() {
            ErpGateError::Config(format!("invalid HTTP client configuration: {self}"))
        } else {
            ErpGateError::Network(self.to_string())
        }
    }
}

impl From<HttpError> for InfraError {
    fn from(value: HttpError) -> Self {
        InfraError(value.into_erpgate())
    }
}

impl From<HttpFailure> for InfraError {
    fn from(value: HttpFailure) -> Self {
        InfraError(ErpGateError::Network(value.to_string()))
    }
}
