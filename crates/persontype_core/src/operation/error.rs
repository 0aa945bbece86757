//! Operation-level error taxonomy.

use crate::cache::CacheError;
use crate::db::DbError;
use crate::query::QueryError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type OperationResult<T> = Result<T, OperationError>;

/// Errors raised by find/delete operations and the service facade.
#[derive(Debug)]
pub enum OperationError {
    /// Filter or projection rejected before any I/O.
    Query(QueryError),
    Db(DbError),
    Cache(CacheError),
    /// A required collaborator was not provided.
    Misconfigured(&'static str),
    /// Connection schema is not at the expected migrated version.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
}

impl Display for OperationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Query(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::Cache(err) => write!(f, "{err}"),
            Self::Misconfigured(message) => write!(f, "operation is misconfigured: {message}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "person type operations require schema version {expected_version}, got {actual_version}"
            ),
            Self::MissingRequiredTable(table) => {
                write!(f, "person type operations require table `{table}`")
            }
            Self::MissingRequiredColumn { table, column } => write!(
                f,
                "person type operations require column `{column}` in table `{table}`"
            ),
        }
    }
}

impl Error for OperationError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Query(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::Cache(err) => Some(err),
            Self::Misconfigured(_) => None,
            Self::UninitializedConnection { .. } => None,
            Self::MissingRequiredTable(_) => None,
            Self::MissingRequiredColumn { .. } => None,
        }
    }
}

impl From<QueryError> for OperationError {
    fn from(value: QueryError) -> Self {
        Self::Query(value)
    }
}

impl From<DbError> for OperationError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for OperationError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

impl From<CacheError> for OperationError {
    fn from(value: CacheError) -> Self {
        Self::Cache(value)
    }
}
