//! Person type use-case facade.
//!
//! # Responsibility
//! - Verify that a connection is migrated before handing out operations.
//! - Construct operations pre-wired with the connection and shared cache.
//!
//! # Invariants
//! - Every operation created here shares the same cache instance.
//! - The facade never executes queries itself beyond readiness checks.

use crate::cache::QueryCache;
use crate::db::migrations::{current_user_version, latest_version};
use crate::db::schema::{table_exists, table_has_column};
use crate::db::PERSON_TYPES_TABLE;
use crate::operation::{
    MultiDeleteOperation, MultiFindOperation, OperationError, OperationResult,
    SingleFindOperation,
};
use rusqlite::Connection;
use std::sync::Arc;

const REQUIRED_COLUMNS: &[&str] = &["id", "name"];

/// Entry point for person type operations on one connection.
pub struct PersonTypeService<'conn> {
    conn: &'conn Connection,
    cache: Option<Arc<dyn QueryCache>>,
}

impl<'conn> PersonTypeService<'conn> {
    /// Creates a facade over a migrated connection.
    ///
    /// # Errors
    /// - `UninitializedConnection` when the schema version differs from the
    ///   one this binary migrates to.
    /// - `MissingRequiredTable` / `MissingRequiredColumn` when the schema is
    ///   incomplete.
    pub fn try_new(conn: &'conn Connection) -> OperationResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self { conn, cache: None })
    }

    /// Attaches a cache shared by every operation created afterwards.
    pub fn with_cache(mut self, cache: Arc<dyn QueryCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn cache(&self) -> Option<&Arc<dyn QueryCache>> {
        self.cache.as_ref()
    }

    pub fn single_find(&self) -> SingleFindOperation<'conn> {
        let mut op = SingleFindOperation::new();
        op.with_connection(self.conn);
        if let Some(cache) = &self.cache {
            op.with_cache(Arc::clone(cache));
        }
        op
    }

    pub fn multi_find(&self) -> MultiFindOperation<'conn> {
        let mut op = MultiFindOperation::new();
        op.with_connection(self.conn);
        if let Some(cache) = &self.cache {
            op.with_cache(Arc::clone(cache));
        }
        op
    }

    pub fn multi_delete(&self) -> MultiDeleteOperation<'conn> {
        let mut op = MultiDeleteOperation::new();
        op.with_connection(self.conn);
        if let Some(cache) = &self.cache {
            op.set_cache_model(Arc::clone(cache));
        }
        op
    }
}

fn ensure_connection_ready(conn: &Connection) -> OperationResult<()> {
    let expected_version = latest_version();
    let actual_version = current_user_version(conn)?;
    if actual_version != expected_version {
        return Err(OperationError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    if !table_exists(conn, PERSON_TYPES_TABLE)? {
        return Err(OperationError::MissingRequiredTable(PERSON_TYPES_TABLE));
    }

    for &column in REQUIRED_COLUMNS {
        if !table_has_column(conn, PERSON_TYPES_TABLE, column)? {
            return Err(OperationError::MissingRequiredColumn {
                table: PERSON_TYPES_TABLE,
                column,
            });
        }
    }

    Ok(())
}
