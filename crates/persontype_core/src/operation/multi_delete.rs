//! Multi-entity delete operation.

use super::error::{OperationError, OperationResult};
use super::result::{DeleteOperationResult, OperationOutcome};
use crate::cache::QueryCache;
use crate::event::{
    DeleteOperationEvent, EventContext, EventDispatcher, OperationEvent, DO_DELETE_EVENT,
};
use crate::query::PersonTypeQuery;
use log::{error, info};
use rusqlite::types::Value;
use rusqlite::{params_from_iter, Connection};
use std::sync::Arc;
use std::time::Instant;

/// Deletes every person type matching the accumulated filter.
///
/// The result shape is taken from a prototype implementing
/// [`OperationOutcome`]; [`DeleteOperationResult`] is the default.
pub struct MultiDeleteOperation<'conn, R: OperationOutcome = DeleteOperationResult> {
    query: PersonTypeQuery,
    conn: Option<&'conn Connection>,
    cache: Option<Arc<dyn QueryCache>>,
    events: EventDispatcher,
    result_prototype: R,
}

impl Default for MultiDeleteOperation<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl MultiDeleteOperation<'_> {
    pub fn new() -> Self {
        Self::with_result_prototype(DeleteOperationResult::new())
    }
}

impl<'conn, R: OperationOutcome> MultiDeleteOperation<'conn, R> {
    /// Creates an operation returning clones of `prototype`.
    pub fn with_result_prototype(prototype: R) -> Self {
        Self {
            query: PersonTypeQuery::new(),
            conn: None,
            cache: None,
            events: EventDispatcher::new(),
            result_prototype: prototype,
        }
    }

    pub fn with_connection(&mut self, conn: &'conn Connection) -> &mut Self {
        self.conn = Some(conn);
        self
    }

    /// Sets the cache flushed after rows are deleted.
    pub fn set_cache_model(&mut self, cache: Arc<dyn QueryCache>) -> &mut Self {
        self.cache = Some(cache);
        self
    }

    pub fn query(&self) -> &PersonTypeQuery {
        &self.query
    }

    pub fn by_id(&mut self, id: i64) -> &mut Self {
        self.query.by_id(id);
        self
    }

    /// Adds an id-list filter; every element must be an integer.
    pub fn by_ids<I, V>(&mut self, ids: I) -> OperationResult<&mut Self>
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.query.by_ids(ids)?;
        Ok(self)
    }

    pub fn by_name(&mut self, name: impl Into<String>) -> &mut Self {
        self.query.by_name(name);
        self
    }

    pub fn result_prototype(&self) -> &R {
        &self.result_prototype
    }

    /// Swaps the result prototype, possibly changing the result type.
    pub fn set_result_prototype<P: OperationOutcome>(
        self,
        prototype: P,
    ) -> MultiDeleteOperation<'conn, P> {
        MultiDeleteOperation {
            query: self.query,
            conn: self.conn,
            cache: self.cache,
            events: self.events,
            result_prototype: prototype,
        }
    }

    pub fn on<F>(
        &mut self,
        name: &str,
        handler: F,
        data: Option<serde_json::Value>,
        append: bool,
    ) -> &mut Self
    where
        F: Fn(&EventContext<'_>) + 'static,
    {
        self.events.on(name, handler, data, append);
        self
    }

    /// Deletes matching rows and returns a filled clone of the prototype.
    ///
    /// Database failures are returned as `Err`; the result object only
    /// describes completed deletes. The cache is flushed when any row was
    /// removed, then `DO_DELETE` fires with a snapshot of the result.
    ///
    /// The delete runs in its own transaction, so the connection must not
    /// already be inside one. A cache flush failure rolls the delete back.
    ///
    /// # Errors
    /// - `Misconfigured` when no connection is set or no filter was added.
    /// - Database and cache errors unchanged.
    pub fn do_operation(self) -> OperationResult<R> {
        let started_at = Instant::now();
        let conn = self
            .conn
            .ok_or(OperationError::Misconfigured("database connection is not set"))?;
        if !self.query.has_conditions() {
            return Err(OperationError::Misconfigured(
                "delete requires at least one filter",
            ));
        }

        let affected = match self.delete_and_flush(conn) {
            Ok(affected) => affected,
            Err(err) => {
                error!(
                    "event=person_type_delete module=operation status=error duration_ms={} error={}",
                    started_at.elapsed().as_millis(),
                    err
                );
                return Err(err);
            }
        };

        let mut result = self.result_prototype.clone();
        result.set_affected_rows(u64::try_from(affected).unwrap_or(u64::MAX));

        info!(
            "event=person_type_delete module=operation status=ok affected={} duration_ms={}",
            affected,
            started_at.elapsed().as_millis()
        );

        let event = OperationEvent::Delete(DeleteOperationEvent {
            result: result.snapshot(),
        });
        self.events.trigger(DO_DELETE_EVENT, &event);
        Ok(result)
    }

    /// Deletes and flushes in one transaction; a failed flush rolls the
    /// delete back so the cache never outlives the rows it describes.
    fn delete_and_flush(&self, conn: &Connection) -> OperationResult<usize> {
        let built = self.query.build_delete();
        let tx = conn.unchecked_transaction()?;
        let affected = tx.execute(built.sql(), params_from_iter(built.params()))?;
        if affected > 0 {
            if let Some(cache) = self.cache.as_deref() {
                cache.flush()?;
            }
        }
        tx.commit()?;
        Ok(affected)
    }
}
