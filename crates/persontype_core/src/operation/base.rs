//! Shared state and helpers for find operations.
//!
//! # Responsibility
//! - Own the query prototype, connection handle, cache and dispatcher.
//! - Provide cache read/write keyed by the built query.
//! - Read `person_types` rows and convert them into DTOs.
//!
//! # Invariants
//! - Query construction fails with `Misconfigured` before any I/O when no
//!   connection is set or the projection lacks `id` or `name`.
//! - Row to DTO conversion is pure; rows are returned exactly as stored.

use super::error::{OperationError, OperationResult};
use crate::cache::{lookup_rows, store_rows, CacheLookup, QueryCache};
use crate::event::{EventContext, EventDispatcher, FindOperationEvent, OperationEvent, DO_FIND_EVENT};
use crate::model::person_type::{person_type_list, PersonType, PersonTypeRow};
use crate::query::{BuiltQuery, CacheScope, PersonTypeQuery};
use log::debug;
use rusqlite::{params_from_iter, Connection, Row};
use std::sync::Arc;

/// Collaborators and query state shared by single/multi find.
#[derive(Default)]
pub struct FindContext<'conn> {
    query: PersonTypeQuery,
    conn: Option<&'conn Connection>,
    cache: Option<Arc<dyn QueryCache>>,
    events: EventDispatcher,
}

impl<'conn> FindContext<'conn> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn query(&self) -> &PersonTypeQuery {
        &self.query
    }

    pub fn query_mut(&mut self) -> &mut PersonTypeQuery {
        &mut self.query
    }

    pub fn set_query(&mut self, query: PersonTypeQuery) {
        self.query = query;
    }

    pub fn set_connection(&mut self, conn: &'conn Connection) {
        self.conn = Some(conn);
    }

    pub fn set_cache(&mut self, cache: Arc<dyn QueryCache>) {
        self.cache = Some(cache);
    }

    pub fn on<F>(&mut self, name: &str, handler: F, data: Option<serde_json::Value>, append: bool)
    where
        F: Fn(&EventContext<'_>) + 'static,
    {
        self.events.on(name, handler, data, append);
    }

    /// Returns the configured connection.
    pub fn connection(&self) -> OperationResult<&'conn Connection> {
        self.conn
            .ok_or(OperationError::Misconfigured("database connection is not set"))
    }

    /// Renders the SELECT for the accumulated query.
    ///
    /// # Errors
    /// - `Misconfigured` when no connection is set, or when the projection
    ///   leaves out `id` or `name`.
    pub fn build_query(&self) -> OperationResult<BuiltQuery> {
        self.connection()?;
        if !self.query.selects_column("id") || !self.query.selects_column("name") {
            return Err(OperationError::Misconfigured(
                "projection must include id and name",
            ));
        }
        Ok(self.query.build_select())
    }

    /// Looks `built` up in the cache. Without a cache every lookup misses.
    pub fn get_from_cache(
        &self,
        built: &BuiltQuery,
        scope: CacheScope,
    ) -> OperationResult<CacheLookup> {
        match self.cache.as_deref() {
            Some(cache) => Ok(lookup_rows(cache, &built.fingerprint(scope))?),
            None => Ok(CacheLookup::Miss),
        }
    }

    /// Stores `rows` for `built`. No-op without a cache.
    pub fn set_to_cache(
        &self,
        built: &BuiltQuery,
        rows: &[PersonTypeRow],
        scope: CacheScope,
    ) -> OperationResult<()> {
        if let Some(cache) = self.cache.as_deref() {
            store_rows(cache, &built.fingerprint(scope), rows)?;
        }
        Ok(())
    }

    /// Executes `built` and reads every row.
    pub fn fetch_rows(&self, built: &BuiltQuery) -> OperationResult<Vec<PersonTypeRow>> {
        let conn = self.connection()?;
        let mut stmt = conn.prepare(built.sql())?;
        let mut rows = stmt.query(params_from_iter(built.params()))?;
        let mut result = Vec::new();
        while let Some(row) = rows.next()? {
            result.push(parse_person_type_row(row)?);
        }
        Ok(result)
    }

    /// Executes `built` and reads the first row, if any.
    pub fn fetch_one(&self, built: &BuiltQuery) -> OperationResult<Option<PersonTypeRow>> {
        let conn = self.connection()?;
        let mut stmt = conn.prepare(built.sql())?;
        let mut rows = stmt.query(params_from_iter(built.params()))?;
        match rows.next()? {
            Some(row) => Ok(Some(parse_person_type_row(row)?)),
            None => Ok(None),
        }
    }

    pub fn person_type_list(&self, rows: Vec<PersonTypeRow>) -> Vec<PersonType> {
        person_type_list(rows)
    }

    /// Fires `DO_FIND` carrying a copy of `dto_list`.
    pub fn trigger_find(&self, dto_list: &[PersonType]) {
        if !self.events.has_handlers(DO_FIND_EVENT) {
            return;
        }
        let event = OperationEvent::Find(FindOperationEvent {
            dto_list: dto_list.to_vec(),
        });
        self.events.trigger(DO_FIND_EVENT, &event);
    }
}

/// Reads one `person_types` row as stored.
pub(crate) fn parse_person_type_row(row: &Row<'_>) -> OperationResult<PersonTypeRow> {
    Ok(PersonTypeRow {
        id: row.get("id")?,
        name: row.get("name")?,
    })
}

pub(crate) fn log_find(scope: CacheScope, cache_hit: bool, rows: usize, duration_ms: u128) {
    debug!(
        "event=person_type_find module=operation status=ok scope={} cache={} rows={} duration_ms={}",
        scope.as_str(),
        if cache_hit { "hit" } else { "miss" },
        rows,
        duration_ms
    );
}
