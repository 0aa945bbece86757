//! Multi-entity find operation.

use super::base::{log_find, FindContext};
use super::error::OperationResult;
use crate::cache::{CacheLookup, QueryCache};
use crate::event::EventContext;
use crate::model::person_type::{PersonType, PersonTypeRow};
use crate::query::{CacheScope, CompareOp, PersonTypeField, PersonTypeQuery, SortDirection};
use rusqlite::types::Value;
use rusqlite::Connection;
use std::sync::Arc;
use std::time::Instant;

/// Finds every person type matching the accumulated filter.
///
/// # Example
///
/// ```rust,ignore
/// let mut op = MultiFindOperation::new();
/// op.with_connection(&conn)
///     .by_name("Individual")
///     .sort_by_id(SortDirection::Desc)
///     .limit(2);
/// let page = op.do_operation()?;
/// ```
#[derive(Default)]
pub struct MultiFindOperation<'conn> {
    ctx: FindContext<'conn>,
}

impl<'conn> MultiFindOperation<'conn> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_connection(&mut self, conn: &'conn Connection) -> &mut Self {
        self.ctx.set_connection(conn);
        self
    }

    pub fn with_cache(&mut self, cache: Arc<dyn QueryCache>) -> &mut Self {
        self.ctx.set_cache(cache);
        self
    }

    /// Replaces the query prototype, dropping filters set so far.
    pub fn with_query(&mut self, query: PersonTypeQuery) -> &mut Self {
        self.ctx.set_query(query);
        self
    }

    pub fn query(&self) -> &PersonTypeQuery {
        self.ctx.query()
    }

    pub fn by_id(&mut self, id: i64) -> &mut Self {
        self.ctx.query_mut().by_id(id);
        self
    }

    pub fn by_id_with(&mut self, id: i64, op: CompareOp) -> &mut Self {
        self.ctx.query_mut().by_id_with(id, op);
        self
    }

    /// Filters by a list of ids; every element must be an integer.
    pub fn by_ids<I, V>(&mut self, ids: I) -> OperationResult<&mut Self>
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.ctx.query_mut().by_ids(ids)?;
        Ok(self)
    }

    pub fn by_name(&mut self, name: impl Into<String>) -> &mut Self {
        self.ctx.query_mut().by_name(name);
        self
    }

    pub fn by_name_with(&mut self, name: impl Into<String>, op: CompareOp) -> &mut Self {
        self.ctx.query_mut().by_name_with(name, op);
        self
    }

    /// Sets the row limit. Values `<= 0` are ignored.
    pub fn limit(&mut self, limit: i64) -> &mut Self {
        if limit <= 0 {
            return self;
        }
        self.ctx
            .query_mut()
            .limit(u32::try_from(limit).unwrap_or(u32::MAX));
        self
    }

    /// Sets the row offset. Negative values are ignored.
    pub fn offset(&mut self, offset: i64) -> &mut Self {
        if offset < 0 {
            return self;
        }
        self.ctx
            .query_mut()
            .offset(u32::try_from(offset).unwrap_or(u32::MAX));
        self
    }

    pub fn sort_by_id(&mut self, direction: SortDirection) -> &mut Self {
        self.ctx.query_mut().sort_by(PersonTypeField::Id, direction);
        self
    }

    pub fn sort_by_name(&mut self, direction: SortDirection) -> &mut Self {
        self.ctx.query_mut().sort_by(PersonTypeField::Name, direction);
        self
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
        self.ctx.on(name, handler, data, append);
        self
    }

    /// Returns all matching raw rows, from the cache when present.
    ///
    /// A database read is always written back to the cache, including an
    /// empty result.
    pub fn all_as_array(&self) -> OperationResult<Vec<PersonTypeRow>> {
        let started_at = Instant::now();
        let built = self.ctx.build_query()?;

        let (rows, cache_hit) = match self.ctx.get_from_cache(&built, CacheScope::All)? {
            CacheLookup::Hit(rows) => (rows, true),
            CacheLookup::Miss => {
                let rows = self.ctx.fetch_rows(&built)?;
                self.ctx.set_to_cache(&built, &rows, CacheScope::All)?;
                (rows, false)
            }
        };
        log_find(
            CacheScope::All,
            cache_hit,
            rows.len(),
            started_at.elapsed().as_millis(),
        );
        Ok(rows)
    }

    /// Returns all matching person types and fires `DO_FIND` with them.
    pub fn do_operation(self) -> OperationResult<Vec<PersonType>> {
        let rows = self.all_as_array()?;
        let result = self.ctx.person_type_list(rows);
        self.ctx.trigger_find(&result);
        Ok(result)
    }
}
