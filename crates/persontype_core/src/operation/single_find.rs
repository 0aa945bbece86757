//! Single-entity find operation.

use super::base::{log_find, FindContext};
use super::error::OperationResult;
use crate::cache::{CacheLookup, QueryCache};
use crate::event::EventContext;
use crate::model::person_type::PersonType;
use crate::query::{CacheScope, CompareOp, PersonTypeField, PersonTypeQuery, SortDirection};
use rusqlite::types::Value;
use rusqlite::Connection;
use std::sync::Arc;
use std::time::Instant;

/// Finds at most one person type matching the accumulated filter.
///
/// # Example
///
/// ```rust,ignore
/// let mut op = SingleFindOperation::new();
/// op.with_connection(&conn).by_name("Individual");
/// let found = op.do_operation()?;
/// ```
#[derive(Default)]
pub struct SingleFindOperation<'conn> {
    ctx: FindContext<'conn>,
}

impl<'conn> SingleFindOperation<'conn> {
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

    /// Returns the first matching person type.
    ///
    /// A miss reads one row from the database and caches it. "Not found" is
    /// `Ok(None)`; it is neither cached nor announced.
    ///
    /// # Errors
    /// - `Misconfigured` when no connection is set.
    /// - Database and cache errors unchanged.
    pub fn do_operation(mut self) -> OperationResult<Option<PersonType>> {
        let started_at = Instant::now();
        self.ctx.query_mut().limit(1);
        let built = self.ctx.build_query()?;

        let (rows, cache_hit) = match self.ctx.get_from_cache(&built, CacheScope::One)? {
            CacheLookup::Hit(rows) => (rows, true),
            CacheLookup::Miss => {
                let Some(row) = self.ctx.fetch_one(&built)? else {
                    log_find(CacheScope::One, false, 0, started_at.elapsed().as_millis());
                    return Ok(None);
                };
                let rows = vec![row];
                self.ctx.set_to_cache(&built, &rows, CacheScope::One)?;
                (rows, false)
            }
        };
        log_find(
            CacheScope::One,
            cache_hit,
            rows.len(),
            started_at.elapsed().as_millis(),
        );

        let mut list = self.ctx.person_type_list(rows);
        let result = if list.is_empty() {
            None
        } else {
            Some(list.remove(0))
        };
        self.ctx.trigger_find(&list);
        Ok(result)
    }
}
