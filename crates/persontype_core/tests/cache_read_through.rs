mod common;

use common::{insert, seeded_db, standard_rows};
use persontype_core::db::open_db_in_memory;
use persontype_core::query::QueryFingerprint;
use persontype_core::{
    CacheError, CacheResult, InMemoryQueryCache, MultiFindOperation, OperationError, QueryCache,
    SingleFindOperation, SortDirection,
};
use std::sync::Arc;

fn find_all(conn: &rusqlite::Connection, cache: Arc<dyn QueryCache>) -> Vec<i64> {
    let mut op = MultiFindOperation::new();
    op.with_connection(conn)
        .with_cache(cache)
        .sort_by_id(SortDirection::Asc);
    op.do_operation()
        .unwrap()
        .into_iter()
        .map(|item| item.id)
        .collect()
}

#[test]
fn cached_empty_list_is_served_without_touching_db() {
    let conn = open_db_in_memory().unwrap();
    let cache: Arc<dyn QueryCache> = Arc::new(InMemoryQueryCache::new());

    assert!(find_all(&conn, cache.clone()).is_empty());

    insert(&conn, 1, "Individual");
    assert!(find_all(&conn, cache.clone()).is_empty());

    conn.execute_batch("DROP TABLE person_types;").unwrap();
    let mut op = MultiFindOperation::new();
    op.with_connection(&conn)
        .with_cache(cache)
        .sort_by_id(SortDirection::Asc);
    assert!(op.all_as_array().unwrap().is_empty());
}

#[test]
fn different_filters_use_different_entries() {
    let conn = seeded_db(&standard_rows());
    let cache = Arc::new(InMemoryQueryCache::new());

    let mut by_one = MultiFindOperation::new();
    by_one.with_connection(&conn).with_cache(cache.clone()).by_id(1);
    let mut by_two = MultiFindOperation::new();
    by_two.with_connection(&conn).with_cache(cache.clone()).by_id(2);

    assert_eq!(by_one.do_operation().unwrap()[0].id, 1);
    assert_eq!(by_two.do_operation().unwrap()[0].id, 2);
    assert_eq!(cache.len(), 2);
}

#[test]
fn single_and_multi_find_do_not_share_entries() {
    let conn = seeded_db(&standard_rows());
    let cache = Arc::new(InMemoryQueryCache::new());

    let mut multi = MultiFindOperation::new();
    multi
        .with_connection(&conn)
        .with_cache(cache.clone())
        .by_name("Individual")
        .limit(1);
    assert_eq!(multi.do_operation().unwrap().len(), 1);

    let mut single = SingleFindOperation::new();
    single
        .with_connection(&conn)
        .with_cache(cache.clone())
        .by_name("Individual");
    assert!(single.do_operation().unwrap().is_some());

    assert_eq!(cache.len(), 2);
    assert_eq!(cache.stats().hits, 0);
}

struct FailingCache;

impl QueryCache for FailingCache {
    fn get(&self, _key: &QueryFingerprint) -> CacheResult<Option<String>> {
        Err(CacheError::Unavailable("backend offline".to_string()))
    }

    fn set(&self, _key: &QueryFingerprint, _payload: String) -> CacheResult<()> {
        Ok(())
    }

    fn flush(&self) -> CacheResult<()> {
        Ok(())
    }
}

#[test]
fn cache_failures_surface_unchanged() {
    let conn = seeded_db(&standard_rows());
    let mut op = MultiFindOperation::new();
    op.with_connection(&conn).with_cache(Arc::new(FailingCache));

    let err = op.do_operation().unwrap_err();
    assert!(matches!(
        err,
        OperationError::Cache(CacheError::Unavailable(_))
    ));
}
