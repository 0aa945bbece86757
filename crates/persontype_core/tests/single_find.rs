mod common;

use common::{seeded_db, standard_rows};
use persontype_core::cache::store_rows;
use persontype_core::db::open_db_in_memory;
use persontype_core::{
    CacheScope, InMemoryQueryCache, OperationError, OperationEvent, PersonType, PersonTypeQuery,
    PersonTypeRow, QueryCache, SingleFindOperation, SortDirection, DO_FIND_EVENT,
};
use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

#[test]
fn finds_one_by_id() {
    let conn = seeded_db(&standard_rows());
    let mut op = SingleFindOperation::new();
    op.with_connection(&conn).by_id(2);

    assert_eq!(
        op.do_operation().unwrap(),
        Some(PersonType::new(2, "Legal"))
    );
}

#[test]
fn first_match_follows_sort_order() {
    let conn = seeded_db(&standard_rows());
    let mut op = SingleFindOperation::new();
    op.with_connection(&conn)
        .by_name("Individual")
        .sort_by_id(SortDirection::Desc);

    assert_eq!(
        op.do_operation().unwrap(),
        Some(PersonType::new(3, "Individual"))
    );
}

#[test]
fn empty_table_yields_none_without_cache_write_or_event() {
    let conn = open_db_in_memory().unwrap();
    let cache = Arc::new(InMemoryQueryCache::new());
    let fired = Rc::new(RefCell::new(0));
    let counter = Rc::clone(&fired);

    let mut op = SingleFindOperation::new();
    op.with_connection(&conn)
        .with_cache(cache.clone())
        .by_id(1)
        .on(
            DO_FIND_EVENT,
            move |_| *counter.borrow_mut() += 1,
            None,
            true,
        );

    assert_eq!(op.do_operation().unwrap(), None);
    assert!(cache.is_empty());
    assert_eq!(*fired.borrow(), 0);
}

#[test]
fn found_entity_fires_event_with_remaining_rows() {
    let conn = seeded_db(&standard_rows());
    let seen = Rc::new(RefCell::new(None));
    let sink = Rc::clone(&seen);

    let mut op = SingleFindOperation::new();
    op.with_connection(&conn).by_id(1).on(
        DO_FIND_EVENT,
        move |ctx| {
            if let OperationEvent::Find(event) = ctx.event {
                *sink.borrow_mut() = Some(event.dto_list.clone());
            }
        },
        None,
        true,
    );

    assert!(op.do_operation().unwrap().is_some());
    assert_eq!(*seen.borrow(), Some(Vec::new()));
}

#[test]
fn cached_entry_with_extra_rows_returns_first_and_announces_rest() {
    let conn = open_db_in_memory().unwrap();
    let cache: Arc<dyn QueryCache> = Arc::new(InMemoryQueryCache::new());

    let mut query = PersonTypeQuery::new();
    query.by_name("Individual").limit(1);
    let key = query.build_select().fingerprint(CacheScope::One);
    store_rows(
        &*cache,
        &key,
        &[
            PersonTypeRow::new(1, "Individual"),
            PersonTypeRow::new(2, "Individual"),
        ],
    )
    .unwrap();

    let seen = Rc::new(RefCell::new(None));
    let sink = Rc::clone(&seen);
    let mut op = SingleFindOperation::new();
    op.with_connection(&conn)
        .with_cache(cache)
        .by_name("Individual")
        .on(
            DO_FIND_EVENT,
            move |ctx| {
                if let OperationEvent::Find(event) = ctx.event {
                    *sink.borrow_mut() = Some(event.dto_list.clone());
                }
            },
            None,
            true,
        );

    assert_eq!(
        op.do_operation().unwrap(),
        Some(PersonType::new(1, "Individual"))
    );
    assert_eq!(
        *seen.borrow(),
        Some(vec![PersonType::new(2, "Individual")])
    );
}

#[test]
fn repeated_lookup_is_served_from_cache() {
    let conn = seeded_db(&standard_rows());
    let cache = Arc::new(InMemoryQueryCache::new());

    let lookup = |cache: &Arc<InMemoryQueryCache>| {
        let mut op = SingleFindOperation::new();
        op.with_connection(&conn)
            .with_cache(cache.clone() as Arc<dyn QueryCache>)
            .by_name("Legal");
        op.do_operation().unwrap()
    };

    assert_eq!(lookup(&cache), Some(PersonType::new(2, "Legal")));
    conn.execute("UPDATE person_types SET name = 'Renamed' WHERE id = 2", [])
        .unwrap();
    assert_eq!(lookup(&cache), Some(PersonType::new(2, "Legal")));

    let stats = cache.stats();
    assert_eq!(stats.hits, 1);
    assert_eq!(stats.writes, 1);
}

#[test]
fn missing_connection_is_misconfigured() {
    let mut op = SingleFindOperation::new();
    op.by_id(1);
    let err = op.do_operation().unwrap_err();
    assert!(matches!(err, OperationError::Misconfigured(_)));
}
