mod common;

use common::{seeded_db, standard_rows};
use persontype_core::{
    MultiFindOperation, OperationError, PersonTypeQuery, QueryError, SingleFindOperation,
    SortDirection,
};
use rusqlite::params_from_iter;

#[test]
fn built_delete_executes_against_schema() {
    let conn = seeded_db(&standard_rows());
    let mut query = PersonTypeQuery::new();
    query.by_ids([1_i64, 3]).unwrap().by_name("Individual");

    let built = query.build_delete();
    let affected = conn
        .execute(built.sql(), params_from_iter(built.params()))
        .unwrap();
    assert_eq!(affected, 2);
}

#[test]
fn query_prototype_keeps_preset_filters() {
    let conn = seeded_db(&standard_rows());
    let mut prototype = PersonTypeQuery::new();
    prototype.by_name("Individual");

    let mut op = MultiFindOperation::new();
    op.with_query(prototype)
        .with_connection(&conn)
        .sort_by_id(SortDirection::Asc);
    let ids: Vec<i64> = op
        .do_operation()
        .unwrap()
        .into_iter()
        .map(|item| item.id)
        .collect();
    assert_eq!(ids, vec![1, 3]);
}

#[test]
fn string_sort_keys_are_validated() {
    let mut query = PersonTypeQuery::new();
    query.sort_by_str("name", "asc").unwrap();
    assert!(matches!(
        query.sort_by_str("name", "sideways"),
        Err(QueryError::InvalidSortDirection(_))
    ));
    assert_eq!(
        query.build_select().sql(),
        "SELECT id, name FROM person_types ORDER BY name ASC"
    );
}

#[test]
fn single_find_forces_one_row_limit() {
    let conn = seeded_db(&standard_rows());
    let mut prototype = PersonTypeQuery::new();
    prototype.limit(50);

    let mut op = SingleFindOperation::new();
    op.with_query(prototype)
        .with_connection(&conn)
        .sort_by_id(SortDirection::Asc);
    assert_eq!(op.query().limit_value(), Some(50));
    assert_eq!(op.do_operation().unwrap().map(|item| item.id), Some(1));
}

#[test]
fn finds_reject_projection_without_id_and_name() {
    let conn = seeded_db(&standard_rows());
    let mut prototype = PersonTypeQuery::new();
    prototype.select(["id"]).unwrap();

    let mut multi = MultiFindOperation::new();
    multi.with_query(prototype.clone()).with_connection(&conn);
    assert!(matches!(
        multi.do_operation().unwrap_err(),
        OperationError::Misconfigured("projection must include id and name")
    ));

    let mut single = SingleFindOperation::new();
    single.with_query(prototype).with_connection(&conn);
    assert!(matches!(
        single.do_operation().unwrap_err(),
        OperationError::Misconfigured(_)
    ));

    let mut star = PersonTypeQuery::new();
    star.select(["*"]).unwrap();
    let mut op = MultiFindOperation::new();
    op.with_query(star).with_connection(&conn);
    assert_eq!(op.do_operation().unwrap().len(), 3);
}
