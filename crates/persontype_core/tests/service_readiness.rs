mod common;

use common::{seeded_db, standard_rows};
use persontype_core::db::migrations::latest_version;
use persontype_core::{
    CoreConfig, InMemoryQueryCache, OperationError, OperationOutcome, PersonType, PersonTypeService,
    SortDirection,
};
use rusqlite::Connection;
use std::sync::Arc;

#[test]
fn unmigrated_connection_is_rejected() {
    let conn = Connection::open_in_memory().unwrap();
    let err = PersonTypeService::try_new(&conn).err().unwrap();
    match err {
        OperationError::UninitializedConnection {
            expected_version,
            actual_version,
        } => {
            assert_eq!(expected_version, latest_version());
            assert_eq!(actual_version, 0);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn missing_table_is_reported() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(&format!("PRAGMA user_version = {};", latest_version()))
        .unwrap();
    let err = PersonTypeService::try_new(&conn).err().unwrap();
    assert!(matches!(err, OperationError::MissingRequiredTable("person_types")));
}

#[test]
fn missing_column_is_reported() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(&format!(
        "CREATE TABLE person_types (id INTEGER PRIMARY KEY);
         PRAGMA user_version = {};",
        latest_version()
    ))
    .unwrap();
    let err = PersonTypeService::try_new(&conn).err().unwrap();
    assert!(matches!(
        err,
        OperationError::MissingRequiredColumn {
            table: "person_types",
            column: "name"
        }
    ));
}

#[test]
fn operations_share_the_service_cache() {
    let conn = seeded_db(&standard_rows());
    let cache = Arc::new(InMemoryQueryCache::new());
    let service = PersonTypeService::try_new(&conn)
        .unwrap()
        .with_cache(cache.clone());

    let mut find = service.multi_find();
    find.sort_by_id(SortDirection::Asc);
    assert_eq!(find.do_operation().unwrap().len(), 3);
    assert_eq!(cache.len(), 1);

    let mut delete = service.multi_delete();
    delete.by_id(1);
    assert_eq!(delete.do_operation().unwrap().affected_rows(), 1);
    assert!(cache.is_empty());

    let mut single = service.single_find();
    single.by_id(2);
    assert_eq!(
        single.do_operation().unwrap(),
        Some(PersonType::new(2, "Legal"))
    );
}

#[test]
fn config_opens_ready_database() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("configured.db");
    let config = CoreConfig::from_json_str(&format!(
        r#"{{ "database": {{ "mode": "file", "path": {} }} }}"#,
        serde_json::to_string(&path).unwrap()
    ))
    .unwrap();

    let conn = config.open_database().unwrap();
    let service = PersonTypeService::try_new(&conn).unwrap();
    assert!(service.cache().is_none());
    assert!(service.multi_find().do_operation().unwrap().is_empty());
}
