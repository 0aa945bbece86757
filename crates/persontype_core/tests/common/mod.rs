#![allow(dead_code)]

use persontype_core::db::open_db_in_memory;
use rusqlite::{params, Connection};

/// In-memory database seeded with `(id, name)` rows.
pub fn seeded_db(rows: &[(i64, &str)]) -> Connection {
    let conn = open_db_in_memory().unwrap();
    for (id, name) in rows {
        insert(&conn, *id, name);
    }
    conn
}

pub fn insert(conn: &Connection, id: i64, name: &str) {
    conn.execute(
        "INSERT INTO person_types (id, name) VALUES (?1, ?2)",
        params![id, name],
    )
    .unwrap();
}

pub fn count_rows(conn: &Connection) -> i64 {
    conn.query_row("SELECT COUNT(*) FROM person_types", [], |row| row.get(0))
        .unwrap()
}

pub fn standard_rows() -> Vec<(i64, &'static str)> {
    vec![(1, "Individual"), (2, "Legal"), (3, "Individual")]
}
