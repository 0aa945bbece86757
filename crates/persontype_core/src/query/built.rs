//! Built SQL statements and cache fingerprints.

use rusqlite::types::Value;
use std::fmt::{Display, Formatter, Write};

/// Fetch shape a cache entry belongs to.
///
/// The same filter read as one row or as all rows must not share an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CacheScope {
    One,
    All,
}

impl CacheScope {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::One => "one",
            Self::All => "all",
        }
    }
}

/// SQL text plus positional bind values, ready for execution.
#[derive(Debug, Clone, PartialEq)]
pub struct BuiltQuery {
    sql: String,
    params: Vec<Value>,
}

impl BuiltQuery {
    pub(crate) fn new(sql: String, params: Vec<Value>) -> Self {
        Self { sql, params }
    }

    pub fn sql(&self) -> &str {
        &self.sql
    }

    pub fn params(&self) -> &[Value] {
        &self.params
    }

    /// Derives the deterministic cache key for this statement.
    ///
    /// Text parameters are length-prefixed so that values containing the
    /// separator cannot collide with a different parameter list.
    pub fn fingerprint(&self, scope: CacheScope) -> QueryFingerprint {
        let mut key = format!("person_types:{}:{}", scope.as_str(), self.sql);
        for param in &self.params {
            key.push('|');
            write_tagged_value(&mut key, param);
        }
        QueryFingerprint(key)
    }
}

/// Cache key derived from a built query.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct QueryFingerprint(String);

impl QueryFingerprint {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for QueryFingerprint {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

fn write_tagged_value(out: &mut String, value: &Value) {
    // Writing into a String cannot fail.
    let _ = match value {
        Value::Null => write!(out, "n"),
        Value::Integer(int) => write!(out, "i:{int}"),
        Value::Real(real) => write!(out, "r:{real:?}"),
        Value::Text(text) => write!(out, "t:{}:{text}", text.len()),
        Value::Blob(bytes) => {
            out.push_str("b:");
            bytes
                .iter()
                .try_for_each(|byte| write!(out, "{byte:02x}"))
        }
    };
}
