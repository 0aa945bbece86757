//! Filter-building query over the `person_types` table.
//!
//! # Responsibility
//! - Accumulate filters, sort keys and pagination for one statement.
//! - Render SELECT/DELETE SQL with positional bind values.
//!
//! # Invariants
//! - Filters compose conjunctively; calling a filter twice narrows the result.
//! - A rejected filter leaves the query unchanged.
//! - Identifiers reaching SQL text are either compile-time column names or
//!   validated passthrough identifiers; values are always bound.

mod built;
mod condition;
mod sort;

pub use built::{BuiltQuery, CacheScope, QueryFingerprint};
pub use condition::CompareOp;
pub use sort::{PersonTypeField, SortDirection};

use crate::db::PERSON_TYPES_TABLE;
use condition::{write_where, Condition};
use rusqlite::types::Value;
use std::error::Error;
use std::fmt::{Display, Formatter};

const DEFAULT_COLUMNS: &[&str] = &["id", "name"];

pub type QueryResult<T> = Result<T, QueryError>;

/// Query construction errors, raised before any I/O happens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryError {
    /// A filter value has the wrong type, e.g. a text id in an id list.
    TypeMismatch {
        field: &'static str,
        expected: &'static str,
        found: &'static str,
    },
    UnknownField(String),
    InvalidSortDirection(String),
    UnsupportedOperator(String),
    InvalidIdentifier(String),
}

impl Display for QueryError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TypeMismatch {
                field,
                expected,
                found,
            } => write!(
                f,
                "type mismatch for `{field}`: all values must be {expected}, found {found}"
            ),
            Self::UnknownField(name) => write!(f, "unknown person type field `{name}`"),
            Self::InvalidSortDirection(value) => {
                write!(f, "invalid sort direction `{value}`; expected ASC|DESC")
            }
            Self::UnsupportedOperator(value) => write!(f, "unsupported operator `{value}`"),
            Self::InvalidIdentifier(value) => write!(f, "invalid SQL identifier `{value}`"),
        }
    }
}

impl Error for QueryError {}

/// Mutable filter accumulator for one person type statement.
#[derive(Debug, Clone, PartialEq)]
pub struct PersonTypeQuery {
    columns: Vec<String>,
    table: String,
    conditions: Vec<Condition>,
    order_by: Vec<(PersonTypeField, SortDirection)>,
    limit: Option<u32>,
    offset: Option<u32>,
}

impl Default for PersonTypeQuery {
    fn default() -> Self {
        Self::new()
    }
}

impl PersonTypeQuery {
    /// Creates a query selecting `id, name` from `person_types`.
    pub fn new() -> Self {
        Self {
            columns: DEFAULT_COLUMNS.iter().map(|column| column.to_string()).collect(),
            table: PERSON_TYPES_TABLE.to_string(),
            conditions: Vec::new(),
            order_by: Vec::new(),
            limit: None,
            offset: None,
        }
    }

    /// Filters by exact id.
    pub fn by_id(&mut self, id: i64) -> &mut Self {
        self.by_id_with(id, CompareOp::Eq)
    }

    /// Filters by id using `op`.
    pub fn by_id_with(&mut self, id: i64, op: CompareOp) -> &mut Self {
        self.conditions.push(Condition::Compare {
            column: PersonTypeField::Id.column(),
            op,
            value: Value::Integer(id),
        });
        self
    }

    /// Filters by a list of ids.
    ///
    /// # Errors
    /// - `TypeMismatch` when any element is not an integer. The query is not
    ///   modified in that case.
    pub fn by_ids<I, V>(&mut self, ids: I) -> QueryResult<&mut Self>
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        let values = integer_values("id", ids)?;
        self.conditions.push(Condition::InIntegers {
            column: PersonTypeField::Id.column(),
            values,
        });
        Ok(self)
    }

    /// Filters by exact name.
    pub fn by_name(&mut self, name: impl Into<String>) -> &mut Self {
        self.by_name_with(name, CompareOp::Eq)
    }

    /// Filters by name using `op`; use `CompareOp::Like` for patterns.
    pub fn by_name_with(&mut self, name: impl Into<String>, op: CompareOp) -> &mut Self {
        self.conditions.push(Condition::Compare {
            column: PersonTypeField::Name.column(),
            op,
            value: Value::Text(name.into()),
        });
        self
    }

    /// Adds an ORDER BY key, or updates the direction of an existing one.
    pub fn sort_by(&mut self, field: PersonTypeField, direction: SortDirection) -> &mut Self {
        match self.order_by.iter_mut().find(|entry| entry.0 == field) {
            Some(entry) => entry.1 = direction,
            None => self.order_by.push((field, direction)),
        }
        self
    }

    /// String form of [`sort_by`](Self::sort_by).
    ///
    /// # Errors
    /// - `UnknownField` for columns other than `id`/`name`.
    /// - `InvalidSortDirection` for directions other than `ASC`/`DESC`.
    pub fn sort_by_str(&mut self, field: &str, direction: &str) -> QueryResult<&mut Self> {
        let field = PersonTypeField::parse(field)?;
        let direction = SortDirection::parse(direction)?;
        Ok(self.sort_by(field, direction))
    }

    /// Replaces the projection.
    ///
    /// Find operations read `id` and `name` from every row, so they reject a
    /// projection without both columns (or `*`).
    ///
    /// # Errors
    /// - `InvalidIdentifier` when any column is not a plain identifier,
    ///   `table.column` or `*`. The projection is not modified in that case.
    pub fn select<I, S>(&mut self, columns: I) -> QueryResult<&mut Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut validated = Vec::new();
        for column in columns {
            let column = column.into();
            let trimmed = column.trim();
            if trimmed != "*" && !is_qualified_identifier(trimmed) {
                return Err(QueryError::InvalidIdentifier(column));
            }
            validated.push(trimmed.to_string());
        }
        if validated.is_empty() {
            return Err(QueryError::InvalidIdentifier(String::new()));
        }
        self.columns = validated;
        Ok(self)
    }

    /// Whether the projection yields `column`, bare, table-qualified or as `*`.
    pub fn selects_column(&self, column: &str) -> bool {
        self.columns.iter().any(|selected| {
            let name = selected
                .split_once('.')
                .map_or(selected.as_str(), |(_, name)| name);
            name == "*" || name.eq_ignore_ascii_case(column)
        })
    }

    /// Replaces the source table.
    pub fn from(&mut self, table: impl Into<String>) -> QueryResult<&mut Self> {
        let table = table.into();
        if !is_identifier(table.trim()) {
            return Err(QueryError::InvalidIdentifier(table));
        }
        self.table = table.trim().to_string();
        Ok(self)
    }

    pub fn limit(&mut self, limit: u32) -> &mut Self {
        self.limit = Some(limit);
        self
    }

    pub fn offset(&mut self, offset: u32) -> &mut Self {
        self.offset = Some(offset);
        self
    }

    pub fn limit_value(&self) -> Option<u32> {
        self.limit
    }

    pub fn offset_value(&self) -> Option<u32> {
        self.offset
    }

    pub fn has_conditions(&self) -> bool {
        !self.conditions.is_empty()
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    /// Renders the SELECT statement.
    pub fn build_select(&self) -> BuiltQuery {
        let mut sql = format!("SELECT {} FROM {}", self.columns.join(", "), self.table);
        let mut params = Vec::new();
        write_where(&self.conditions, &mut sql, &mut params);

        for (index, (field, direction)) in self.order_by.iter().enumerate() {
            sql.push_str(if index == 0 { " ORDER BY " } else { ", " });
            sql.push_str(field.column());
            sql.push(' ');
            sql.push_str(direction.as_sql());
        }

        match (self.limit, self.offset) {
            (Some(limit), offset) => {
                sql.push_str(" LIMIT ?");
                params.push(Value::Integer(i64::from(limit)));
                if let Some(offset) = offset {
                    sql.push_str(" OFFSET ?");
                    params.push(Value::Integer(i64::from(offset)));
                }
            }
            (None, Some(offset)) => {
                sql.push_str(" LIMIT -1 OFFSET ?");
                params.push(Value::Integer(i64::from(offset)));
            }
            (None, None) => {}
        }

        BuiltQuery::new(sql, params)
    }

    /// Renders a DELETE statement for the accumulated filters.
    ///
    /// Projection, sort and pagination do not apply to deletes.
    pub fn build_delete(&self) -> BuiltQuery {
        let mut sql = format!("DELETE FROM {}", self.table);
        let mut params = Vec::new();
        write_where(&self.conditions, &mut sql, &mut params);
        BuiltQuery::new(sql, params)
    }
}

/// Validates that every value is an integer before anything is applied.
pub(crate) fn integer_values<I, V>(field: &'static str, ids: I) -> QueryResult<Vec<i64>>
where
    I: IntoIterator<Item = V>,
    V: Into<Value>,
{
    ids.into_iter()
        .map(|value| {
            let value: Value = value.into();
            match value {
                Value::Integer(int) => Ok(int),
                other => Err(QueryError::TypeMismatch {
                    field,
                    expected: "integer",
                    found: value_type_name(&other),
                }),
            }
        })
        .collect()
}

fn value_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Integer(_) => "integer",
        Value::Real(_) => "real",
        Value::Text(_) => "text",
        Value::Blob(_) => "blob",
    }
}

fn is_identifier(value: &str) -> bool {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {}
        _ => return false,
    }
    chars.all(|ch| ch.is_ascii_alphanumeric() || ch == '_')
}

fn is_qualified_identifier(value: &str) -> bool {
    match value.split_once('.') {
        Some((table, column)) => is_identifier(table) && is_identifier(column),
        None => is_identifier(value),
    }
}
