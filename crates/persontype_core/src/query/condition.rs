//! WHERE-clause predicates and comparison operators.

use super::{QueryError, QueryResult};
use rusqlite::types::Value;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Comparison operator accepted by `by_id_with` / `by_name_with`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CompareOp {
    #[default]
    Eq,
    NotEq,
    Lt,
    Lte,
    Gt,
    Gte,
    Like,
    NotLike,
}

impl CompareOp {
    /// Parses a SQL-style operator string such as `=`, `<>` or `not like`.
    pub fn parse(value: &str) -> QueryResult<Self> {
        let normalized = value.split_whitespace().collect::<Vec<_>>().join(" ");
        match normalized.to_ascii_uppercase().as_str() {
            "=" | "==" => Ok(Self::Eq),
            "!=" | "<>" => Ok(Self::NotEq),
            "<" => Ok(Self::Lt),
            "<=" => Ok(Self::Lte),
            ">" => Ok(Self::Gt),
            ">=" => Ok(Self::Gte),
            "LIKE" => Ok(Self::Like),
            "NOT LIKE" => Ok(Self::NotLike),
            _ => Err(QueryError::UnsupportedOperator(value.to_string())),
        }
    }

    pub fn as_sql(self) -> &'static str {
        match self {
            Self::Eq => "=",
            Self::NotEq => "<>",
            Self::Lt => "<",
            Self::Lte => "<=",
            Self::Gt => ">",
            Self::Gte => ">=",
            Self::Like => "LIKE",
            Self::NotLike => "NOT LIKE",
        }
    }
}

impl FromStr for CompareOp {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Display for CompareOp {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_sql())
    }
}

/// One predicate of the conjunctive WHERE clause.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Condition {
    Compare {
        column: &'static str,
        op: CompareOp,
        value: Value,
    },
    InIntegers {
        column: &'static str,
        values: Vec<i64>,
    },
}

impl Condition {
    /// Appends this predicate to `sql` and its bind values to `params`.
    pub(crate) fn write_sql(&self, sql: &mut String, params: &mut Vec<Value>) {
        match self {
            Self::Compare { column, op, value } => {
                sql.push_str(column);
                sql.push(' ');
                sql.push_str(op.as_sql());
                sql.push_str(" ?");
                params.push(value.clone());
            }
            // Empty IN-list matches nothing.
            Self::InIntegers { values, .. } if values.is_empty() => sql.push_str("1 = 0"),
            Self::InIntegers { column, values } => {
                sql.push_str(column);
                sql.push_str(" IN (");
                for (index, value) in values.iter().enumerate() {
                    if index > 0 {
                        sql.push_str(", ");
                    }
                    sql.push('?');
                    params.push(Value::Integer(*value));
                }
                sql.push(')');
            }
        }
    }
}

/// Writes `conditions` joined by `AND` after a ` WHERE ` keyword.
pub(crate) fn write_where(conditions: &[Condition], sql: &mut String, params: &mut Vec<Value>) {
    for (index, condition) in conditions.iter().enumerate() {
        sql.push_str(if index == 0 { " WHERE " } else { " AND " });
        condition.write_sql(sql, params);
    }
}

#[cfg(test)]
mod tests {
    use super::{write_where, CompareOp, Condition};
    use crate::query::QueryError;
    use rusqlite::types::Value;

    #[test]
    fn parse_accepts_known_operators_case_insensitively() {
        assert_eq!(CompareOp::parse("=").unwrap(), CompareOp::Eq);
        assert_eq!(CompareOp::parse("<>").unwrap(), CompareOp::NotEq);
        assert_eq!(CompareOp::parse("!=").unwrap(), CompareOp::NotEq);
        assert_eq!(CompareOp::parse("like").unwrap(), CompareOp::Like);
        assert_eq!(CompareOp::parse(" not   LIKE ").unwrap(), CompareOp::NotLike);
    }

    #[test]
    fn parse_rejects_unknown_operator() {
        let err = CompareOp::parse("~=").unwrap_err();
        assert_eq!(err, QueryError::UnsupportedOperator("~=".to_string()));
    }

    #[test]
    fn empty_in_list_renders_always_false() {
        let mut sql = String::new();
        let mut params = Vec::new();
        write_where(
            &[Condition::InIntegers {
                column: "id",
                values: Vec::new(),
            }],
            &mut sql,
            &mut params,
        );
        assert_eq!(sql, " WHERE 1 = 0");
        assert!(params.is_empty());
    }

    #[test]
    fn conditions_join_with_and() {
        let mut sql = String::new();
        let mut params = Vec::new();
        write_where(
            &[
                Condition::Compare {
                    column: "id",
                    op: CompareOp::Gt,
                    value: Value::Integer(1),
                },
                Condition::InIntegers {
                    column: "id",
                    values: vec![2, 3],
                },
            ],
            &mut sql,
            &mut params,
        );
        assert_eq!(sql, " WHERE id > ? AND id IN (?, ?)");
        assert_eq!(
            params,
            vec![Value::Integer(1), Value::Integer(2), Value::Integer(3)]
        );
    }
}
