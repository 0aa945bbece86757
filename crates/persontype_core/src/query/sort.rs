//! ORDER BY fields and directions.

use super::{QueryError, QueryResult};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Sortable `person_types` columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PersonTypeField {
    Id,
    Name,
}

impl PersonTypeField {
    pub fn column(self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::Name => "name",
        }
    }

    /// Parses a column name; unknown names are rejected instead of being
    /// passed through into SQL.
    pub fn parse(value: &str) -> QueryResult<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "id" => Ok(Self::Id),
            "name" => Ok(Self::Name),
            _ => Err(QueryError::UnknownField(value.to_string())),
        }
    }
}

impl FromStr for PersonTypeField {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Display for PersonTypeField {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.column())
    }
}

/// Sort direction. Defaults to `Desc`, matching the generic `sort_by`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

impl SortDirection {
    pub fn parse(value: &str) -> QueryResult<Self> {
        match value.trim().to_ascii_uppercase().as_str() {
            "ASC" => Ok(Self::Asc),
            "DESC" => Ok(Self::Desc),
            _ => Err(QueryError::InvalidSortDirection(value.to_string())),
        }
    }

    pub fn as_sql(self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

impl FromStr for SortDirection {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Display for SortDirection {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_sql())
    }
}
