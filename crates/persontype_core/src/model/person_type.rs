//! PersonType domain model.
//!
//! # Responsibility
//! - Define the `PersonType` DTO returned by find operations.
//! - Define `PersonTypeRow`, the storage/cache row representation.
//!
//! # Invariants
//! - `id` is the primary key and is never reused for another person type.
//! - `name` is required and must not be blank.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Primary key of the `person_types` table.
pub type PersonTypeId = i64;

/// Data-transfer object for one person type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonType {
    /// Primary key.
    pub id: PersonTypeId,
    /// Display name, for example `Individual`.
    pub name: String,
}

/// Raw row as read from `person_types` and stored in the query cache.
///
/// Kept separate from [`PersonType`] so cached payloads stay decoupled from
/// the DTO shape exposed to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonTypeRow {
    pub id: PersonTypeId,
    pub name: String,
}

impl PersonTypeRow {
    pub fn new(id: PersonTypeId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

/// Validation errors for person type state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PersonTypeValidationError {
    InvalidId(PersonTypeId),
    EmptyName,
}

impl Display for PersonTypeValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidId(id) => write!(f, "person type id must be positive, got {id}"),
            Self::EmptyName => write!(f, "person type name cannot be empty"),
        }
    }
}

impl Error for PersonTypeValidationError {}

impl PersonType {
    pub fn new(id: PersonTypeId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }

    /// Converts one raw row into a DTO.
    pub fn from_row(row: PersonTypeRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
        }
    }

    /// Validates invariants that must hold for persisted person types.
    ///
    /// # Errors
    /// - `InvalidId` when `id <= 0`.
    /// - `EmptyName` when `name` is empty after trimming.
    pub fn validate(&self) -> Result<(), PersonTypeValidationError> {
        if self.id <= 0 {
            return Err(PersonTypeValidationError::InvalidId(self.id));
        }
        if self.name.trim().is_empty() {
            return Err(PersonTypeValidationError::EmptyName);
        }
        Ok(())
    }
}

impl From<PersonTypeRow> for PersonType {
    fn from(value: PersonTypeRow) -> Self {
        Self::from_row(value)
    }
}

/// Converts raw rows into DTOs, keeping their order.
pub fn person_type_list(rows: Vec<PersonTypeRow>) -> Vec<PersonType> {
    rows.into_iter().map(PersonType::from_row).collect()
}
