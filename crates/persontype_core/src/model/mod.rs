//! Domain model for the PersonType catalog.
//!
//! # Responsibility
//! - Define the data-transfer object handed to operation callers.
//! - Define the raw row shape shared by storage reads and the query cache.
//!
//! # Invariants
//! - Every person type is identified by a positive integer primary key.
//! - Row to DTO conversion is pure and preserves list order.

pub mod person_type;
