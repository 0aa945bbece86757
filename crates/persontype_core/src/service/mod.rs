//! Core use-case services.
//!
//! # Responsibility
//! - Replace framework object factories with explicit construction.
//! - Keep CLI callers decoupled from operation wiring.

pub mod person_type_service;
