//! Result objects returned by the delete operation.

use serde::Serialize;

/// Contract for the result prototype of [`MultiDeleteOperation`].
///
/// The operation clones its prototype for every run and fills in the
/// outcome, so callers can return their own shape by supplying a prototype
/// that implements this trait.
///
/// [`MultiDeleteOperation`]: crate::operation::MultiDeleteOperation
pub trait OperationOutcome: Clone {
    fn set_affected_rows(&mut self, affected: u64);
    fn affected_rows(&self) -> u64;
    fn add_error(&mut self, message: String);
    fn errors(&self) -> &[String];

    fn is_success(&self) -> bool {
        self.errors().is_empty()
    }

    /// Captures the outcome for event handlers.
    fn snapshot(&self) -> DeleteResultSnapshot {
        DeleteResultSnapshot {
            affected_rows: self.affected_rows(),
            success: self.is_success(),
            errors: self.errors().to_vec(),
        }
    }
}

/// Default delete result.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DeleteOperationResult {
    affected_rows: u64,
    errors: Vec<String>,
}

impl DeleteOperationResult {
    pub fn new() -> Self {
        Self::default()
    }
}

impl OperationOutcome for DeleteOperationResult {
    fn set_affected_rows(&mut self, affected: u64) {
        self.affected_rows = affected;
    }

    fn affected_rows(&self) -> u64 {
        self.affected_rows
    }

    fn add_error(&mut self, message: String) {
        self.errors.push(message);
    }

    fn errors(&self) -> &[String] {
        &self.errors
    }
}

/// Shape-independent copy of a delete outcome carried by `DO_DELETE`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DeleteResultSnapshot {
    pub affected_rows: u64,
    pub success: bool,
    pub errors: Vec<String>,
}
