//! Find/delete command objects over `person_types`.
//!
//! # Responsibility
//! - Configure a query through chained filter setters, then execute it once
//!   with `do_operation()`.
//! - Read through the optional query cache and fire lifecycle events.
//!
//! # Invariants
//! - Filter validation errors surface from the setter, before any I/O.
//! - `do_operation()` consumes the operation.
//! - Events fire after the operation's database and cache work completes.

mod base;
mod error;
mod multi_delete;
mod multi_find;
pub mod result;
mod single_find;

pub use base::FindContext;
pub use error::{OperationError, OperationResult};
pub use multi_delete::MultiDeleteOperation;
pub use multi_find::MultiFindOperation;
pub use result::{DeleteOperationResult, DeleteResultSnapshot, OperationOutcome};
pub use single_find::SingleFindOperation;
