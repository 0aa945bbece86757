//! Person type data access: query building, cached find operations,
//! bulk delete and operation events over SQLite.

pub mod cache;
pub mod config;
pub mod db;
pub mod event;
pub mod logging;
pub mod model;
pub mod operation;
pub mod query;
pub mod service;

pub use cache::{CacheError, CacheLookup, CacheResult, CacheStats, InMemoryQueryCache, QueryCache};
pub use config::{ConfigError, ConfigResult, CoreConfig, DatabaseConfig};
pub use db::{open_db, open_db_in_memory, DbError, DbResult};
pub use event::{
    EventContext, EventDispatcher, OperationEvent, DO_DELETE_EVENT, DO_FIND_EVENT,
};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::person_type::{
    PersonType, PersonTypeId, PersonTypeRow, PersonTypeValidationError,
};
pub use operation::{
    DeleteOperationResult, DeleteResultSnapshot, MultiDeleteOperation, MultiFindOperation,
    OperationError, OperationOutcome, OperationResult, SingleFindOperation,
};
pub use query::{
    CacheScope, CompareOp, PersonTypeField, PersonTypeQuery, QueryError, QueryResult,
    SortDirection,
};
pub use service::person_type_service::PersonTypeService;

/// Health check used by the CLI.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
