//! Core domain logic for AwesomeFacts.
//! Owns the fact model, both storage backends and the service seam used by
//! the HTTP layer.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod store;

pub use logging::{default_log_level, init_logging, logging_status, LogTarget};
pub use model::fact::{Fact, FactDraft, FactId, FactValidationError};
pub use repo::fact_repo::{FactRepository, RepoError, RepoResult};
pub use repo::json_repo::JsonFactRepository;
pub use repo::sqlite_repo::SqliteFactRepository;
pub use service::fact_service::FactService;
pub use store::{FactStore, StorageConfig, StorageKind};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
