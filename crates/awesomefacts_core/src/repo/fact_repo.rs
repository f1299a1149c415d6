//! Fact repository contract shared by every storage backend.
//!
//! # Responsibility
//! - Define the five CRUD operations every backend implements identically.
//! - Define the storage fault type surfaced by backends.
//!
//! # Invariants
//! - A missing id is a return value (`None` / `false`), never a `RepoError`.
//! - Misses on update/delete perform no write.
//! - `RepoError` means the storage medium failed and the call was aborted.

use crate::db::DbError;
use crate::model::fact::{Fact, FactDraft, FactId};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub type RepoResult<T> = Result<T, RepoError>;

/// Storage fault raised by a backend.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Serialize(serde_json::Error),
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::Io { path, source } => {
                write!(f, "facts file `{}` i/o failed: {source}", path.display())
            }
            Self::Serialize(err) => write!(f, "failed to serialize facts: {err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted fact data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Io { source, .. } => Some(source),
            Self::Serialize(err) => Some(err),
            Self::InvalidData(_) => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

impl From<serde_json::Error> for RepoError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serialize(value)
    }
}

/// Repository interface for fact CRUD operations.
///
/// Reads borrow the backend; writes need exclusive access because each
/// backend instance owns its in-memory or connection state.
pub trait FactRepository {
    /// Returns every stored fact in backend-natural order.
    fn list_facts(&self) -> RepoResult<Vec<Fact>>;

    /// Returns the fact with `id`, or `None` when it does not exist.
    fn get_fact(&self, id: FactId) -> RepoResult<Option<Fact>>;

    /// Assigns a fresh id and creation time, persists, returns the stored fact.
    fn create_fact(&mut self, draft: &FactDraft) -> RepoResult<Fact>;

    /// Overwrites text/category/verification of an existing fact.
    ///
    /// Returns `None` without writing when `id` does not exist.
    fn update_fact(&mut self, id: FactId, draft: &FactDraft) -> RepoResult<Option<Fact>>;

    /// Permanently removes a fact. Returns `false` without writing on a miss.
    fn delete_fact(&mut self, id: FactId) -> RepoResult<bool>;
}
