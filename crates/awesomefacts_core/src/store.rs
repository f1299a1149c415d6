//! Backend selection from startup configuration.
//!
//! # Responsibility
//! - Describe which storage backend to open and where.
//! - Expose the chosen backend as one tagged type implementing the
//!   repository contract.
//!
//! # Invariants
//! - The variant is fixed at construction; callers never inspect it to
//!   decide behavior.

use crate::model::fact::{Fact, FactDraft, FactId};
use crate::repo::fact_repo::{FactRepository, RepoResult};
use crate::repo::json_repo::JsonFactRepository;
use crate::repo::sqlite_repo::SqliteFactRepository;
use log::info;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Storage backend family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageKind {
    Json,
    Sqlite,
}

impl StorageKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Sqlite => "sqlite",
        }
    }

    /// File name used when no explicit data path is configured.
    pub fn default_file_name(self) -> &'static str {
        match self {
            Self::Json => "facts.json",
            Self::Sqlite => "facts.db",
        }
    }
}

impl Display for StorageKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StorageKind {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "sqlite" => Ok(Self::Sqlite),
            other => Err(format!(
                "unsupported storage backend `{other}`; expected json|sqlite"
            )),
        }
    }
}

/// Which backend to open and the file it persists to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageConfig {
    Json { path: PathBuf },
    Sqlite { path: PathBuf },
}

impl StorageConfig {
    pub fn new(kind: StorageKind, path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        match kind {
            StorageKind::Json => Self::Json { path },
            StorageKind::Sqlite => Self::Sqlite { path },
        }
    }

    pub fn kind(&self) -> StorageKind {
        match self {
            Self::Json { .. } => StorageKind::Json,
            Self::Sqlite { .. } => StorageKind::Sqlite,
        }
    }

    pub fn path(&self) -> &Path {
        match self {
            Self::Json { path } | Self::Sqlite { path } => path,
        }
    }
}

/// The configured storage backend.
#[derive(Debug)]
pub enum FactStore {
    Json(JsonFactRepository),
    Sqlite(SqliteFactRepository),
}

impl FactStore {
    /// Opens the backend described by `config`.
    pub fn open(config: &StorageConfig) -> RepoResult<Self> {
        let store = match config {
            StorageConfig::Json { path } => Self::Json(JsonFactRepository::open(path.clone())?),
            StorageConfig::Sqlite { path } => Self::Sqlite(SqliteFactRepository::open(path)?),
        };
        info!(
            "event=store_open module=store status=ok backend={} path={}",
            config.kind(),
            config.path().display()
        );
        Ok(store)
    }

    pub fn kind(&self) -> StorageKind {
        match self {
            Self::Json(_) => StorageKind::Json,
            Self::Sqlite(_) => StorageKind::Sqlite,
        }
    }
}

impl FactRepository for FactStore {
    fn list_facts(&self) -> RepoResult<Vec<Fact>> {
        match self {
            Self::Json(repo) => repo.list_facts(),
            Self::Sqlite(repo) => repo.list_facts(),
        }
    }

    fn get_fact(&self, id: FactId) -> RepoResult<Option<Fact>> {
        match self {
            Self::Json(repo) => repo.get_fact(id),
            Self::Sqlite(repo) => repo.get_fact(id),
        }
    }

    fn create_fact(&mut self, draft: &FactDraft) -> RepoResult<Fact> {
        match self {
            Self::Json(repo) => repo.create_fact(draft),
            Self::Sqlite(repo) => repo.create_fact(draft),
        }
    }

    fn update_fact(&mut self, id: FactId, draft: &FactDraft) -> RepoResult<Option<Fact>> {
        match self {
            Self::Json(repo) => repo.update_fact(id, draft),
            Self::Sqlite(repo) => repo.update_fact(id, draft),
        }
    }

    fn delete_fact(&mut self, id: FactId) -> RepoResult<bool> {
        match self {
            Self::Json(repo) => repo.delete_fact(id),
            Self::Sqlite(repo) => repo.delete_fact(id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{StorageConfig, StorageKind};

    #[test]
    fn storage_kind_parses_case_insensitively() {
        assert_eq!(" JSON ".parse::<StorageKind>().unwrap(), StorageKind::Json);
        assert_eq!("Sqlite".parse::<StorageKind>().unwrap(), StorageKind::Sqlite);

        let error = "postgres".parse::<StorageKind>().unwrap_err();
        assert!(error.contains("json|sqlite"));
    }

    #[test]
    fn storage_config_keeps_kind_and_path() {
        let config = StorageConfig::new(StorageKind::Sqlite, "/tmp/facts.db");
        assert_eq!(config.kind(), StorageKind::Sqlite);
        assert_eq!(config.path().to_str(), Some("/tmp/facts.db"));
    }
}
