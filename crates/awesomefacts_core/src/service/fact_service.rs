//! Fact use-case service.
//!
//! # Responsibility
//! - Provide stable CRUD entry points for boundary layers.
//! - Delegate persistence to the configured repository.
//!
//! # Invariants
//! - Service APIs have the same contracts as `FactRepository`.
//! - Service layer remains storage-agnostic.

use crate::model::fact::{Fact, FactDraft, FactId};
use crate::repo::fact_repo::{FactRepository, RepoResult};

/// Use-case service wrapper for fact CRUD operations.
pub struct FactService<R: FactRepository> {
    repo: R,
}

impl<R: FactRepository> FactService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub fn repository(&self) -> &R {
        &self.repo
    }

    /// Lists every stored fact.
    pub fn list_facts(&self) -> RepoResult<Vec<Fact>> {
        self.repo.list_facts()
    }

    /// Gets one fact by ID; `None` when it does not exist.
    pub fn get_fact(&self, id: FactId) -> RepoResult<Option<Fact>> {
        self.repo.get_fact(id)
    }

    /// Creates a fact; id and creation time come from the repository.
    pub fn create_fact(&mut self, draft: &FactDraft) -> RepoResult<Fact> {
        self.repo.create_fact(draft)
    }

    /// Updates an existing fact; `None` when it does not exist.
    pub fn update_fact(&mut self, id: FactId, draft: &FactDraft) -> RepoResult<Option<Fact>> {
        self.repo.update_fact(id, draft)
    }

    /// Deletes a fact; `false` when it does not exist.
    pub fn delete_fact(&mut self, id: FactId) -> RepoResult<bool> {
        self.repo.delete_fact(id)
    }
}
