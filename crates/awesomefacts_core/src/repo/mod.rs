//! Repository contract and persistence implementations.
//!
//! # Responsibility
//! - Define the backend-agnostic fact repository contract.
//! - Keep file and SQL details out of the service and HTTP layers.
//!
//! # Invariants
//! - Both backends assign strictly increasing ids and never reuse them.
//! - Not-found is a domain outcome; `RepoError` is reserved for storage faults.

pub mod fact_repo;
pub mod json_repo;
pub mod sqlite_repo;
