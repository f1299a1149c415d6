//! Shared handler state.
//!
//! # Invariants
//! - One `FactService` per process, shared by every request.
//! - Storage calls never run on the async executor threads.

use crate::error::ApiError;
use awesomefacts_core::{FactRepository, FactService, RepoResult};
use std::sync::{Arc, Mutex};

/// Service handle cloned into every request.
///
/// Backends take `&mut self` for writes, so calls are serialized through the
/// mutex; the core itself holds no locks.
pub struct AppState<R: FactRepository> {
    service: Arc<Mutex<FactService<R>>>,
}

impl<R: FactRepository> Clone for AppState<R> {
    fn clone(&self) -> Self {
        Self {
            service: Arc::clone(&self.service),
        }
    }
}

impl<R> AppState<R>
where
    R: FactRepository + Send + 'static,
{
    pub fn new(service: FactService<R>) -> Self {
        Self {
            service: Arc::new(Mutex::new(service)),
        }
    }

    /// Runs one service operation on the blocking pool.
    pub async fn call<T, F>(&self, operation: F) -> Result<T, ApiError>
    where
        T: Send + 'static,
        F: FnOnce(&mut FactService<R>) -> RepoResult<T> + Send + 'static,
    {
        let service = Arc::clone(&self.service);
        tokio::task::spawn_blocking(move || {
            let mut guard = service
                .lock()
                .map_err(|_| ApiError::Internal("fact service lock poisoned".to_string()))?;
            operation(&mut *guard).map_err(ApiError::from)
        })
        .await
        .map_err(|err| ApiError::Internal(format!("storage task failed: {err}")))?
    }
}
