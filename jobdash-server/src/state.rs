//! Application state shared by all handlers

use std::sync::Arc;

use tokio::sync::Mutex;

use crate::repository::{InMemoryJobRepository, JobRepository};

/// Handle to the job repository plus the process-wide write lock
///
/// Mutations load the whole board, change one record and upsert it. The
/// write lock serializes that read-modify-write within this process; writers
/// in other processes sharing the same database are last-writer-wins.
#[derive(Clone)]
pub struct AppState {
    pub repository: Arc<dyn JobRepository>,
    pub write_lock: Arc<Mutex<()>>,
}

impl AppState {
    pub fn new(repository: Arc<dyn JobRepository>) -> Self {
        Self {
            repository,
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    /// State backed by an empty in-memory repository
    pub fn in_memory() -> Self {
        Self::new(Arc::new(InMemoryJobRepository::new()))
    }
}
