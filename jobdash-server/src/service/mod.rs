//! Service Module
//!
//! Business logic layer for the dashboard server.
//! Services load the job board from the repository, apply an operation,
//! and persist the changed record.

pub mod job;

// Re-export for convenience
pub use job as job_service;
