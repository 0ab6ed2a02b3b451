//! Jobdash Server
//!
//! HTTP service for the job dashboard: persistence (in-memory or
//! PostgreSQL), the job service, the JSON API and the HTML dashboard.

pub mod api;
pub mod config;
pub mod db;
pub mod repository;
pub mod service;
pub mod state;

use std::sync::Arc;

use anyhow::Context;

use crate::config::Config;
use crate::repository::{InMemoryJobRepository, JobRepository, PgJobRepository};
use crate::state::AppState;

/// Build the application state for a configuration
///
/// Connects to PostgreSQL and runs migrations when a database URL is set;
/// otherwise jobs live in memory for the lifetime of the process.
pub async fn build_state(config: &Config) -> anyhow::Result<AppState> {
    let repository: Arc<dyn JobRepository> = match &config.database_url {
        Some(database_url) => {
            tracing::info!("Connecting to database...");

            let pool = db::create_pool(database_url, config.db_max_connections)
                .await
                .context("Failed to create database pool")?;

            tracing::info!("Database connection pool created");

            db::run_migrations(&pool)
                .await
                .context("Failed to run database migrations")?;

            Arc::new(PgJobRepository::new(pool))
        }
        None if config.seed_demo => {
            tracing::info!("No DATABASE_URL set, using in-memory store with demo jobs");
            Arc::new(InMemoryJobRepository::seeded())
        }
        None => {
            tracing::info!("No DATABASE_URL set, using in-memory store");
            Arc::new(InMemoryJobRepository::new())
        }
    };

    Ok(AppState::new(repository))
}
