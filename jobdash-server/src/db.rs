use sqlx::{PgPool, postgres::PgPoolOptions};
use std::time::Duration;

pub async fn create_pool(database_url: &str, max_connections: u32) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(max_connections)
        .acquire_timeout(Duration::from_secs(5))
        .connect(database_url)
        .await
}

pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::Error> {
    // `seq` is not part of the record; it only preserves insertion order
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS jobs (
            seq BIGSERIAL NOT NULL,
            job_id BIGINT PRIMARY KEY,
            client VARCHAR(255) NOT NULL,
            job_name VARCHAR(255) NOT NULL,
            parameters TEXT[] NOT NULL DEFAULT '{}',
            status VARCHAR(50) NOT NULL,
            message TEXT NOT NULL DEFAULT '',
            executed_at TIMESTAMPTZ,
            ref_num VARCHAR(255),
            retry_count INTEGER NOT NULL DEFAULT 0
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_jobs_seq ON jobs(seq)")
        .execute(pool)
        .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_jobs_client ON jobs(client)")
        .execute(pool)
        .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_jobs_executed_at ON jobs(executed_at DESC)")
        .execute(pool)
        .await?;

    tracing::info!("Database migrations completed successfully");
    Ok(())
}
