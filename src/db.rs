// src/db.rs
use std::time::Duration;

use sqlx::postgres::PgPoolOptions;
use sqlx::{Pool, Postgres};

use crate::config::DatabaseConfig;

const SCHEMA: [&str; 5] = [
    r#"
    CREATE TABLE IF NOT EXISTS tokens (
        token TEXT PRIMARY KEY,
        used_intention BOOLEAN NOT NULL DEFAULT FALSE,
        used_rejection BOOLEAN NOT NULL DEFAULT FALSE
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS intention_votes (
        id BIGSERIAL PRIMARY KEY,
        candidate TEXT NOT NULL,
        token TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS rejection_votes (
        id BIGSERIAL PRIMARY KEY,
        candidate TEXT NOT NULL,
        token TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS configuration (
        id INTEGER PRIMARY KEY CHECK (id = 1),
        display_real BOOLEAN NOT NULL DEFAULT TRUE,
        favored_candidate TEXT,
        updated_at TIMESTAMPTZ
    )
    "#,
    r#"
    INSERT INTO configuration (id, display_real, favored_candidate, updated_at)
    VALUES (1, TRUE, NULL, NULL)
    ON CONFLICT (id) DO NOTHING
    "#,
];

pub async fn create_pool(config: &DatabaseConfig) -> Result<Pool<Postgres>, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
        .connect(&config.url)
        .await
}

/// Creates the poll tables if missing and seeds the configuration row.
pub async fn bootstrap_schema(pool: &Pool<Postgres>) -> Result<(), sqlx::Error> {
    for statement in SCHEMA {
        sqlx::query(statement).execute(pool).await?;
    }
    tracing::info!("database schema ready");
    Ok(())
}
