use sqlx::{PgPool, postgres::PgPoolOptions};

use crate::config::ServerConfig;

pub async fn create_pool(config: &ServerConfig) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(config.acquire_timeout)
        .connect(&config.database_url)
        .await
}

/// Create the release-management tables when they do not exist yet
///
/// The dashboard never writes to these tables. This only exists so a fresh
/// development or test database has something to read from.
pub async fn bootstrap_schema(pool: &PgPool) -> Result<(), sqlx::Error> {
    let lookup_tables = [
        "release_paths",
        "release_statuses",
        "stage_types",
        "environments",
        "step_types",
        "step_statuses",
    ];
    for table in lookup_tables {
        sqlx::query(&format!(
            "CREATE TABLE IF NOT EXISTS {table} (
                id INTEGER PRIMARY KEY,
                name VARCHAR(255) NOT NULL
            )"
        ))
        .execute(pool)
        .await?;
    }

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS stages (
            id INTEGER PRIMARY KEY,
            stage_type_id INTEGER NOT NULL REFERENCES stage_types(id),
            environment_id INTEGER NOT NULL REFERENCES environments(id),
            rank INTEGER NOT NULL,
            is_deleted BOOLEAN NOT NULL DEFAULT FALSE
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS releases (
            id INTEGER PRIMARY KEY,
            name VARCHAR(255) NOT NULL,
            status_id INTEGER NOT NULL REFERENCES release_statuses(id),
            created_on TIMESTAMPTZ NOT NULL,
            target_stage_id INTEGER NOT NULL,
            release_path_id INTEGER NOT NULL REFERENCES release_paths(id)
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS release_stage_workflows (
            id SERIAL PRIMARY KEY,
            release_id INTEGER NOT NULL REFERENCES releases(id) ON DELETE CASCADE,
            stage_id INTEGER NOT NULL REFERENCES stages(id)
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS release_steps (
            id INTEGER PRIMARY KEY,
            step_type_id INTEGER NOT NULL REFERENCES step_types(id),
            status_id INTEGER NOT NULL REFERENCES step_statuses(id),
            release_id INTEGER NOT NULL REFERENCES releases(id) ON DELETE CASCADE,
            stage_id INTEGER NOT NULL REFERENCES stages(id),
            step_rank INTEGER NOT NULL,
            trial_number INTEGER NOT NULL DEFAULT 1,
            created_on TIMESTAMPTZ NOT NULL,
            modified_on TIMESTAMPTZ NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_releases_created_on ON releases(created_on DESC)",
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_releases_release_path_id ON releases(release_path_id)",
    )
    .execute(pool)
    .await?;

    tracing::info!("Release schema bootstrap completed successfully");
    Ok(())
}
