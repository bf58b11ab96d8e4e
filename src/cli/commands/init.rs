use anyhow::Context;
use sqlx::Executor;

use crate::database::manager::DatabaseManager;

const SCHEMA_SQL: &str = include_str!("../../../schema.sql");

/// Apply schema.sql against DATABASE_URL. Statements are idempotent, so
/// re-running against an initialized database is harmless.
pub async fn handle() -> anyhow::Result<()> {
    let pool = DatabaseManager::pool().await.context("database not configured")?;

    pool.execute(SCHEMA_SQL).await.context("failed to apply schema")?;

    println!("Schema applied.");
    Ok(())
}
