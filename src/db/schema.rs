use sqlx::PgPool;
use tracing::info;

use crate::error::AppError;

/// Drops and recreates every table.
pub const SCHEMA: &str = include_str!("schema.sql");

/// Clear the existing data and create new tables.
pub async fn init_db(pool: &PgPool) -> Result<(), AppError> {
    sqlx::raw_sql(SCHEMA).execute(pool).await?;
    info!("Database schema initialized");
    Ok(())
}
