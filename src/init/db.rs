use std::str::FromStr;

use crate::prelude::*;

use sqlx::{
    sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions},
    SqlitePool,
};

use super::schema;

/// Opens the pool without touching the schema.
pub async fn connect(cfg: &Config) -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(&cfg.database_url)?
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(cfg.db_busy_timeout);

    let pool = SqlitePoolOptions::new()
        .max_connections(cfg.db_max_connections)
        .connect_with(options)
        .await?;

    return Ok(pool);
}

pub async fn init_sqlite_pool(cfg: &Config) -> Result<SqlitePool> {
    let pool = connect(cfg).await?;

    schema::ensure_schema(&pool).await?;

    tracing::info!(database_url = %cfg.database_url, "database ready");

    return Ok(pool);
}
