use secrecy::ExposeSecret;
use sqlx::postgres::PgPoolOptions;

use crate::{config::DatabaseConfig, error::Result};

/// Database connection pool type
pub type DbPool = sqlx::PgPool;

/// Database connection type - supports both pool connections and transactions
/// Use `conn.as_mut()` for pool connections, `tx.as_mut()` for transactions
pub type DbConn = sqlx::PgConnection;

/// Opens the pool and applies the embedded migrations.
pub async fn connect(config: &DatabaseConfig) -> Result<DbPool> {
    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .connect(config.connection_string().expose_secret())
        .await?;

    sqlx::migrate!("./migrations").run(&pool).await?;
    tracing::info!(host = %config.host, database = %config.database, "Database ready");

    Ok(pool)
}

/// Builds a pool that only connects on first use.
pub fn connect_lazy(config: &DatabaseConfig) -> Result<DbPool> {
    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .connect_lazy(config.connection_string().expose_secret())?;
    Ok(pool)
}
