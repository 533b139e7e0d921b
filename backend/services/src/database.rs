use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use anyhow::Result;
use std::time::Duration;

const MAX_CONNECTIONS: u32 = 10;
const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);
const IDLE_TIMEOUT: Duration = Duration::from_secs(30);

/// Open the Postgres pool. The pool is lazy: no connection is made until the
/// first query, so the process starts even while the database is still booting.
pub async fn create_connection(database_url: &str) -> Result<DatabaseConnection> {
    let mut options = ConnectOptions::new(database_url.to_owned());
    options
        .max_connections(MAX_CONNECTIONS)
        .connect_timeout(CONNECT_TIMEOUT)
        .acquire_timeout(CONNECT_TIMEOUT)
        .idle_timeout(IDLE_TIMEOUT)
        .connect_lazy(true)
        .sqlx_logging(false);

    let db = Database::connect(options)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to connect to database: {}", e))?;

    Ok(db)
}

// Note: the `users` and `tasks` tables are created by the migration CLI:
// cargo run --bin migration up
