//! PostgreSQL implementation of StoreConnector

use std::time::Duration;

use async_trait::async_trait;
use sqlx::migrate::MigrateError;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

use autolot::{ConnectionError, StoreConnector};

/// SQLSTATE codes for rejected credentials
const AUTH_FAILURE_CODES: [&str; 2] = ["28P01", "28000"];

/// Opens a `PgPool` and pings it with `SELECT 1`
pub struct PgConnector {
    max_connections: u32,
    min_connections: u32,
    acquire_timeout: Duration,
}

impl Default for PgConnector {
    fn default() -> Self {
        Self::new()
    }
}

impl PgConnector {
    /// Defaults: 10 connections max, 1 kept idle, 5s acquire timeout
    pub fn new() -> Self {
        Self {
            max_connections: 10,
            min_connections: 1,
            acquire_timeout: Duration::from_secs(5),
        }
    }

    pub fn with_max_connections(mut self, max_connections: u32) -> Self {
        self.max_connections = max_connections;
        self
    }
}

#[async_trait]
impl StoreConnector for PgConnector {
    type Handle = PgPool;

    async fn connect(&self, url: &str) -> Result<PgPool, ConnectionError> {
        let pool = PgPoolOptions::new()
            .max_connections(self.max_connections)
            .min_connections(self.min_connections)
            .acquire_timeout(self.acquire_timeout)
            .connect(url)
            .await
            .map_err(classify)?;

        // Schema must be current before the pool is handed out
        sqlx::migrate!()
            .run(&pool)
            .await
            .map_err(classify_migration)?;
        tracing::info!("✅ Database migrations completed");

        Ok(pool)
    }

    async fn ping(&self, pool: &PgPool) -> Result<(), ConnectionError> {
        sqlx::query("SELECT 1")
            .execute(pool)
            .await
            .map(|_| ())
            .map_err(classify)
    }
}

/// Sort a sqlx failure into the connection error taxonomy
pub(crate) fn classify(err: sqlx::Error) -> ConnectionError {
    match err {
        sqlx::Error::Configuration(e) => ConnectionError::Configuration(e.to_string()),
        sqlx::Error::PoolTimedOut => {
            ConnectionError::Timeout("timed out waiting for a database connection".to_string())
        }
        sqlx::Error::Database(db) => {
            let is_auth = db
                .code()
                .map(|code| AUTH_FAILURE_CODES.iter().any(|auth| *auth == code))
                .unwrap_or(false);
            if is_auth {
                ConnectionError::Auth(db.message().to_string())
            } else {
                ConnectionError::Transport(db.message().to_string())
            }
        }
        other => ConnectionError::Transport(other.to_string()),
    }
}

fn classify_migration(err: MigrateError) -> ConnectionError {
    match err {
        MigrateError::Execute(e) => classify(e),
        other => ConnectionError::Transport(format!("migration failed: {}", other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pool_timeout_is_timeout() {
        assert!(matches!(
            classify(sqlx::Error::PoolTimedOut),
            ConnectionError::Timeout(_)
        ));
    }

    #[test]
    fn test_bad_url_is_configuration() {
        let err = classify(sqlx::Error::Configuration("invalid port number".into()));
        assert_eq!(
            err,
            ConnectionError::Configuration("invalid port number".to_string())
        );
    }

    #[test]
    fn test_io_failure_is_transport() {
        let io = std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "failed to lookup address information",
        );
        assert!(matches!(
            classify(sqlx::Error::Io(io)),
            ConnectionError::Transport(_)
        ));
    }

    #[test]
    fn test_closed_pool_is_transport() {
        assert!(matches!(
            classify(sqlx::Error::PoolClosed),
            ConnectionError::Transport(_)
        ));
    }
}
