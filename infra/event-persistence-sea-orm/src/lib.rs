use std::{
    sync::atomic::{AtomicUsize, Ordering},
    time::Duration,
};

use async_lock::OnceCell;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbErr, Schema};

pub mod entity;
pub mod events;

#[derive(Clone, Debug)]
pub struct DatabaseSettings {
    pub connection_string: String,
    /// Replaces the database segment of server URLs such as `mysql://`.
    pub database_name: Option<String>,
    pub max_connections: u32,
    pub min_connections: u32,
    pub connect_timeout: Duration,
    pub acquire_timeout: Duration,
    pub sqlx_logging: bool,
}

impl DatabaseSettings {
    pub fn new(connection_string: impl Into<String>) -> Self {
        Self {
            connection_string: connection_string.into(),
            database_name: None,
            max_connections: 10,
            min_connections: 0,
            connect_timeout: Duration::from_secs(5),
            acquire_timeout: Duration::from_secs(5),
            sqlx_logging: false,
        }
    }

    pub fn resolved_url(&self) -> Result<String, ConnectionError> {
        let connection_string = self.connection_string.trim();
        if connection_string.is_empty() {
            return Err(ConnectionError::MissingConnectionString);
        }

        let Some(database_name) = self
            .database_name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
        else {
            return Ok(connection_string.to_string());
        };

        if connection_string.starts_with("sqlite:") {
            log::warn!(
                "Ignoring database name override '{}' for a SQLite connection",
                database_name
            );
            return Ok(connection_string.to_string());
        }

        let mut url = url::Url::parse(connection_string)?;
        url.set_path(&format!("/{}", database_name));
        Ok(url.to_string())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConnectionError {
    #[error("Database connection string is empty")]
    MissingConnectionString,
    #[error("Invalid database connection string: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("Failed to connect to database: {0}")]
    Connect(#[source] DbErr),
    #[error("Failed to prepare database schema: {0}")]
    Schema(#[source] DbErr),
}

/// Hands out one shared connection pool for the lifetime of the process.
///
/// The pool is created on the first call. Callers that arrive while that
/// first attempt is still running wait for it instead of connecting again.
/// A failed attempt is not cached, so the next call tries again.
pub struct ConnectionManager {
    settings: DatabaseSettings,
    connection: OnceCell<DatabaseConnection>,
    attempts: AtomicUsize,
}

impl ConnectionManager {
    pub fn new(settings: DatabaseSettings) -> Self {
        Self {
            settings,
            connection: OnceCell::new(),
            attempts: AtomicUsize::new(0),
        }
    }

    pub async fn ensure_connection(&self) -> Result<DatabaseConnection, ConnectionError> {
        let connection = self
            .connection
            .get_or_try_init(|| self.connect())
            .await?;
        Ok(connection.clone())
    }

    pub fn connection_attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }

    async fn connect(&self) -> Result<DatabaseConnection, ConnectionError> {
        let attempt = self.attempts.fetch_add(1, Ordering::SeqCst) + 1;
        let db_url = self.settings.resolved_url()?;

        let mut opt = ConnectOptions::new(db_url);
        opt.max_connections(self.settings.max_connections)
            .min_connections(self.settings.min_connections)
            .connect_timeout(self.settings.connect_timeout)
            .acquire_timeout(self.settings.acquire_timeout)
            .sqlx_logging(self.settings.sqlx_logging);

        let db = Database::connect(opt).await.map_err(|e| {
            log::error!("Database connection attempt {} failed: {}", attempt, e);
            ConnectionError::Connect(e)
        })?;
        create_schema(&db).await.map_err(ConnectionError::Schema)?;

        log::info!(
            "Connected to {:?} database (attempt {})",
            db.get_database_backend(),
            attempt
        );
        Ok(db)
    }
}

/// Creates the `events` table and its unique slug index if missing.
pub async fn create_schema(db: &DatabaseConnection) -> Result<(), DbErr> {
    let schema = Schema::new(db.get_database_backend());
    let mut events_table = schema.create_table_from_entity(entity::event::Entity);
    events_table.if_not_exists();
    db.execute(&events_table).await?;
    Ok(())
}

#[cfg(test)]
pub(crate) fn memory_settings() -> DatabaseSettings {
    let mut settings = DatabaseSettings::new("sqlite::memory:");
    // Every pooled connection would open its own empty in-memory database.
    settings.max_connections = 1;
    settings
}
