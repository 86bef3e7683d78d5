use std::{str::FromStr, time::Duration};

use event_listing_api::HttpSettings;
use event_persistence_sea_orm::DatabaseSettings;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("{name} has an invalid value '{value}': {reason}")]
    Invalid {
        name: &'static str,
        value: String,
        reason: String,
    },
}

#[derive(Clone, Debug)]
pub struct LogSettings {
    /// Rolling file output is disabled when unset.
    pub file_path: Option<String>,
    pub archive_pattern: Option<String>,
}

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub database: DatabaseSettings,
    pub http: HttpSettings,
    /// Where the listing page reaches the API.
    pub base_url: String,
    pub log: LogSettings,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let var = non_empty(lookup);
        let database = database_settings_from_lookup(&var)?;

        let http = HttpSettings {
            host: var("EVENTS_HTTP_HOST").unwrap_or_else(|| "127.0.0.1".to_string()),
            port: parse_var(&var, "EVENTS_HTTP_PORT", 3000u16)?,
        };
        let base_url =
            var("BASE_URL").unwrap_or_else(|| format!("http://{}:{}", http.host, http.port));

        let log = LogSettings {
            file_path: var("LOG_FILE_PATH"),
            archive_pattern: var("LOG_ARCHIVE_PATTERN"),
        };

        Ok(Self {
            database,
            http,
            base_url,
            log,
        })
    }
}

/// Only the `DATABASE_*` variables, for tools that never serve HTTP.
pub fn database_settings_from_env() -> Result<DatabaseSettings, ConfigError> {
    database_settings_from_lookup(|name| std::env::var(name).ok())
}

pub fn database_settings_from_lookup(
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<DatabaseSettings, ConfigError> {
    let var = non_empty(lookup);

    let connection_string = var("DATABASE_URL").ok_or(ConfigError::Missing("DATABASE_URL"))?;
    let mut database = DatabaseSettings::new(connection_string);
    database.database_name = var("DATABASE_NAME");
    database.max_connections = parse_var(&var, "DATABASE_MAX_CONNECTIONS", 10u32)?;
    let connect_timeout_secs = parse_var(&var, "DATABASE_CONNECT_TIMEOUT_SECS", 5u64)?;
    database.connect_timeout = Duration::from_secs(connect_timeout_secs);
    database.acquire_timeout = Duration::from_secs(connect_timeout_secs);
    Ok(database)
}

// Empty values count as unset.
fn non_empty(lookup: impl Fn(&str) -> Option<String>) -> impl Fn(&str) -> Option<String> {
    move |name: &str| lookup(name).filter(|value| !value.trim().is_empty())
}

fn parse_var<T>(
    var: impl Fn(&str) -> Option<String>,
    name: &'static str,
    default: T,
) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match var(name) {
        None => Ok(default),
        Some(value) => value.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
            name,
            value,
            reason: e.to_string(),
        }),
    }
}
