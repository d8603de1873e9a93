//! Runtime configuration loaded from the environment (and `.env`).

use std::env;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("{name} has invalid value '{value}': {reason}")]
    Invalid {
        name: &'static str,
        value: String,
        reason: String,
    },
}

/// Which transport the MCP server speaks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transport {
    Stdio,
    Http,
}

impl FromStr for Transport {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "stdio" => Ok(Transport::Stdio),
            "http" => Ok(Transport::Http),
            other => Err(format!("expected 'stdio' or 'http', got '{other}'")),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub transport: Transport,
    pub http_addr: String,
    pub max_connections: u32,
    /// Hard cap on rows returned by `execute_sql`.
    pub sql_row_limit: i64,
    pub sql_statement_timeout: Duration,
    pub cache_ttl: Duration,
    pub run_migrations: bool,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a config from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup("DATABASE_URL")
            .filter(|v| !v.trim().is_empty())
            .ok_or(ConfigError::Missing("DATABASE_URL"))?;
        let sql_row_limit = parse_or("SQL_ROW_LIMIT", &lookup, 500)?;
        at_least_one("SQL_ROW_LIMIT", sql_row_limit)?;

        Ok(Self {
            database_url,
            transport: parse_or("MCP_TRANSPORT", &lookup, Transport::Stdio)?,
            http_addr: lookup("MCP_HTTP_ADDR").unwrap_or_else(|| "127.0.0.1:8080".to_string()),
            max_connections: parse_or("DB_MAX_CONNECTIONS", &lookup, 5)?,
            sql_row_limit,
            sql_statement_timeout: Duration::from_millis(parse_or(
                "SQL_STATEMENT_TIMEOUT_MS",
                &lookup,
                5000,
            )?),
            cache_ttl: Duration::from_secs(parse_or("CACHE_TTL_SECS", &lookup, 600)?),
            run_migrations: parse_or("RUN_MIGRATIONS", &lookup, false)?,
        })
    }
}

fn parse_or<T, F>(name: &'static str, lookup: &F, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    match lookup(name) {
        None => Ok(default),
        Some(raw) if raw.trim().is_empty() => Ok(default),
        Some(raw) => raw.trim().parse::<T>().map_err(|err| ConfigError::Invalid {
            name,
            value: raw.clone(),
            reason: err.to_string(),
        }),
    }
}

fn at_least_one(name: &'static str, value: i64) -> Result<(), ConfigError> {
    if value < 1 {
        return Err(ConfigError::Invalid {
            name,
            value: value.to_string(),
            reason: "must be at least 1".to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_applied() {
        let config = Config::from_lookup(lookup_from(&[(
            "DATABASE_URL",
            "postgres://localhost/stats",
        )]))
        .unwrap();

        assert_eq!(config.transport, Transport::Stdio);
        assert_eq!(config.http_addr, "127.0.0.1:8080");
        assert_eq!(config.max_connections, 5);
        assert_eq!(config.sql_row_limit, 500);
        assert_eq!(config.sql_statement_timeout, Duration::from_millis(5000));
        assert_eq!(config.cache_ttl, Duration::from_secs(600));
        assert!(!config.run_migrations);
    }

    #[test]
    fn test_missing_database_url() {
        let err = Config::from_lookup(lookup_from(&[])).unwrap_err();
        assert!(matches!(err, ConfigError::Missing("DATABASE_URL")));
    }

    #[test]
    fn test_overrides_parsed() {
        let config = Config::from_lookup(lookup_from(&[
            ("DATABASE_URL", "postgres://localhost/stats"),
            ("MCP_TRANSPORT", "HTTP"),
            ("SQL_ROW_LIMIT", "50"),
            ("RUN_MIGRATIONS", "true"),
        ]))
        .unwrap();

        assert_eq!(config.transport, Transport::Http);
        assert_eq!(config.sql_row_limit, 50);
        assert!(config.run_migrations);
    }

    #[test]
    fn test_invalid_value_names_variable() {
        let err = Config::from_lookup(lookup_from(&[
            ("DATABASE_URL", "postgres://localhost/stats"),
            ("DB_MAX_CONNECTIONS", "many"),
        ]))
        .unwrap_err();

        assert!(err.to_string().contains("DB_MAX_CONNECTIONS"));
        assert!(err.to_string().contains("many"));
    }

    #[test]
    fn test_sql_row_limit_must_be_positive() {
        for bad in ["0", "-5"] {
            let err = Config::from_lookup(lookup_from(&[
                ("DATABASE_URL", "postgres://localhost/stats"),
                ("SQL_ROW_LIMIT", bad),
            ]))
            .unwrap_err();

            assert!(matches!(
                err,
                ConfigError::Invalid {
                    name: "SQL_ROW_LIMIT",
                    ..
                }
            ));
        }
    }
}
