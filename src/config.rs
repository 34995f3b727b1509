use std::{env, net::SocketAddr, path::PathBuf, str::FromStr, time::Duration};

use anyhow::{anyhow, Context};

use crate::Result;

const DEFAULT_DATABASE_URL: &str = "sqlite://guesses.db";
const DEFAULT_SERVER_HOST: &str = "0.0.0.0";
const DEFAULT_SERVER_PORT: u16 = 8000;
const DEFAULT_DB_BUSY_TIMEOUT_MS: u64 = 5000;
const DEFAULT_DB_MAX_CONNECTIONS: u32 = 8;
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub db_busy_timeout: Duration,
    pub db_max_connections: u32,

    pub server_host: String,
    pub server_port: u16,
    pub request_timeout: Duration,

    pub static_dir: Option<PathBuf>,
}

impl Config {
    #[cfg(test)]
    pub fn with_database_url(database_url: impl Into<String>) -> Self {
        return Config {
            database_url: database_url.into(),
            db_busy_timeout: Duration::from_millis(DEFAULT_DB_BUSY_TIMEOUT_MS),
            db_max_connections: DEFAULT_DB_MAX_CONNECTIONS,

            server_host: DEFAULT_SERVER_HOST.to_string(),
            server_port: DEFAULT_SERVER_PORT,
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),

            static_dir: None,
        };
    }

    pub fn socket_addr(&self) -> Result<SocketAddr> {
        let addr = format!("{}:{}", self.server_host, self.server_port);
        let addr = addr
            .parse()
            .with_context(|| format!("invalid listen address {addr}"))?;

        return Ok(addr);
    }
}

/// Reads the process environment. Call `dotenv::dotenv()` first so a local
/// `.env` file is honoured.
pub fn build() -> Result<Config> {
    let server_port: u16 = parse_var("SERVER_PORT", DEFAULT_SERVER_PORT)?;
    if server_port == 0 {
        return Err(anyhow!("SERVER_PORT must be between 1 and 65535").into());
    }

    let db_busy_timeout_ms = parse_var("DB_BUSY_TIMEOUT_MS", DEFAULT_DB_BUSY_TIMEOUT_MS)?;
    let request_timeout_secs = parse_var("REQUEST_TIMEOUT_SECS", DEFAULT_REQUEST_TIMEOUT_SECS)?;

    return Ok(Config {
        database_url: env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string()),
        db_busy_timeout: Duration::from_millis(db_busy_timeout_ms),
        db_max_connections: parse_var("DB_MAX_CONNECTIONS", DEFAULT_DB_MAX_CONNECTIONS)?,

        server_host: env::var("SERVER_HOST").unwrap_or_else(|_| DEFAULT_SERVER_HOST.to_string()),
        server_port,
        request_timeout: Duration::from_secs(request_timeout_secs),

        static_dir: env::var("STATIC_DIR")
            .ok()
            .filter(|dir| !dir.trim().is_empty())
            .map(PathBuf::from),
    });
}

fn parse_var<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let Ok(raw) = env::var(key) else {
        return Ok(default);
    };

    let value = raw
        .trim()
        .parse()
        .with_context(|| format!("{key} has an invalid value: {raw:?}"))?;

    return Ok(value);
}
