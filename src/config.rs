//! Runtime settings read from the environment.
//!
//! | Variable | Default | Meaning |
//! |---|---|---|
//! | `DATABASE_URL` | required | PostgreSQL connection string |
//! | `DB_MAX_CONNECTIONS` | `10` | Pool size |
//! | `DB_CONNECT_TIMEOUT` | `30` | Seconds to wait for a pooled connection |
//! | `DB_IDLE_TIMEOUT` | `600` | Seconds before an idle connection is closed |
//! | `DB_MAX_LIFETIME` | `1800` | Seconds before any connection is recycled |
//! | `REDIS_URL` | unset | Enables the keyword cache |
//! | `CACHE_TTL_SECONDS` | `3600` | Lifetime of a cached keyword |
//! | `VIEW_QUEUE_CAPACITY` | `10000` | Buffered view events before drops |
//! | `VIEW_WORKER_CONCURRENCY` | `4` | View counter updates in flight |
//! | `LISTEN` | `0.0.0.0:3000` | Bind address |
//! | `BEHIND_PROXY` | `false` | Rate-limit by forwarded client IP |
//! | `RUST_LOG` | `info` | Log filter |
//! | `LOG_FORMAT` | `text` | `text` or `json` |
//!
//! A variable that is set but cannot be parsed is an error, never a silent
//! fallback to the default.

use anyhow::{Context, Result, bail};
use std::env;
use std::fmt;
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;
use url::Url;

/// Output format of the tracing subscriber.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for LogFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "text" => Ok(LogFormat::Text),
            "json" => Ok(LogFormat::Json),
            other => bail!("expected 'text' or 'json', got '{other}'"),
        }
    }
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            LogFormat::Text => "text",
            LogFormat::Json => "json",
        })
    }
}

/// PostgreSQL pool settings.
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub connect_timeout: Duration,
    pub idle_timeout: Duration,
    pub max_lifetime: Duration,
}

/// Keyword cache settings. `redis_url: None` disables caching.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    pub redis_url: Option<String>,
    pub ttl: Duration,
}

/// View counter pipeline settings.
#[derive(Debug, Clone)]
pub struct ViewConfig {
    pub queue_capacity: usize,
    pub worker_concurrency: usize,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub listen_addr: SocketAddr,
    /// Rate limiting keys on `X-Forwarded-For` / `X-Real-IP` instead of the
    /// peer address. Only safe behind a trusted reverse proxy.
    pub behind_proxy: bool,
    pub log_filter: String,
    pub log_format: LogFormat,
    pub database: DatabaseConfig,
    pub cache: CacheConfig,
    pub views: ViewConfig,
}

impl Config {
    /// Reads the process environment.
    ///
    /// # Errors
    ///
    /// Fails when `DATABASE_URL` is missing or any set variable does not parse.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Reads settings through `lookup`, which returns the raw value of a
    /// variable or `None` when it is unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let database = DatabaseConfig {
            url: var("DATABASE_URL").context("DATABASE_URL must be set")?,
            max_connections: parse_or(&var, "DB_MAX_CONNECTIONS", 10)?,
            connect_timeout: Duration::from_secs(parse_or(&var, "DB_CONNECT_TIMEOUT", 30)?),
            idle_timeout: Duration::from_secs(parse_or(&var, "DB_IDLE_TIMEOUT", 600)?),
            max_lifetime: Duration::from_secs(parse_or(&var, "DB_MAX_LIFETIME", 1800)?),
        };

        let cache = CacheConfig {
            redis_url: var("REDIS_URL"),
            ttl: Duration::from_secs(parse_or(&var, "CACHE_TTL_SECONDS", 3600)?),
        };

        let views = ViewConfig {
            queue_capacity: parse_or(&var, "VIEW_QUEUE_CAPACITY", 10_000)?,
            worker_concurrency: parse_or(&var, "VIEW_WORKER_CONCURRENCY", 4)?,
        };

        let behind_proxy = match var("BEHIND_PROXY").map(|v| v.to_ascii_lowercase()) {
            None => false,
            Some(v) if v == "1" || v == "true" => true,
            Some(v) if v == "0" || v == "false" => false,
            Some(v) => bail!("BEHIND_PROXY must be true/false or 1/0, got '{v}'"),
        };

        Ok(Self {
            listen_addr: parse_or(&var, "LISTEN", SocketAddr::from(([0, 0, 0, 0], 3000)))?,
            behind_proxy,
            log_filter: var("RUST_LOG").unwrap_or_else(|| "info".to_string()),
            log_format: parse_or(&var, "LOG_FORMAT", LogFormat::Text)?,
            database,
            cache,
            views,
        })
    }

    /// Checks value ranges that parsing alone cannot catch.
    pub fn validate(&self) -> Result<()> {
        check_scheme("DATABASE_URL", &self.database.url, &["postgres", "postgresql"])?;
        if let Some(redis_url) = &self.cache.redis_url {
            check_scheme("REDIS_URL", redis_url, &["redis", "rediss"])?;
        }

        if self.database.max_connections == 0 {
            bail!("DB_MAX_CONNECTIONS must be at least 1");
        }
        if self.database.connect_timeout.is_zero() {
            bail!("DB_CONNECT_TIMEOUT must be greater than 0");
        }
        if self.cache.ttl.is_zero() {
            bail!("CACHE_TTL_SECONDS must be greater than 0");
        }
        if !(100..=1_000_000).contains(&self.views.queue_capacity) {
            bail!(
                "VIEW_QUEUE_CAPACITY must be between 100 and 1000000, got {}",
                self.views.queue_capacity
            );
        }
        if !(1..=256).contains(&self.views.worker_concurrency) {
            bail!(
                "VIEW_WORKER_CONCURRENCY must be between 1 and 256, got {}",
                self.views.worker_concurrency
            );
        }

        Ok(())
    }

    /// Logs the effective settings with credentials masked.
    pub fn print_summary(&self) {
        tracing::info!(
            listen = %self.listen_addr,
            behind_proxy = self.behind_proxy,
            log_format = %self.log_format,
            "Server settings"
        );
        tracing::info!(
            url = %mask_password(&self.database.url),
            max_connections = self.database.max_connections,
            "Database settings"
        );
        match &self.cache.redis_url {
            Some(url) => tracing::info!(
                url = %mask_password(url),
                ttl_secs = self.cache.ttl.as_secs(),
                "Keyword cache enabled"
            ),
            None => tracing::info!("Keyword cache disabled (REDIS_URL not set)"),
        }
        tracing::info!(
            queue_capacity = self.views.queue_capacity,
            worker_concurrency = self.views.worker_concurrency,
            "View counter settings"
        );
    }
}

fn parse_or<T>(var: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    match var(key) {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e| anyhow::anyhow!("{key} has an invalid value '{raw}': {e}")),
    }
}

fn check_scheme(key: &str, url: &str, schemes: &[&str]) -> Result<()> {
    let parsed = Url::parse(url).with_context(|| format!("{key} is not a valid URL"))?;
    if !schemes.contains(&parsed.scheme()) {
        bail!(
            "{key} must use one of {:?}, got '{}'",
            schemes,
            parsed.scheme()
        );
    }
    Ok(())
}

/// Replaces the password of a connection URL with `***`.
fn mask_password(url: &str) -> String {
    match Url::parse(url) {
        Ok(mut parsed) if parsed.password().is_some() => {
            let _ = parsed.set_password(Some("***"));
            parsed.to_string()
        }
        Ok(_) => url.to_string(),
        Err(_) => "<unparseable>".to_string(),
    }
}

/// Loads and validates configuration. Expects `.env` to be loaded already.
pub fn load_from_env() -> Result<Config> {
    let config = Config::from_env()?;
    config.validate()?;
    Ok(config)
}
