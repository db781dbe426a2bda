//! Server configuration, populated from environment variables.

use std::net::{Ipv4Addr, SocketAddr};
use std::path::PathBuf;

use secrecy::{ExposeSecret, SecretString};

/// Default signing secret. Accepted outside production only.
const DEFAULT_JWT_SECRET: &str = "secret";

/// Upper bound on `JWT_TTL_HOURS`: ten years.
pub const MAX_JWT_TTL_HOURS: i64 = 24 * 365 * 10;

/// Errors raised while reading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A variable is present but cannot be parsed.
    #[error("{var} must be {expected}, got {value:?}")]
    Invalid {
        var: &'static str,
        expected: &'static str,
        value: String,
    },

    /// `ENV=production` with the built-in JWT secret.
    #[error("JWT_SECRET must be set when ENV=production")]
    DefaultSecretInProduction,
}

/// Output format for the tracing subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Json,
    Pretty,
    Compact,
}

/// Database settings.
///
/// The service embeds SQLite, so only `name` selects the database. The
/// network fields are still read so that deployments carrying the usual
/// `DB_*` variables keep working; they are reported at startup and otherwise
/// unused.
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: SecretString,
    /// Database name. The file is `<name>.db`; `:memory:` selects an
    /// in-memory database.
    pub name: String,
    pub ssl_mode: String,
    /// Maximum number of pooled connections.
    pub pool_size: u32,
}

impl DatabaseConfig {
    /// `None` for an in-memory database.
    pub fn path(&self) -> Option<PathBuf> {
        if self.name == ":memory:" {
            None
        } else {
            Some(PathBuf::from(format!("{}.db", self.name)))
        }
    }
}

/// Runtime configuration for a Postboard server.
///
/// | Variable | Default | Description |
/// |----------|---------|-------------|
/// | `PORT` | `8080` | TCP port to listen on (all interfaces) |
/// | `ENV` | `development` | Deployment environment name |
/// | `DB_HOST` / `DB_PORT` / `DB_USER` / `DB_PASSWORD` / `DB_SSLMODE` | `localhost` / `5432` / `postgres` / `postgres` / `disable` | Reported only |
/// | `DB_NAME` | `postcomments` | Database file stem, or `:memory:` |
/// | `DB_POOL_SIZE` | `8` | Pooled connections |
/// | `JWT_SECRET` | `secret` | HMAC key for access tokens |
/// | `JWT_TTL_HOURS` | `72` | Access token lifetime, 1 to 87600 |
/// | `RATE_LIMIT` / `RATE_BURST` | `5` / `10` | Loaded, not enforced |
/// | `LOG_LEVEL` | `debug` | Tracing filter directive (`RUST_LOG` wins) |
/// | `LOG_FORMAT` | `json` | `json`, `pretty`, or `compact` |
/// | `CORS_ORIGINS` | `*` | `*` or a comma-separated origin list |
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub env: String,
    pub database: DatabaseConfig,
    pub jwt_secret: SecretString,
    pub jwt_ttl_hours: i64,
    pub rate_limit: u32,
    pub rate_burst: u32,
    pub log_level: String,
    pub log_format: LogFormat,
    /// Empty means any origin.
    pub cors_origins: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8080,
            env: "development".into(),
            database: DatabaseConfig {
                host: "localhost".into(),
                port: 5432,
                user: "postgres".into(),
                password: SecretString::from("postgres".to_string()),
                name: "postcomments".into(),
                ssl_mode: "disable".into(),
                pool_size: 8,
            },
            jwt_secret: SecretString::from(DEFAULT_JWT_SECRET.to_string()),
            jwt_ttl_hours: 72,
            rate_limit: 5,
            rate_burst: 10,
            log_level: "debug".into(),
            log_format: LogFormat::Json,
            cors_origins: Vec::new(),
        }
    }
}

impl Config {
    /// Populate config from the process environment, applying defaults where
    /// absent.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Populate config from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut cfg = Self::default();

        if let Some(v) = lookup("PORT") {
            cfg.port = parse("PORT", &v, "a port number")?;
        }
        if let Some(v) = lookup("ENV") {
            cfg.env = v;
        }

        let db = &mut cfg.database;
        if let Some(v) = lookup("DB_HOST") {
            db.host = v;
        }
        if let Some(v) = lookup("DB_PORT") {
            db.port = parse("DB_PORT", &v, "a port number")?;
        }
        if let Some(v) = lookup("DB_USER") {
            db.user = v;
        }
        if let Some(v) = lookup("DB_PASSWORD") {
            db.password = SecretString::from(v);
        }
        if let Some(v) = lookup("DB_NAME") {
            db.name = v;
        }
        if let Some(v) = lookup("DB_SSLMODE") {
            db.ssl_mode = v;
        }
        if let Some(v) = lookup("DB_POOL_SIZE") {
            db.pool_size = parse("DB_POOL_SIZE", &v, "a positive integer")?;
            if db.pool_size == 0 {
                return Err(invalid("DB_POOL_SIZE", &v, "a positive integer"));
            }
        }

        if let Some(v) = lookup("JWT_SECRET") {
            cfg.jwt_secret = SecretString::from(v);
        }
        if let Some(v) = lookup("JWT_TTL_HOURS") {
            cfg.jwt_ttl_hours = parse("JWT_TTL_HOURS", &v, "a positive integer")?;
            if !(1..=MAX_JWT_TTL_HOURS).contains(&cfg.jwt_ttl_hours) {
                return Err(invalid("JWT_TTL_HOURS", &v, "an integer between 1 and 87600"));
            }
        }
        if let Some(v) = lookup("RATE_LIMIT") {
            cfg.rate_limit = parse("RATE_LIMIT", &v, "a non-negative integer")?;
        }
        if let Some(v) = lookup("RATE_BURST") {
            cfg.rate_burst = parse("RATE_BURST", &v, "a non-negative integer")?;
        }
        if let Some(v) = lookup("LOG_LEVEL") {
            cfg.log_level = v;
        }
        if let Some(v) = lookup("LOG_FORMAT") {
            cfg.log_format = match v.to_ascii_lowercase().as_str() {
                "json" => LogFormat::Json,
                "pretty" | "text" => LogFormat::Pretty,
                "compact" => LogFormat::Compact,
                _ => return Err(invalid("LOG_FORMAT", &v, "one of json, pretty, compact")),
            };
        }
        if let Some(v) = lookup("CORS_ORIGINS") {
            cfg.cors_origins = parse_origins(&v);
        }

        if cfg.is_production() && cfg.jwt_secret.expose_secret() == DEFAULT_JWT_SECRET {
            return Err(ConfigError::DefaultSecretInProduction);
        }

        Ok(cfg)
    }

    pub fn is_production(&self) -> bool {
        self.env.eq_ignore_ascii_case("production")
    }

    /// Socket address the server binds to.
    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::from((Ipv4Addr::UNSPECIFIED, self.port))
    }
}

fn parse<T: std::str::FromStr>(
    var: &'static str,
    value: &str,
    expected: &'static str,
) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| invalid(var, value, expected))
}

fn invalid(var: &'static str, value: &str, expected: &'static str) -> ConfigError {
    ConfigError::Invalid {
        var,
        expected,
        value: value.to_string(),
    }
}

/// `*` (or an empty value) means any origin.
fn parse_origins(value: &str) -> Vec<String> {
    let origins: Vec<String> = value
        .split(',')
        .map(str::trim)
        .filter(|o| !o.is_empty())
        .map(String::from)
        .collect();
    if origins.iter().any(|o| o == "*") {
        Vec::new()
    } else {
        origins
    }
}
