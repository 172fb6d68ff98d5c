//! API configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `MONGO_URI` - MongoDB connection string
//!
//! ## Optional
//! - `MONGO_DATABASE` - Database name (default: database in `MONGO_URI`, else `bazaar`)
//! - `API_HOST` - Bind address (default: 0.0.0.0)
//! - `STORE_TIMEOUT_SECS` - Per-operation store timeout (default: 10)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment tag
//! - `SENTRY_SAMPLE_RATE` - Error sample rate (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Transaction sample rate (default: 0.0)
//!
//! The listen port is fixed at [`LISTEN_PORT`] and is not configurable.

use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use secrecy::SecretString;
use thiserror::Error;

/// Port the API listens on.
pub const LISTEN_PORT: u16 = 5050;

/// Database used when neither `MONGO_DATABASE` nor the URI names one.
pub const DEFAULT_DATABASE: &str = "bazaar";

const DEFAULT_STORE_TIMEOUT_SECS: &str = "10";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// API application configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// MongoDB connection string (may contain credentials)
    pub mongo_uri: SecretString,
    /// Database name override
    pub mongo_database: Option<String>,
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Upper bound for a single store round trip
    pub store_timeout: Duration,
    /// Sentry error tracking configuration
    pub sentry: SentryConfig,
}

/// Sentry error tracking configuration.
#[derive(Debug, Clone)]
pub struct SentryConfig {
    /// Sentry DSN; tracking is disabled when absent
    pub dsn: Option<String>,
    /// Environment tag (e.g., production, staging)
    pub environment: Option<String>,
    /// Fraction of errors sent
    pub sample_rate: f32,
    /// Fraction of transactions sent
    pub traces_sample_rate: f32,
}

impl Default for SentryConfig {
    fn default() -> Self {
        Self {
            dsn: None,
            environment: None,
            sample_rate: 1.0,
            traces_sample_rate: 0.0,
        }
    }
}

impl ApiConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = Env(lookup);

        let mongo_uri = SecretString::from(env.required("MONGO_URI")?);
        let mongo_database = env.optional("MONGO_DATABASE");
        let host = env.parsed::<IpAddr>("API_HOST", "0.0.0.0")?;

        let timeout_secs = env.parsed::<u64>("STORE_TIMEOUT_SECS", DEFAULT_STORE_TIMEOUT_SECS)?;
        if timeout_secs == 0 {
            return Err(ConfigError::InvalidEnvVar(
                "STORE_TIMEOUT_SECS".to_string(),
                "must be greater than zero".to_string(),
            ));
        }

        let sentry = SentryConfig {
            dsn: env.optional("SENTRY_DSN"),
            environment: env.optional("SENTRY_ENVIRONMENT"),
            sample_rate: env.parsed::<f32>("SENTRY_SAMPLE_RATE", "1.0")?,
            traces_sample_rate: env.parsed::<f32>("SENTRY_TRACES_SAMPLE_RATE", "0.0")?,
        };

        Ok(Self {
            mongo_uri,
            mongo_database,
            host,
            store_timeout: Duration::from_secs(timeout_secs),
            sentry,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, LISTEN_PORT)
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

struct Env<F>(F);

impl<F> Env<F>
where
    F: Fn(&str) -> Option<String>,
{
    /// Get a required variable; empty values count as missing.
    fn required(&self, key: &str) -> Result<String, ConfigError> {
        self.optional(key)
            .ok_or_else(|| ConfigError::MissingEnvVar(key.to_string()))
    }

    /// Get an optional variable; empty values count as missing.
    fn optional(&self, key: &str) -> Option<String> {
        (self.0)(key).filter(|value| !value.trim().is_empty())
    }

    /// Parse a variable, falling back to a default.
    fn parsed<T>(&self, key: &str, default: &str) -> Result<T, ConfigError>
    where
        T: std::str::FromStr,
        T::Err: std::fmt::Display,
    {
        self.optional(key)
            .unwrap_or_else(|| default.to_string())
            .parse::<T>()
            .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
    }
}
