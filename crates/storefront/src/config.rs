//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional.
//!
//! - `CATALOG_HOST` - Bind address (default: 127.0.0.1)
//! - `CATALOG_PORT` - Listen port (default: 5000)
//! - `CATALOG_BASE_URL` - Public URL of the storefront, used to resolve
//!   relative product image URLs (default: `http://127.0.0.1:5000`)
//! - `CATALOG_DATA_DIR` - Directory holding the local storage files
//!   (default: `.mi-catalogo`)
//! - `CATALOG_ADMIN_DOMAIN` - Email domain whose users see the catalog
//!   management controls (default: `tecmilenio.mx`)
//! - `CATALOG_API_BASE` - Remote product API; without it the catalog is
//!   kept in memory only
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` - Error event sample rate (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Transaction sample rate (default: 0.1)

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use thiserror::Error;
use url::Url;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL for the storefront
    pub base_url: Url,
    /// Local storage directory
    pub data_dir: PathBuf,
    /// Email domain of catalog administrators, without `@`
    pub admin_domain: String,
    /// Remote product API base URL
    pub api_base: Option<String>,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    pub sentry_environment: Option<String>,
    pub sentry_sample_rate: f32,
    pub sentry_traces_sample_rate: f32,
}

impl CatalogConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an invalid value.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary variable source.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an invalid value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let get_or = |key: &str, default: &str| get(key).unwrap_or_else(|| default.to_string());

        let host = parse_var("CATALOG_HOST", &get_or("CATALOG_HOST", "127.0.0.1"))?;
        let port = parse_var("CATALOG_PORT", &get_or("CATALOG_PORT", "5000"))?;
        let base_url = parse_url(
            "CATALOG_BASE_URL",
            &get_or("CATALOG_BASE_URL", "http://127.0.0.1:5000"),
        )?;
        let data_dir = PathBuf::from(get_or("CATALOG_DATA_DIR", ".mi-catalogo"));
        let admin_domain = normalize_domain(&get_or("CATALOG_ADMIN_DOMAIN", "tecmilenio.mx"));

        let api_base = get("CATALOG_API_BASE");
        if let Some(api_base) = &api_base {
            parse_url("CATALOG_API_BASE", api_base)?;
        }

        Ok(Self {
            host,
            port,
            base_url,
            data_dir,
            admin_domain,
            api_base,
            sentry_dsn: get("SENTRY_DSN"),
            sentry_environment: get("SENTRY_ENVIRONMENT"),
            sentry_sample_rate: parse_var("SENTRY_SAMPLE_RATE", &get_or("SENTRY_SAMPLE_RATE", "1.0"))?,
            sentry_traces_sample_rate: parse_var(
                "SENTRY_TRACES_SAMPLE_RATE",
                &get_or("SENTRY_TRACES_SAMPLE_RATE", "0.1"),
            )?,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Parse a variable's value, naming the variable in the error.
fn parse_var<T>(key: &str, value: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    value
        .trim()
        .parse()
        .map_err(|e: T::Err| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

fn parse_url(key: &str, value: &str) -> Result<Url, ConfigError> {
    Url::parse(value.trim()).map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

/// `@Example.MX` -> `example.mx`.
fn normalize_domain(domain: &str) -> String {
    domain.trim().trim_start_matches('@').to_ascii_lowercase()
}
