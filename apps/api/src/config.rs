use std::str::FromStr;
use std::time::Duration;

use anyhow::{bail, Context, Result};

/// Which persistence gateway backs the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GatewayBackend {
    Postgres,
    /// In-process store. Data is lost on restart; intended for local runs.
    Memory,
}

impl FromStr for GatewayBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(GatewayBackend::Postgres),
            "memory" => Ok(GatewayBackend::Memory),
            other => bail!("Unknown GATEWAY_BACKEND '{other}' (expected 'postgres' or 'memory')"),
        }
    }
}

/// Application configuration loaded from environment variables.
/// Startup fails if a required variable is missing or malformed.
#[derive(Debug, Clone)]
pub struct Config {
    pub gateway_backend: GatewayBackend,
    /// Only required for the Postgres backend.
    pub database_url: Option<String>,
    pub database_max_connections: u32,
    pub port: u16,
    pub rust_log: String,
    pub reconcile_interval_secs: u64,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let gateway_backend: GatewayBackend = optional_env("GATEWAY_BACKEND")
            .unwrap_or_else(|| "postgres".to_string())
            .parse()?;

        let database_url = match gateway_backend {
            GatewayBackend::Postgres => Some(require_env("DATABASE_URL")?),
            GatewayBackend::Memory => optional_env("DATABASE_URL"),
        };

        let reconcile_interval_secs = optional_env("RECONCILE_INTERVAL_SECS")
            .unwrap_or_else(|| "60".to_string())
            .parse::<u64>()
            .context("RECONCILE_INTERVAL_SECS must be a whole number of seconds")?;
        if reconcile_interval_secs == 0 {
            bail!("RECONCILE_INTERVAL_SECS must be greater than zero");
        }

        Ok(Config {
            gateway_backend,
            database_url,
            database_max_connections: optional_env("DATABASE_MAX_CONNECTIONS")
                .unwrap_or_else(|| "10".to_string())
                .parse::<u32>()
                .context("DATABASE_MAX_CONNECTIONS must be a positive integer")?,
            port: optional_env("PORT")
                .unwrap_or_else(|| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: optional_env("RUST_LOG").unwrap_or_else(|| "info".to_string()),
            reconcile_interval_secs,
        })
    }

    pub fn reconcile_interval(&self) -> Duration {
        Duration::from_secs(self.reconcile_interval_secs)
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_parses_case_insensitively() {
        assert_eq!("Postgres".parse::<GatewayBackend>().unwrap(), GatewayBackend::Postgres);
        assert_eq!("postgresql".parse::<GatewayBackend>().unwrap(), GatewayBackend::Postgres);
        assert_eq!(" memory ".parse::<GatewayBackend>().unwrap(), GatewayBackend::Memory);
    }

    #[test]
    fn test_unknown_backend_rejected() {
        let err = "firestore".parse::<GatewayBackend>().unwrap_err();
        assert!(err.to_string().contains("firestore"));
    }
}
