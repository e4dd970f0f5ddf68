use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use anyhow::{Context, Result, bail};
use http::StatusCode;

const DEFAULT_DATABASE_URL: &str = "sqlite://todos.db";
const DEFAULT_BIND_ADDR: SocketAddr = SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), 3000);
const DEFAULT_VALIDATION_STATUS: StatusCode = StatusCode::UNPROCESSABLE_ENTITY;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub bind_addr: SocketAddr,
    /// Status returned when a create request fails validation. Legacy clients
    /// expect 503.
    pub validation_status: StatusCode,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let database_url = lookup("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string());
        let bind_addr = match lookup("BIND_ADDR") {
            Some(raw) => raw.parse::<SocketAddr>().context("BIND_ADDR must be a socket address")?,
            None => DEFAULT_BIND_ADDR,
        };
        let validation_status = match lookup("TODO_VALIDATION_STATUS") {
            Some(raw) => parse_error_status(&raw)?,
            None => DEFAULT_VALIDATION_STATUS,
        };
        Ok(Self { database_url, bind_addr, validation_status })
    }
}

fn parse_error_status(raw: &str) -> Result<StatusCode> {
    let code: u16 = raw.trim().parse().with_context(|| format!("TODO_VALIDATION_STATUS `{raw}` is not a number"))?;
    let status = StatusCode::from_u16(code).with_context(|| format!("TODO_VALIDATION_STATUS `{raw}` is not a status code"))?;
    if !(status.is_client_error() || status.is_server_error()) {
        bail!("TODO_VALIDATION_STATUS must be a 4xx or 5xx code, got {code}");
    }
    Ok(status)
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: DEFAULT_DATABASE_URL.to_string(),
            bind_addr: DEFAULT_BIND_ADDR,
            validation_status: DEFAULT_VALIDATION_STATUS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Result<Config> {
        let vars: HashMap<String, String> = vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults() {
        let cfg = config(&[]).unwrap();
        assert_eq!(cfg.database_url, "sqlite://todos.db");
        assert_eq!(cfg.bind_addr, "127.0.0.1:3000".parse().unwrap());
        assert_eq!(cfg.validation_status, StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn default_matches_empty_environment() {
        let from_env = config(&[]).unwrap();
        let default = Config::default();
        assert_eq!(default.database_url, from_env.database_url);
        assert_eq!(default.bind_addr, from_env.bind_addr);
        assert_eq!(default.validation_status, from_env.validation_status);
    }

    #[test]
    fn legacy_validation_status() {
        let cfg = config(&[("TODO_VALIDATION_STATUS", "503"), ("BIND_ADDR", "0.0.0.0:8080")]).unwrap();
        assert_eq!(cfg.validation_status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(cfg.bind_addr.port(), 8080);
    }

    #[test]
    fn rejects_bad_values() {
        assert!(config(&[("TODO_VALIDATION_STATUS", "200")]).is_err());
        assert!(config(&[("TODO_VALIDATION_STATUS", "abc")]).is_err());
        assert!(config(&[("BIND_ADDR", "localhost")]).is_err());
    }
}
