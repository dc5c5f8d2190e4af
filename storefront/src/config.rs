// storefront/src/config.rs

use crate::errors::{AppError, Result};
use dotenvy::dotenv;
use std::env;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
  Postgres,
  Memory,
}

impl FromStr for StoreBackend {
  type Err = AppError;

  fn from_str(s: &str) -> Result<Self> {
    match s.trim().to_ascii_lowercase().as_str() {
      "postgres" | "postgresql" => Ok(StoreBackend::Postgres),
      "memory" => Ok(StoreBackend::Memory),
      other => Err(AppError::Config(format!("Invalid STORE_BACKEND '{}'", other))),
    }
  }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
  pub server_host: String,
  pub server_port: u16,
  pub store_backend: StoreBackend,
  pub database_url: Option<String>,
  pub database_max_connections: u32,
  pub init_schema: bool,
  /// Header the bundled session provider reads the user id from.
  pub session_header: String,
  pub log_json: bool,
}

impl Default for AppConfig {
  fn default() -> Self {
    Self {
      server_host: "127.0.0.1".to_string(),
      server_port: 8080,
      store_backend: StoreBackend::Postgres,
      database_url: None,
      database_max_connections: 5,
      init_schema: false,
      session_header: "X-User-ID".to_string(),
      log_json: false,
    }
  }
}

impl AppConfig {
  /// Loads `.env` if present, then reads the process environment.
  pub fn from_env() -> Result<Self> {
    dotenv().ok();
    Self::from_lookup(|name| env::var(name).ok())
  }

  /// Builds a config from an arbitrary variable lookup.
  pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
    let get_or = |name: &str, default: &str| lookup(name).unwrap_or_else(|| default.to_string());

    let server_host = get_or("SERVER_HOST", "127.0.0.1");
    let server_port = parse_var::<u16>("SERVER_PORT", &get_or("SERVER_PORT", "8080"))?;
    let store_backend = get_or("STORE_BACKEND", "postgres").parse::<StoreBackend>()?;
    let database_url = lookup("DATABASE_URL").filter(|url| !url.trim().is_empty());
    let database_max_connections =
      parse_var::<u32>("DATABASE_MAX_CONNECTIONS", &get_or("DATABASE_MAX_CONNECTIONS", "5"))?;
    let init_schema = parse_var::<bool>("INIT_SCHEMA", &get_or("INIT_SCHEMA", "false"))?;
    let session_header = get_or("SESSION_HEADER", "X-User-ID");
    let log_json = match get_or("LOG_FORMAT", "text").to_ascii_lowercase().as_str() {
      "text" => false,
      "json" => true,
      other => return Err(AppError::Config(format!("Invalid LOG_FORMAT '{}'", other))),
    };

    if store_backend == StoreBackend::Postgres && database_url.is_none() {
      return Err(AppError::Config(
        "Missing environment variable 'DATABASE_URL' for the postgres backend".to_string(),
      ));
    }
    if database_max_connections == 0 {
      return Err(AppError::Config("DATABASE_MAX_CONNECTIONS must be positive".to_string()));
    }

    Ok(Self {
      server_host,
      server_port,
      store_backend,
      database_url,
      database_max_connections,
      init_schema,
      session_header,
      log_json,
    })
  }

  pub fn bind_address(&self) -> String {
    format!("{}:{}", self.server_host, self.server_port)
  }
}

fn parse_var<T>(name: &str, raw: &str) -> Result<T>
where
  T: FromStr,
  T::Err: std::fmt::Display,
{
  raw
    .trim()
    .parse::<T>()
    .map_err(|e| AppError::Config(format!("Invalid {}: {}", name, e)))
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::collections::HashMap;

  fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
    move |name| map.get(name).cloned()
  }

  #[test]
  fn memory_backend_needs_no_database_url() {
    let cfg = AppConfig::from_lookup(lookup_from(&[("STORE_BACKEND", "memory")])).unwrap();
    assert_eq!(cfg.store_backend, StoreBackend::Memory);
    assert_eq!(cfg.server_port, 8080);
    assert_eq!(cfg.session_header, "X-User-ID");
    assert!(!cfg.log_json);
  }

  #[test]
  fn postgres_backend_requires_database_url() {
    let err = AppConfig::from_lookup(lookup_from(&[])).unwrap_err();
    assert!(matches!(err, AppError::Config(_)));

    let cfg = AppConfig::from_lookup(lookup_from(&[("DATABASE_URL", "postgres://localhost/shop")])).unwrap();
    assert_eq!(cfg.store_backend, StoreBackend::Postgres);
    assert_eq!(cfg.database_url.as_deref(), Some("postgres://localhost/shop"));
  }

  #[test]
  fn defaults_agree_with_an_empty_environment() {
    let url = "postgres://localhost/shop";
    let from_env = AppConfig::from_lookup(lookup_from(&[("DATABASE_URL", url)])).unwrap();
    let defaults = AppConfig::default();
    assert_eq!(from_env.store_backend, defaults.store_backend);
    assert_eq!(from_env.bind_address(), defaults.bind_address());
    assert_eq!(from_env.database_max_connections, defaults.database_max_connections);
    assert_eq!(from_env.init_schema, defaults.init_schema);
    assert_eq!(from_env.session_header, defaults.session_header);
    assert_eq!(from_env.log_json, defaults.log_json);
  }

  #[test]
  fn invalid_values_are_config_errors() {
    for pairs in [
      vec![("STORE_BACKEND", "memory"), ("SERVER_PORT", "eighty")],
      vec![("STORE_BACKEND", "redis")],
      vec![("STORE_BACKEND", "memory"), ("LOG_FORMAT", "xml")],
      vec![("STORE_BACKEND", "memory"), ("INIT_SCHEMA", "maybe")],
      vec![("STORE_BACKEND", "memory"), ("DATABASE_MAX_CONNECTIONS", "0")],
    ] {
      assert!(matches!(AppConfig::from_lookup(lookup_from(&pairs)), Err(AppError::Config(_))));
    }
  }
}
