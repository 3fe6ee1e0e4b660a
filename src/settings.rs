//! Process configuration, loaded from environment variables once at startup.

use anyhow::{bail, Context};
use std::env;
use std::str::FromStr;

#[derive(Debug, Clone)]
pub struct Settings {
    pub database_url: String,
    /// PostgreSQL schema for every resource table and enum type.
    pub schema: String,
    pub bind_addr: String,
    pub api_prefix: String,
    pub db_max_connections: u32,
    pub db_acquire_timeout_secs: u64,
    pub auto_migrate: bool,
    /// Empty means any origin.
    pub cors_allowed_origins: Vec<String>,
    pub max_body_bytes: usize,
}

impl Settings {
    /// Environment variables:
    /// - `DATABASE_URL` (default `postgres://localhost/sitewatch`)
    /// - `SITEWATCH_SCHEMA` (default `sitewatch`)
    /// - `BIND_ADDR` (default `0.0.0.0:8000`)
    /// - `API_PREFIX` (default `/api`)
    /// - `DB_MAX_CONNECTIONS` (default 10), `DB_ACQUIRE_TIMEOUT_SECS` (default 5)
    /// - `AUTO_MIGRATE` (default true)
    /// - `CORS_ALLOWED_ORIGINS` (comma-separated; unset allows any origin)
    /// - `MAX_BODY_BYTES` (default 1 MiB)
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let string = |key: &str, default: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        let schema = string("SITEWATCH_SCHEMA", "sitewatch");
        if !is_identifier(&schema) {
            bail!("SITEWATCH_SCHEMA must be a plain identifier, got '{}'", schema);
        }
        let mut api_prefix = string("API_PREFIX", "/api");
        if !api_prefix.starts_with('/') {
            api_prefix.insert(0, '/');
        }
        let api_prefix = api_prefix.trim_end_matches('/').to_string();

        let cors_allowed_origins = lookup("CORS_ALLOWED_ORIGINS")
            .map(|v| {
                v.split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        Ok(Settings {
            database_url: string("DATABASE_URL", "postgres://localhost/sitewatch"),
            schema,
            bind_addr: string("BIND_ADDR", "0.0.0.0:8000"),
            api_prefix,
            db_max_connections: parse(&lookup, "DB_MAX_CONNECTIONS", 10)?,
            db_acquire_timeout_secs: parse(&lookup, "DB_ACQUIRE_TIMEOUT_SECS", 5)?,
            auto_migrate: flag(&lookup, "AUTO_MIGRATE", true)?,
            cors_allowed_origins,
            max_body_bytes: parse(&lookup, "MAX_BODY_BYTES", 1024 * 1024)?,
        })
    }
}

fn parse<F, T>(lookup: &F, key: &str, default: T) -> anyhow::Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(v) if !v.trim().is_empty() => v.trim().parse().with_context(|| format!("invalid {}: '{}'", key, v)),
        _ => Ok(default),
    }
}

fn flag<F>(lookup: &F, key: &str, default: bool) -> anyhow::Result<bool>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key).map(|v| v.trim().to_lowercase()) {
        None => Ok(default),
        Some(v) if v.is_empty() => Ok(default),
        Some(v) => match v.as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" => Ok(false),
            _ => bail!("invalid {}: '{}'", key, v),
        },
    }
}

fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_lowercase() || c == '_')
        && chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn settings(vars: &[(&str, &str)]) -> anyhow::Result<Settings> {
        let map: HashMap<String, String> = vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        Settings::from_lookup(|k| map.get(k).cloned())
    }

    #[test]
    fn test_defaults() {
        let s = settings(&[]).unwrap();
        assert_eq!(s.schema, "sitewatch");
        assert_eq!(s.bind_addr, "0.0.0.0:8000");
        assert_eq!(s.api_prefix, "/api");
        assert_eq!(s.db_max_connections, 10);
        assert!(s.auto_migrate);
        assert!(s.cors_allowed_origins.is_empty());
        assert_eq!(s.max_body_bytes, 1_048_576);
    }

    #[test]
    fn test_overrides() {
        let s = settings(&[
            ("API_PREFIX", "v1/"),
            ("AUTO_MIGRATE", "false"),
            ("CORS_ALLOWED_ORIGINS", "http://a.test, http://b.test,"),
            ("DB_MAX_CONNECTIONS", "32"),
        ])
        .unwrap();
        assert_eq!(s.api_prefix, "/v1");
        assert!(!s.auto_migrate);
        assert_eq!(s.cors_allowed_origins, vec!["http://a.test", "http://b.test"]);
        assert_eq!(s.db_max_connections, 32);
    }

    #[test]
    fn test_invalid_values_fail_fast() {
        assert!(settings(&[("DB_MAX_CONNECTIONS", "many")]).is_err());
        assert!(settings(&[("AUTO_MIGRATE", "maybe")]).is_err());
        assert!(settings(&[("SITEWATCH_SCHEMA", "bad\"name")]).is_err());
    }
}
