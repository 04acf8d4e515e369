//! Process configuration read from the environment.

use anyhow::{Context, Result};

pub const DEFAULT_PORT: u16 = 8000;
pub const DEFAULT_HOST: &str = "0.0.0.0";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    pub database_url: Option<String>,
    pub database_name: Option<String>,
    pub host: String,
    pub port: u16,
}

impl Config {
    /// Reads `.env` if present, then the process environment.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let port = match non_empty("PORT") {
            Some(raw) => raw.trim().parse().with_context(|| format!("invalid PORT `{raw}`"))?,
            None => DEFAULT_PORT,
        };
        Ok(Self {
            database_url: non_empty("DATABASE_URL"),
            database_name: non_empty("DATABASE_NAME"),
            host: non_empty("HOST").unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port,
        })
    }

    pub fn listen_addr(&self) -> String { format!("{}:{}", self.host, self.port) }
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
    fn test_defaults() {
        let c = config(&[]).unwrap();
        assert_eq!(c.port, DEFAULT_PORT);
        assert_eq!(c.listen_addr(), "0.0.0.0:8000");
        assert!(c.database_url.is_none());
        assert!(c.database_name.is_none());
    }

    #[test]
    fn test_reads_database_settings() {
        let c = config(&[("DATABASE_URL", "mongodb://localhost:27017"), ("DATABASE_NAME", "shop"), ("PORT", "9001")]).unwrap();
        assert_eq!(c.database_url.as_deref(), Some("mongodb://localhost:27017"));
        assert_eq!(c.database_name.as_deref(), Some("shop"));
        assert_eq!(c.port, 9001);
    }

    #[test]
    fn test_blank_values_are_unset() {
        let c = config(&[("DATABASE_URL", "  "), ("PORT", "")]).unwrap();
        assert!(c.database_url.is_none());
        assert_eq!(c.port, DEFAULT_PORT);
    }

    #[test]
    fn test_invalid_port() {
        assert!(config(&[("PORT", "eighty")]).is_err());
        assert!(config(&[("PORT", "70000")]).is_err());
    }
}
