//! Server configuration
//!
//! Read once at startup from environment variables.

use anyhow::Context;

/// Server configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Address the HTTP listener binds to
    pub bind_addr: String,

    /// PostgreSQL connection string; jobs are kept in memory when unset
    pub database_url: Option<String>,

    /// Maximum pooled database connections
    pub db_max_connections: u32,

    /// Seed the in-memory store with sample jobs
    pub seed_demo: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:8080".to_string(),
            database_url: None,
            db_max_connections: 10,
            seed_demo: false,
        }
    }
}

impl Config {
    /// Creates configuration from environment variables
    ///
    /// Recognized variables:
    /// - JOBDASH_BIND_ADDR (optional, default: 0.0.0.0:8080)
    /// - DATABASE_URL (optional, in-memory store when unset)
    /// - JOBDASH_DB_MAX_CONNECTIONS (optional, default: 10)
    /// - JOBDASH_SEED_DEMO (optional, "1"/"true" to seed sample jobs)
    pub fn from_env() -> anyhow::Result<Self> {
        let defaults = Self::default();

        let bind_addr = std::env::var("JOBDASH_BIND_ADDR").unwrap_or(defaults.bind_addr);

        let database_url = std::env::var("DATABASE_URL")
            .ok()
            .filter(|url| !url.trim().is_empty());

        let db_max_connections = match std::env::var("JOBDASH_DB_MAX_CONNECTIONS") {
            Ok(value) => value
                .parse::<u32>()
                .with_context(|| format!("invalid JOBDASH_DB_MAX_CONNECTIONS '{}'", value))?,
            Err(_) => defaults.db_max_connections,
        };

        let seed_demo = std::env::var("JOBDASH_SEED_DEMO")
            .map(|value| parse_flag(&value))
            .unwrap_or(false);

        Ok(Self {
            bind_addr,
            database_url,
            db_max_connections,
            seed_demo,
        })
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.bind_addr, "0.0.0.0:8080");
        assert!(config.database_url.is_none());
        assert_eq!(config.db_max_connections, 10);
        assert!(!config.seed_demo);
    }

    #[test]
    fn test_parse_flag() {
        assert!(parse_flag("1"));
        assert!(parse_flag("TRUE"));
        assert!(!parse_flag("0"));
        assert!(!parse_flag(""));
    }
}
