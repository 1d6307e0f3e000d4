//! Configuration loading and validation for the todo service.
//!
//! All values are read from environment variables at startup. The process will
//! exit with a clear error message if any variable is present but invalid.

use anyhow::{Context, Result};
use serde::Deserialize;

/// Validated service configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// TCP port the HTTP server listens on, on all interfaces.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Filesystem path of the SQLite database file. Created if absent.
    #[serde(default = "default_database_path")]
    pub database_path: String,

    /// Tracing log level (e.g. `"info"`, `"debug"`).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_port() -> u16 {
    80
}
fn default_database_path() -> String {
    std::env::current_dir()
        .map(|dir| dir.join("todos.db"))
        .unwrap_or_else(|_| "todos.db".into())
        .to_string_lossy()
        .into_owned()
}
fn default_log_level() -> String {
    "info".into()
}

impl Config {
    /// Load and validate configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if a variable cannot be parsed or fails validation.
    pub fn from_env() -> Result<Self> {
        Self::from_environment(config::Environment::default())
    }

    fn from_environment(env: config::Environment) -> Result<Self> {
        let cfg = config::Config::builder()
            .add_source(env)
            .build()
            .context("failed to build configuration from environment")?;

        let c: Config = cfg
            .try_deserialize()
            .context("failed to deserialise configuration")?;

        c.validate()?;
        Ok(c)
    }

    /// Validate all fields, returning a descriptive error on the first failure.
    fn validate(&self) -> Result<()> {
        ensure_non_empty(&self.database_path, "DATABASE_PATH")?;
        ensure_non_empty(&self.log_level, "LOG_LEVEL")?;
        Ok(())
    }
}

fn ensure_non_empty(value: &str, name: &str) -> Result<()> {
    if value.trim().is_empty() {
        anyhow::bail!("{name} must not be empty");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env(vars: &[(&str, &str)]) -> config::Environment {
        let map = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        config::Environment::default().source(Some(map))
    }

    #[test]
    fn defaults_are_correct() {
        assert_eq!(default_port(), 80);
        assert_eq!(default_log_level(), "info");
        assert!(default_database_path().ends_with("todos.db"));
    }

    #[test]
    fn empty_environment_uses_defaults() {
        let cfg = Config::from_environment(env(&[])).unwrap();
        assert_eq!(cfg.port, 80);
        assert_eq!(cfg.log_level, "info");
        assert!(cfg.database_path.ends_with("todos.db"));
    }

    #[test]
    fn environment_overrides_defaults() {
        let cfg = Config::from_environment(env(&[
            ("PORT", "8080"),
            ("DATABASE_PATH", "/data/todos.db"),
            ("LOG_LEVEL", "debug"),
        ]))
        .unwrap();
        assert_eq!(cfg.port, 8080);
        assert_eq!(cfg.database_path, "/data/todos.db");
        assert_eq!(cfg.log_level, "debug");
    }

    #[test]
    fn rejects_unparseable_port() {
        assert!(Config::from_environment(env(&[("PORT", "eighty")])).is_err());
    }

    #[test]
    fn validate_rejects_blank_database_path() {
        let cfg = Config {
            port: default_port(),
            database_path: "  ".into(),
            log_level: default_log_level(),
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn validate_accepts_valid_config() {
        let cfg = Config {
            port: 3000,
            database_path: "/tmp/todos.db".into(),
            log_level: "info".into(),
        };
        assert!(cfg.validate().is_ok());
    }
}
