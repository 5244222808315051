use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {name}: {message}")]
    InvalidValue { name: String, message: String },
    #[error("failed to parse {name} as integer: {source}")]
    ParseInt {
        name: String,
        #[source]
        source: std::num::ParseIntError,
    },
}

/// Forum store configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct ForumConfig {
    /// Path to the SQLite database file.
    pub database_path: PathBuf,
    /// Threads per forum page.
    pub per_page: u32,
    /// Excerpt length in characters.
    pub excerpt_limit: usize,
}

impl ForumConfig {
    /// Load configuration from environment variables, with defaults for
    /// anything unset.
    ///
    /// # Errors
    ///
    /// Returns an error if a set variable fails to parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            database_path: PathBuf::from(env_or_default("DATABASE_PATH", "./data/forum.sqlite")),
            per_page: parse_env_u32("FORUM_PER_PAGE", crate::forum::DEFAULT_PER_PAGE)?,
            excerpt_limit: parse_env_usize("EXCERPT_LIMIT", crate::forum::DEFAULT_EXCERPT_LIMIT)?,
        })
    }

    /// Validate that the configuration is usable.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.per_page == 0 {
            return Err(ConfigError::InvalidValue {
                name: "FORUM_PER_PAGE".to_string(),
                message: "must be at least 1".to_string(),
            });
        }

        if self.excerpt_limit == 0 {
            return Err(ConfigError::InvalidValue {
                name: "EXCERPT_LIMIT".to_string(),
                message: "must be at least 1".to_string(),
            });
        }

        Ok(())
    }
}

fn env_or_default(name: &str, default: &str) -> String {
    std::env::var(name).unwrap_or_else(|_| default.to_string())
}

fn parse_env_u32(name: &str, default: u32) -> Result<u32, ConfigError> {
    match std::env::var(name) {
        Ok(value) => value.parse().map_err(|source| ConfigError::ParseInt {
            name: name.to_string(),
            source,
        }),
        Err(_) => Ok(default),
    }
}

fn parse_env_usize(name: &str, default: usize) -> Result<usize, ConfigError> {
    match std::env::var(name) {
        Ok(value) => value.parse().map_err(|source| ConfigError::ParseInt {
            name: name.to_string(),
            source,
        }),
        Err(_) => Ok(default),
    }
}
