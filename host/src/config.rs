//! Environment configuration for the host.

use std::time::Duration;

use thiserror::Error;
use todo_sync::{DEFAULT_BASE_URL, DEFAULT_PAGE_SIZE};

pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("{var} must be a positive integer, got {value:?}")]
    NotPositive { var: &'static str, value: String },

    #[error("{var} must not be empty")]
    Empty { var: &'static str },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// `TODO_API_URL`
    pub base_url: String,
    /// `TODO_PAGE_SIZE`
    pub page_size: u32,
    /// `TODO_TIMEOUT_SECS`, applied to each whole request.
    pub timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Build from any variable source; unset variables take their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(url) = lookup("TODO_API_URL") {
            let url = url.trim();
            if url.is_empty() {
                return Err(ConfigError::Empty { var: "TODO_API_URL" });
            }
            config.base_url = url.to_string();
        }
        if let Some(raw) = lookup("TODO_PAGE_SIZE") {
            config.page_size = positive("TODO_PAGE_SIZE", &raw)?;
        }
        if let Some(raw) = lookup("TODO_TIMEOUT_SECS") {
            config.timeout = Duration::from_secs(positive("TODO_TIMEOUT_SECS", &raw)?);
        }

        Ok(config)
    }
}

fn positive<T>(var: &'static str, raw: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr + PartialEq + Default,
{
    match raw.trim().parse::<T>() {
        Ok(value) if value != T::default() => Ok(value),
        _ => Err(ConfigError::NotPositive {
            var,
            value: raw.to_string(),
        }),
    }
}
