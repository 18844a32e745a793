//! Host configuration parsed from environment variables.
//!
//! Optional:
//! - `PORT`: listen port, default 3000
//! - `POLLHUB_SITE_ROOT`: directory holding the built `pkg/` assets; defaults
//!   to the Leptos `site-root`

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use std::path::PathBuf;

pub const DEFAULT_PORT: u16 = 3000;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid PORT '{0}': expected an integer between 1 and 65535")]
    InvalidPort(String),
    #[error("leptos configuration: {0}")]
    Leptos(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub port: u16,
    pub site_root: Option<PathBuf>,
}

impl ServerConfig {
    /// Read `PORT` and `POLLHUB_SITE_ROOT`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidPort` when `PORT` is set but not a usable port.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_values(std::env::var("PORT").ok().as_deref(), std::env::var("POLLHUB_SITE_ROOT").ok().as_deref())
    }

    /// Build from raw values; blank values count as unset.
    ///
    /// # Errors
    ///
    /// Returns `InvalidPort` when `port` is present but not in `1..=65535`.
    pub fn from_values(port: Option<&str>, site_root: Option<&str>) -> Result<Self, ConfigError> {
        let port = match port.map(str::trim).filter(|v| !v.is_empty()) {
            None => DEFAULT_PORT,
            Some(raw) => raw.parse::<u16>().ok().filter(|p| *p != 0).ok_or_else(|| ConfigError::InvalidPort(raw.to_owned()))?,
        };
        let site_root = site_root.map(str::trim).filter(|v| !v.is_empty()).map(PathBuf::from);
        Ok(Self { port, site_root })
    }
}
