//! Server configuration
//!
//! Settings are read from environment variables, with defaults suitable
//! for running the HTTP endpoint locally.

use std::env;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use thiserror::Error;

/// Environment variable holding the bind address
pub const BIND_VAR: &str = "SUBCALC_BIND";

/// Environment variable holding the listen port
pub const PORT_VAR: &str = "SUBCALC_PORT";

/// Port used when `SUBCALC_PORT` is unset
pub const DEFAULT_PORT: u16 = 8080;

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Bind address is not an IP address
    #[error("Invalid bind address in SUBCALC_BIND: {0}")]
    InvalidBind(String),

    /// Port is not a number or is zero
    #[error("Invalid port in SUBCALC_PORT: {0}")]
    InvalidPort(String),
}

/// Result type for configuration operations
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Listen settings for the HTTP endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServerConfig {
    /// Address to bind to
    pub bind: IpAddr,
    /// TCP port
    pub port: u16,
}

impl ServerConfig {
    /// Load configuration from the environment
    ///
    /// Reads `SUBCALC_BIND` and `SUBCALC_PORT`; unset variables fall back
    /// to the defaults.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(bind) = lookup(BIND_VAR) {
            config.bind = bind
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidBind(bind.clone()))?;
        }

        if let Some(port) = lookup(PORT_VAR) {
            config.port = port
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidPort(port.clone()))?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Validate the settings
    pub fn validate(&self) -> Result<()> {
        if self.port == 0 {
            return Err(ConfigError::InvalidPort("0".to_string()));
        }
        Ok(())
    }

    /// Socket address to listen on
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind, self.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: DEFAULT_PORT,
        }
    }
}
