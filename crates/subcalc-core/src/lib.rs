//! Core types for subcalc, the CIDR subnet calculator
//!
//! This crate provides the foundational types shared by the calculator,
//! the HTTP endpoint and the command-line tool:
//! - [`AddressFamily`] - IPv4 (`inet`) or IPv6 (`inet6`)
//! - [`SubcalcError`] - Error types
//! - [`config::ServerConfig`] - Environment-driven server settings
//!
//! ```
//! use subcalc_core::AddressFamily;
//!
//! let family: AddressFamily = "inet6".parse().unwrap();
//! assert_eq!(family.bit_width(), 128);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

pub mod config;

/// Largest address width in bytes (IPv6)
pub const MAX_BYTE_WIDTH: usize = 16;

/// Address family of a calculation
///
/// Determines the width of every address, mask and prefix involved.
///
/// # Examples
///
/// ```
/// use subcalc_core::AddressFamily;
///
/// assert_eq!(AddressFamily::Inet.byte_width(), 4);
/// assert_eq!(AddressFamily::Inet6.to_string(), "inet6");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AddressFamily {
    /// IPv4, 32 bits
    Inet,
    /// IPv6, 128 bits
    Inet6,
}

impl AddressFamily {
    /// Width of an address in bytes: 4 or 16
    pub const fn byte_width(self) -> usize {
        match self {
            AddressFamily::Inet => 4,
            AddressFamily::Inet6 => 16,
        }
    }

    /// Width of an address in bits: 32 or 128
    pub const fn bit_width(self) -> u32 {
        self.byte_width() as u32 * 8
    }

    /// Keyword used on the command line and in URIs
    pub const fn keyword(self) -> &'static str {
        match self {
            AddressFamily::Inet => "inet",
            AddressFamily::Inet6 => "inet6",
        }
    }
}

impl fmt::Display for AddressFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

impl FromStr for AddressFamily {
    type Err = SubcalcError;

    /// Keywords are matched case-insensitively.
    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "inet" => Ok(AddressFamily::Inet),
            "inet6" => Ok(AddressFamily::Inet6),
            _ => Err(SubcalcError::InvalidPath(format!(
                "invalid address family: {}",
                s
            ))),
        }
    }
}

/// Error types for subcalc operations
#[derive(Error, Debug)]
pub enum SubcalcError {
    /// Argument or URI shape is wrong, or the family keyword is unknown
    #[error("{0}")]
    InvalidPath(String),

    /// Address text does not decode to the family's width
    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    /// Prefix is non-numeric or outside [1, width]
    #[error("Invalid prefix length: {0}")]
    InvalidPrefix(String),

    /// Netmask or wildcard mask is not a contiguous prefix mask
    #[error("Invalid mask: {0}")]
    InvalidMask(String),

    /// Host count for prefix discovery is zero, malformed or too large
    #[error("Invalid host count: {0}")]
    InvalidHostCount(String),

    /// Summary serialization failed
    #[error("Encoding failed: {0}")]
    EncodeFailure(#[from] serde_json::Error),

    /// Writing to the response sink failed
    #[error("Write failed: {0}")]
    SinkFailure(#[from] std::io::Error),
}

/// Result type alias for subcalc operations
pub type Result<T> = std::result::Result<T, SubcalcError>;
