//! Prefix lengths

use std::fmt;
use subcalc_core::{AddressFamily, Result, SubcalcError};

/// Validated prefix length
///
/// Always in `[1, width]` for the family it was validated against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Prefix(u8);

impl Prefix {
    /// Validate a prefix length for a family
    ///
    /// # Examples
    ///
    /// ```
    /// use subcalc_cidr::Prefix;
    /// use subcalc_core::AddressFamily;
    ///
    /// assert!(Prefix::new(AddressFamily::Inet, 24).is_ok());
    /// assert!(Prefix::new(AddressFamily::Inet, 33).is_err());
    /// assert!(Prefix::new(AddressFamily::Inet6, 0).is_err());
    /// ```
    pub fn new(family: AddressFamily, bits: u32) -> Result<Self> {
        let width = family.bit_width();
        if bits < 1 || bits > width {
            return Err(SubcalcError::InvalidPrefix(format!(
                "{} (must be 1-{})",
                bits, width
            )));
        }
        Ok(Self(bits as u8))
    }

    /// Parse and validate a decimal prefix length
    pub fn parse(family: AddressFamily, text: &str) -> Result<Self> {
        Self::new(family, parse_prefix_bits(text)?)
    }

    /// Number of network bits
    pub fn bits(&self) -> u32 {
        u32::from(self.0)
    }

    /// Number of host bits left for the family
    pub fn host_width(&self, family: AddressFamily) -> u32 {
        family.bit_width().saturating_sub(self.bits())
    }

    /// Number of addresses in a block of this prefix
    ///
    /// Exact for both families: the largest value is `2^127`.
    pub fn host_count(&self, family: AddressFamily) -> u128 {
        1u128 << self.host_width(family)
    }
}

impl fmt::Display for Prefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Parse a decimal prefix length without range checking
pub fn parse_prefix_bits(text: &str) -> Result<u32> {
    text.parse()
        .map_err(|_| SubcalcError::InvalidPrefix(format!("not a number: {}", text)))
}
