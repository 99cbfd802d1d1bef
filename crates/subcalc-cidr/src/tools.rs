//! Auxiliary calculations
//!
//! - Prefix discovery from a required host count
//! - Prefix from a netmask or wildcard mask
//! - Reverse DNS pointer names for IPv6 addresses
//! - 6to4 (`2002::/16`) network and parent address mapping

use std::fmt;
use subcalc_core::{AddressFamily, Result, SubcalcError};

use crate::algebra::{parse_address, Address, Mask};
use crate::prefix::Prefix;

/// `2^128` in decimal, the size of the whole IPv6 space
const INET6_SPACE: &str = "340282366920938463463374607431768211456";

/// Smallest block able to hold a number of hosts
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HostFit {
    family: AddressFamily,
    host_bits: u32,
    theoretical_len: f64,
}

impl HostFit {
    /// Fractional prefix length `width - log2(hosts)` for the exact count
    pub fn theoretical_len(&self) -> f64 {
        self.theoretical_len
    }

    /// Prefix length of the block; zero when the whole space is needed
    pub fn prefix_len(&self) -> u32 {
        self.family.bit_width() - self.host_bits
    }

    /// Number of host bits
    pub fn host_bits(&self) -> u32 {
        self.host_bits
    }

    /// Block size in decimal
    pub fn block_size(&self) -> String {
        if self.host_bits >= 128 {
            INET6_SPACE.to_string()
        } else {
            (1u128 << self.host_bits).to_string()
        }
    }
}

/// Find the smallest block holding `count` addresses
///
/// # Examples
///
/// ```
/// use subcalc_cidr::tools::discover_prefix;
/// use subcalc_core::AddressFamily;
///
/// let fit = discover_prefix(AddressFamily::Inet, "500").unwrap();
/// assert_eq!(fit.prefix_len(), 23);
/// assert_eq!(fit.block_size(), "512");
/// ```
pub fn discover_prefix(family: AddressFamily, count: &str) -> Result<HostFit> {
    let exceeds = || {
        SubcalcError::InvalidHostCount(format!(
            "{} exceeds the {} address space",
            count, family
        ))
    };

    let (host_bits, log2) = match count.parse::<u128>() {
        Ok(0) => {
            return Err(SubcalcError::InvalidHostCount("must be at least 1".to_string()));
        }
        Ok(1) => (0, 0.0),
        Ok(n) => (u128::BITS - (n - 1).leading_zeros(), (n as f64).log2()),
        // Past u128::MAX only 2^128 itself still fits an address space
        Err(_) if !count.is_empty() && count.bytes().all(|b| b.is_ascii_digit()) => {
            if count.trim_start_matches('0') != INET6_SPACE {
                return Err(exceeds());
            }
            (u128::BITS, f64::from(u128::BITS))
        }
        Err(_) => {
            return Err(SubcalcError::InvalidHostCount(format!(
                "not a number: {}",
                count
            )));
        }
    };
    if host_bits > family.bit_width() {
        return Err(exceeds());
    }

    Ok(HostFit {
        family,
        host_bits,
        theoretical_len: f64::from(family.bit_width()) - log2,
    })
}

fn parse_mask_text(family: AddressFamily, text: &str) -> Result<Address> {
    let hex = text.strip_prefix("0x").or_else(|| text.strip_prefix("0X"));
    match (family, hex) {
        (AddressFamily::Inet, Some(digits)) => {
            let value = u32::from_str_radix(digits, 16)
                .map_err(|_| SubcalcError::InvalidMask(format!("invalid hex mask: {}", text)))?;
            Address::from_octets(family, &value.to_be_bytes())
        }
        _ => parse_address(family, text)
            .map_err(|_| SubcalcError::InvalidMask(format!("{} is not a {} mask", text, family))),
    }
}

fn prefix_of(family: AddressFamily, netmask: Address) -> Result<Prefix> {
    let mask = Mask::from_address(netmask)?;
    Prefix::new(family, mask.prefix_bits())
}

/// Prefix length of a netmask such as `255.255.255.0` or `0xffffff00`
pub fn prefix_from_mask(family: AddressFamily, text: &str) -> Result<Prefix> {
    prefix_of(family, parse_mask_text(family, text)?)
}

/// Prefix length of a wildcard mask such as `0.0.0.255`
pub fn prefix_from_wildcard(family: AddressFamily, text: &str) -> Result<Prefix> {
    let wildcard = parse_mask_text(family, text)?;
    let inverted: Vec<u8> = wildcard.octets().iter().map(|b| !b).collect();
    prefix_of(family, Address::from_octets(family, &inverted)?)
}

/// Reverse DNS zone for IPv6 pointer records
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReverseZone {
    /// `ip6.arpa.`
    Arpa,
    /// Legacy `ip6.int.`
    Int,
}

impl ReverseZone {
    fn suffix(self) -> &'static str {
        match self {
            ReverseZone::Arpa => "ip6.arpa.",
            ReverseZone::Int => "ip6.int.",
        }
    }
}

/// Nibble-reversed owner name of an IPv6 address under `zone`
///
/// # Examples
///
/// ```
/// use subcalc_cidr::tools::{reverse_name, ReverseZone};
///
/// let name = reverse_name("2001:db8::1", ReverseZone::Arpa).unwrap();
/// assert!(name.starts_with("1.0.0.0."));
/// assert!(name.ends_with("8.b.d.0.1.0.0.2.ip6.arpa."));
/// ```
pub fn reverse_name(address: &str, zone: ReverseZone) -> Result<String> {
    let address = parse_address(AddressFamily::Inet6, address)?;
    let mut name = String::with_capacity(72);
    for byte in address.octets().iter().rev() {
        name.push_str(&format!("{:x}.{:x}.", byte & 0x0f, byte >> 4));
    }
    name.push_str(zone.suffix());
    Ok(name)
}

/// Pointer record line: `<name>\tIN\tPTR\t<hostname>`
pub fn reverse_pointer(address: &str, zone: ReverseZone, hostname: &str) -> Result<String> {
    Ok(format!("{}\tIN\tPTR\t{}", reverse_name(address, zone)?, hostname))
}

/// 6to4 network and the IPv4 address it embeds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StfMapping {
    parent: Address,
}

impl StfMapping {
    /// IPv4 parent address
    pub fn parent(&self) -> Address {
        self.parent
    }

    /// The `2002:xxxx:xxxx::/48` network
    pub fn network(&self) -> String {
        let b = self.parent.octets();
        format!("2002:{:02x}{:02x}:{:02x}{:02x}::/48", b[0], b[1], b[2], b[3])
    }
}

impl fmt::Display for StfMapping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{:<21}{}", "6to4 network:", self.network())?;
        write!(f, "{:<21}{}", "ip version 4 parent:", self.parent)
    }
}

/// Map an IPv4 address to its 6to4 network, or a 6to4 address to its parent
pub fn stf_mapping(family: AddressFamily, text: &str) -> Result<StfMapping> {
    let address = parse_address(family, text)?;
    let parent = match family {
        AddressFamily::Inet => address,
        AddressFamily::Inet6 => {
            let b = address.octets();
            if b[..2] != [0x20, 0x02] {
                return Err(SubcalcError::InvalidAddress(format!(
                    "{} is not a 6to4 (2002::/16) address",
                    text
                )));
            }
            Address::from_octets(AddressFamily::Inet, &b[2..6])?
        }
    };
    Ok(StfMapping { parent })
}
