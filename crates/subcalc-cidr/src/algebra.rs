//! Address and mask algebra
//!
//! Every operation works on a fixed-width byte array in network byte order
//! (most significant byte at index 0), so IPv4 and IPv6 share one code path
//! and differ only in how many bytes are significant.

use std::fmt;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use subcalc_core::{AddressFamily, Result, SubcalcError, MAX_BYTE_WIDTH};

use crate::prefix::Prefix;

/// Fixed-width network address
///
/// Only the first `family.byte_width()` bytes of the buffer are
/// significant; the rest stay zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Address {
    family: AddressFamily,
    bytes: [u8; MAX_BYTE_WIDTH],
}

impl Address {
    /// All-zero address of the family
    pub fn zero(family: AddressFamily) -> Self {
        Self {
            family,
            bytes: [0; MAX_BYTE_WIDTH],
        }
    }

    /// Build an address from exactly `family.byte_width()` bytes
    pub fn from_octets(family: AddressFamily, octets: &[u8]) -> Result<Self> {
        if octets.len() != family.byte_width() {
            return Err(SubcalcError::InvalidAddress(format!(
                "expected {} bytes for {}, got {}",
                family.byte_width(),
                family,
                octets.len()
            )));
        }
        let mut address = Self::zero(family);
        address.octets_mut().copy_from_slice(octets);
        Ok(address)
    }

    /// Address family
    pub fn family(&self) -> AddressFamily {
        self.family
    }

    /// Significant bytes, big-endian
    pub fn octets(&self) -> &[u8] {
        &self.bytes[..self.family.byte_width()]
    }

    fn octets_mut(&mut self) -> &mut [u8] {
        &mut self.bytes[..self.family.byte_width()]
    }

    /// Address as a big-endian integer
    pub fn to_u128(&self) -> u128 {
        self.octets()
            .iter()
            .fold(0u128, |acc, &byte| (acc << 8) | u128::from(byte))
    }

    /// Standard library form of the address
    pub fn to_ip_addr(&self) -> IpAddr {
        match self.family {
            AddressFamily::Inet => IpAddr::V4(Ipv4Addr::new(
                self.bytes[0],
                self.bytes[1],
                self.bytes[2],
                self.bytes[3],
            )),
            AddressFamily::Inet6 => IpAddr::V6(Ipv6Addr::from(self.bytes)),
        }
    }
}

impl From<Ipv4Addr> for Address {
    fn from(ip: Ipv4Addr) -> Self {
        let mut address = Self::zero(AddressFamily::Inet);
        address.octets_mut().copy_from_slice(&ip.octets());
        address
    }
}

impl From<Ipv6Addr> for Address {
    fn from(ip: Ipv6Addr) -> Self {
        Self {
            family: AddressFamily::Inet6,
            bytes: ip.octets(),
        }
    }
}

impl From<IpAddr> for Address {
    fn from(ip: IpAddr) -> Self {
        match ip {
            IpAddr::V4(v4) => v4.into(),
            IpAddr::V6(v6) => v6.into(),
        }
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.to_ip_addr(), f)
    }
}

/// Canonical prefix mask: high-order ones followed by zeros
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Mask(Address);

impl Mask {
    /// Mask as an address (the "netmask" form)
    pub fn as_address(&self) -> &Address {
        &self.0
    }

    /// Significant bytes, big-endian
    pub fn octets(&self) -> &[u8] {
        self.0.octets()
    }

    /// Address family of the mask
    pub fn family(&self) -> AddressFamily {
        self.0.family()
    }

    /// Number of leading one bits
    pub fn prefix_bits(&self) -> u32 {
        leading_ones(&self.0)
    }

    /// Interpret an arbitrary address as a mask
    ///
    /// Fails unless the bits are contiguous high-order ones.
    pub fn from_address(address: Address) -> Result<Self> {
        let mask = Self(mask_bytes(address.family(), leading_ones(&address)));
        if mask.0 != address {
            return Err(SubcalcError::InvalidMask(format!(
                "{} is not a contiguous prefix mask",
                address
            )));
        }
        Ok(mask)
    }
}

impl fmt::Display for Mask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

fn leading_ones(address: &Address) -> u32 {
    let mut ones = 0;
    for &byte in address.octets() {
        ones += byte.leading_ones();
        if byte != 0xFF {
            break;
        }
    }
    ones
}

fn mask_bytes(family: AddressFamily, bits: u32) -> Address {
    let bits = bits.min(family.bit_width()) as usize;
    let mut mask = Address::zero(family);
    let octets = mask.octets_mut();
    for byte in octets.iter_mut().take(bits / 8) {
        *byte = 0xFF;
    }
    if bits % 8 != 0 {
        octets[bits / 8] = 0xFF << (8 - bits % 8);
    }
    mask
}

/// Build the canonical mask for a prefix
///
/// # Examples
///
/// ```
/// use subcalc_cidr::{make_mask, Prefix};
/// use subcalc_core::AddressFamily;
///
/// let prefix = Prefix::new(AddressFamily::Inet, 20).unwrap();
/// let mask = make_mask(AddressFamily::Inet, prefix);
/// assert_eq!(mask.octets(), &[0xFF, 0xFF, 0xF0, 0x00]);
/// ```
pub fn make_mask(family: AddressFamily, prefix: Prefix) -> Mask {
    Mask(mask_bytes(family, prefix.bits()))
}

/// Decode a textual address for a family
///
/// Accepts dotted-quad and colon-hex notation. IPv4-mapped IPv6 text
/// decodes to its embedded 4 bytes for `inet`, and a dotted quad decodes to
/// the IPv4-mapped 16 bytes for `inet6`.
pub fn parse_address(family: AddressFamily, text: &str) -> Result<Address> {
    let invalid = || {
        SubcalcError::InvalidAddress(format!("{} is not a valid {} address", text, family))
    };
    let ip: IpAddr = text.parse().map_err(|_| invalid())?;

    match (family, ip) {
        (AddressFamily::Inet, IpAddr::V4(v4)) => Ok(v4.into()),
        (AddressFamily::Inet, IpAddr::V6(v6)) => {
            v6.to_ipv4_mapped().map(Address::from).ok_or_else(invalid)
        }
        (AddressFamily::Inet6, IpAddr::V4(v4)) => Ok(v4.to_ipv6_mapped().into()),
        (AddressFamily::Inet6, IpAddr::V6(v6)) => Ok(v6.into()),
    }
}

/// Bytewise AND of an address with a mask (the network address)
pub fn apply_mask(address: &Address, mask: &Mask) -> Address {
    let mut out = *address;
    for (byte, m) in out.octets_mut().iter_mut().zip(mask.octets()) {
        *byte &= m;
    }
    out
}

/// Turn on the low `host_width` bits of an address
///
/// Applied to a network address this yields the last address of the block.
pub fn set_host_bits(address: &Address, host_width: u32) -> Address {
    let mut out = *address;
    let mut remaining = host_width;
    for byte in out.octets_mut().iter_mut().rev() {
        if remaining == 0 {
            break;
        }
        if remaining >= 8 {
            *byte = 0xFF;
            remaining -= 8;
        } else {
            *byte |= (1u8 << remaining) - 1;
            remaining = 0;
        }
    }
    out
}

/// Bytewise NOT of a mask (the wildcard mask)
pub fn invert_mask(mask: &Mask) -> Address {
    let mut out = *mask.as_address();
    for byte in out.octets_mut() {
        *byte = !*byte;
    }
    out
}

/// Big-endian increment by one, wrapping silently past the top
pub fn increment(address: &mut Address) {
    for byte in address.octets_mut().iter_mut().rev() {
        let (next, carry) = byte.overflowing_add(1);
        *byte = next;
        if !carry {
            break;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prefix(family: AddressFamily, bits: u32) -> Prefix {
        Prefix::new(family, bits).unwrap()
    }

    #[test]
    fn test_make_mask_inet() {
        let family = AddressFamily::Inet;
        assert_eq!(make_mask(family, prefix(family, 24)).octets(), &[255, 255, 255, 0]);
        assert_eq!(make_mask(family, prefix(family, 1)).octets(), &[0x80, 0, 0, 0]);
        assert_eq!(make_mask(family, prefix(family, 32)).octets(), &[255; 4]);
        assert_eq!(make_mask(family, prefix(family, 30)).to_string(), "255.255.255.252");
    }

    #[test]
    fn test_make_mask_inet6() {
        let family = AddressFamily::Inet6;
        let mask = make_mask(family, prefix(family, 1));
        assert_eq!(mask.octets().len(), 16);
        assert_eq!(mask.octets()[0], 0x80);
        assert!(mask.octets()[1..].iter().all(|&b| b == 0));

        assert_eq!(
            make_mask(family, prefix(family, 126)).to_string(),
            "ffff:ffff:ffff:ffff:ffff:ffff:ffff:fffc"
        );
        assert_eq!(make_mask(family, prefix(family, 128)).octets(), &[0xFF; 16]);
    }

    #[test]
    fn test_parse_address() {
        let addr = parse_address(AddressFamily::Inet, "192.168.1.100").unwrap();
        assert_eq!(addr.octets(), &[192, 168, 1, 100]);

        let addr = parse_address(AddressFamily::Inet6, "2001:db8::1").unwrap();
        assert_eq!(addr.octets().len(), 16);
        assert_eq!(&addr.octets()[..4], &[0x20, 0x01, 0x0d, 0xb8]);
        assert_eq!(addr.octets()[15], 1);
    }

    #[test]
    fn test_parse_address_mapped() {
        let addr = parse_address(AddressFamily::Inet, "::ffff:10.1.2.3").unwrap();
        assert_eq!(addr.octets(), &[10, 1, 2, 3]);

        let addr = parse_address(AddressFamily::Inet6, "10.1.2.3").unwrap();
        assert_eq!(addr.octets().len(), 16);
        assert_eq!(addr.to_string(), "::ffff:10.1.2.3");
    }

    #[test]
    fn test_parse_address_invalid() {
        for text in ["999.1.1.1", "1.2.3", "", "2001:db8::/64", "host.example"] {
            assert!(matches!(
                parse_address(AddressFamily::Inet, text),
                Err(SubcalcError::InvalidAddress(_))
            ));
        }
        assert!(parse_address(AddressFamily::Inet, "2001:db8::1").is_err());
        assert!(parse_address(AddressFamily::Inet6, "2001:db8:::1").is_err());
    }

    #[test]
    fn test_apply_mask_clears_host_bits() {
        let family = AddressFamily::Inet;
        let addr = parse_address(family, "10.0.0.5").unwrap();
        let first = apply_mask(&addr, &make_mask(family, prefix(family, 8)));
        assert_eq!(first.to_string(), "10.0.0.0");
    }

    #[test]
    fn test_set_host_bits() {
        let addr = parse_address(AddressFamily::Inet, "192.168.1.0").unwrap();
        assert_eq!(set_host_bits(&addr, 8).to_string(), "192.168.1.255");
        assert_eq!(set_host_bits(&addr, 2).to_string(), "192.168.1.3");
        assert_eq!(set_host_bits(&addr, 12).to_string(), "192.168.15.255");
        assert_eq!(set_host_bits(&addr, 0), addr);

        let addr = parse_address(AddressFamily::Inet6, "2001:db8::").unwrap();
        assert_eq!(set_host_bits(&addr, 2).to_string(), "2001:db8::3");
    }

    #[test]
    fn test_invert_mask() {
        let family = AddressFamily::Inet;
        let wildcard = invert_mask(&make_mask(family, prefix(family, 24)));
        assert_eq!(wildcard.to_string(), "0.0.0.255");

        let family = AddressFamily::Inet6;
        let wildcard = invert_mask(&make_mask(family, prefix(family, 126)));
        assert_eq!(wildcard.to_u128(), 3);
    }

    #[test]
    fn test_increment_carry() {
        let mut addr = parse_address(AddressFamily::Inet, "10.0.0.255").unwrap();
        increment(&mut addr);
        assert_eq!(addr.to_string(), "10.0.1.0");

        let mut addr = parse_address(AddressFamily::Inet6, "2001:db8::ffff").unwrap();
        increment(&mut addr);
        assert_eq!(addr.to_string(), "2001:db8::1:0");
    }

    #[test]
    fn test_increment_wraps() {
        let mut addr = parse_address(AddressFamily::Inet, "255.255.255.255").unwrap();
        increment(&mut addr);
        assert_eq!(addr, Address::zero(AddressFamily::Inet));

        let mut addr =
            parse_address(AddressFamily::Inet6, "ffff:ffff:ffff:ffff:ffff:ffff:ffff:ffff").unwrap();
        increment(&mut addr);
        assert_eq!(addr, Address::zero(AddressFamily::Inet6));
    }

    #[test]
    fn test_to_u128() {
        let addr = parse_address(AddressFamily::Inet, "192.168.1.0").unwrap();
        assert_eq!(addr.to_u128(), 3232235776);
    }

    #[test]
    fn test_mask_from_address() {
        let netmask = parse_address(AddressFamily::Inet, "255.255.240.0").unwrap();
        assert_eq!(Mask::from_address(netmask).unwrap().prefix_bits(), 20);

        let holes = parse_address(AddressFamily::Inet, "255.0.255.0").unwrap();
        assert!(matches!(
            Mask::from_address(holes),
            Err(SubcalcError::InvalidMask(_))
        ));
    }

    #[test]
    fn test_from_octets_width() {
        assert!(Address::from_octets(AddressFamily::Inet, &[1, 2, 3, 4]).is_ok());
        assert!(Address::from_octets(AddressFamily::Inet, &[1, 2, 3]).is_err());
        assert!(Address::from_octets(AddressFamily::Inet6, &[0; 4]).is_err());
    }
}
