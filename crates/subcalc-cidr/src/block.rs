//! Network block computation

use subcalc_core::{AddressFamily, Result};
use tracing::debug;

use crate::algebra::{
    apply_mask, invert_mask, make_mask, parse_address, set_host_bits, Address, Mask,
};
use crate::prefix::Prefix;

/// Network block derived from an address and a prefix
///
/// # Examples
///
/// ```
/// use subcalc_cidr::compute_block;
/// use subcalc_core::AddressFamily;
///
/// let block = compute_block(AddressFamily::Inet6, "2001:db8::", 126).unwrap();
/// assert_eq!(block.last().to_string(), "2001:db8::3");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Block {
    family: AddressFamily,
    first: Address,
    last: Address,
    prefix: Prefix,
    host_count: u128,
    netmask: Mask,
    wildcard: Address,
}

impl Block {
    /// Compute the block containing `address`
    ///
    /// Host bits set in `address` are discarded.
    pub fn new(address: Address, prefix: Prefix) -> Self {
        let family = address.family();
        let netmask = make_mask(family, prefix);
        let first = apply_mask(&address, &netmask);
        let last = set_host_bits(&first, prefix.host_width(family));

        Self {
            family,
            first,
            last,
            prefix,
            host_count: prefix.host_count(family),
            netmask,
            wildcard: invert_mask(&netmask),
        }
    }

    /// Address family
    pub fn family(&self) -> AddressFamily {
        self.family
    }

    /// Network address (all host bits clear)
    pub fn first(&self) -> Address {
        self.first
    }

    /// Broadcast/last address (all host bits set)
    pub fn last(&self) -> Address {
        self.last
    }

    /// Prefix length
    pub fn prefix(&self) -> Prefix {
        self.prefix
    }

    /// Number of addresses, `2^(width - prefix)`
    pub fn host_count(&self) -> u128 {
        self.host_count
    }

    /// Network mask
    pub fn netmask(&self) -> Mask {
        self.netmask
    }

    /// Wildcard (inverse) mask
    pub fn wildcard(&self) -> Address {
        self.wildcard
    }

    /// First and last address as 32-bit integers (IPv4 only)
    pub fn range_u32(&self) -> Option<(u32, u32)> {
        match self.family {
            AddressFamily::Inet => {
                Some((self.first.to_u128() as u32, self.last.to_u128() as u32))
            }
            AddressFamily::Inet6 => None,
        }
    }

    /// Check whether an address falls inside the block
    pub fn contains(&self, address: &Address) -> bool {
        address.family() == self.family && apply_mask(address, &self.netmask) == self.first
    }
}

/// Compute the block for a textual address and prefix length
///
/// The prefix is validated before the address is decoded.
pub fn compute_block(
    family: AddressFamily,
    address_text: &str,
    prefix_bits: u32,
) -> Result<Block> {
    let prefix = Prefix::new(family, prefix_bits)?;
    let address = parse_address(family, address_text)?;
    let block = Block::new(address, prefix);

    debug!(
        family = %family,
        first = %block.first,
        last = %block.last,
        prefix = prefix_bits,
        "Computed block"
    );
    Ok(block)
}
