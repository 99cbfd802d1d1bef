//! Batched enumeration of the addresses in a block
//!
//! The enumerator holds a single cursor address and a counter, so memory
//! stays constant whatever the block size. Termination is driven by the
//! explicit address count rather than by comparing against a mask, which
//! keeps blocks at the very top of the address space (where the cursor
//! wraps to zero after the last address) finite.

use crate::algebra::{increment, Address};
use crate::block::Block;
use crate::prefix::Prefix;

/// Number of addresses returned per batch
pub const BATCH_SIZE: usize = 32;

/// Lazy, ascending producer of every address in a block
///
/// # Examples
///
/// ```
/// use subcalc_cidr::{compute_block, open_enumerator};
/// use subcalc_core::AddressFamily;
///
/// let block = compute_block(AddressFamily::Inet, "10.0.0.0", 30).unwrap();
/// let mut range = open_enumerator(&block);
///
/// let batch = range.next_batch().unwrap();
/// assert_eq!(batch, ["10.0.0.0", "10.0.0.1", "10.0.0.2", "10.0.0.3"]);
/// assert!(range.finished());
/// assert!(range.next_batch().is_none());
/// ```
#[derive(Debug, Clone)]
pub struct RangeEnumerator {
    current: Address,
    index: u128,
    count: u128,
}

impl RangeEnumerator {
    /// Start at a network-aligned address
    pub fn new(start: Address, prefix: Prefix) -> Self {
        Self {
            current: start,
            index: 0,
            count: prefix.host_count(start.family()),
        }
    }

    /// Next batch of up to [`BATCH_SIZE`] textual addresses
    ///
    /// Returns `None` once every address has been produced.
    pub fn next_batch(&mut self) -> Option<Vec<String>> {
        if self.finished() {
            return None;
        }
        Some(
            self.by_ref()
                .take(BATCH_SIZE)
                .map(|address| address.to_string())
                .collect(),
        )
    }

    /// True once exactly `host_count` addresses have been produced
    pub fn finished(&self) -> bool {
        self.index >= self.count
    }

    /// Addresses produced so far
    pub fn emitted(&self) -> u128 {
        self.index
    }

    /// Total number of addresses in the block
    pub fn total(&self) -> u128 {
        self.count
    }
}

impl Iterator for RangeEnumerator {
    type Item = Address;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished() {
            return None;
        }
        let address = self.current;
        increment(&mut self.current);
        self.index += 1;
        Some(address)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.count - self.index;
        match usize::try_from(remaining) {
            Ok(n) => (n, Some(n)),
            Err(_) => (usize::MAX, None),
        }
    }
}

/// Open an enumerator over every address of a block
pub fn open_enumerator(block: &Block) -> RangeEnumerator {
    RangeEnumerator::new(block.first(), block.prefix())
}
