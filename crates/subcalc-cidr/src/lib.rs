//! CIDR block calculation and range enumeration
//!
//! Provides the calculator behind both the `subcalc` command and the HTTP
//! endpoint:
//! - Decode textual IPv4/IPv6 addresses into fixed-width byte arrays
//! - Build, apply and invert prefix masks
//! - Compute the network block (first/last address, host count, masks)
//! - Enumerate every address of a block in fixed-size batches
//! - Assemble the JSON response, streamed when enumeration is requested
//!
//! # Examples
//!
//! ```
//! use subcalc_cidr::compute_block;
//! use subcalc_core::AddressFamily;
//!
//! let block = compute_block(AddressFamily::Inet, "192.168.1.100", 24).unwrap();
//! assert_eq!(block.first().to_string(), "192.168.1.0");
//! assert_eq!(block.last().to_string(), "192.168.1.255");
//! assert_eq!(block.host_count(), 256);
//! ```

pub mod algebra;
pub mod block;
pub mod prefix;
pub mod range;
pub mod response;
pub mod tools;

pub use algebra::{
    apply_mask, increment, invert_mask, make_mask, parse_address, set_host_bits, Address, Mask,
};
pub use block::{compute_block, Block};
pub use prefix::{parse_prefix_bits, Prefix};
pub use range::{open_enumerator, RangeEnumerator, BATCH_SIZE};
pub use response::{write_response, ResponseChunks, Summary};
