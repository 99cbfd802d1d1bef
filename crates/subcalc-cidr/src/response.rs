//! JSON response assembly
//!
//! Summary mode serializes a single object. Enumeration mode reuses the
//! serialized summary with its closing brace replaced by
//! `,"net_list":[`, then appends one chunk per enumerator batch and finally
//! `]}`. Every batch except the last carries a trailing comma, so the
//! chunks concatenate into one valid document.

use serde::Serialize;
use std::io::Write;
use subcalc_core::Result;
use tracing::warn;

use crate::block::Block;
use crate::range::RangeEnumerator;

const NET_LIST_OPEN: &[u8] = b",\"net_list\":[";
const NET_LIST_CLOSE: &[u8] = b"]}";

/// First and last address of a block in one notation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AddressRange {
    pub first_address: String,
    pub last_address: String,
}

/// Serialized form of a [`Block`]
///
/// Field order is part of the output format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub address_range: AddressRange,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address_range_base10: Option<AddressRange>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address_range_base16: Option<AddressRange>,
    pub host_count: String,
    pub prefix_length: u32,
    pub network_mask: String,
    pub mask: String,
}

impl From<&Block> for Summary {
    fn from(block: &Block) -> Self {
        let numeric = block.range_u32();

        Self {
            address_range: AddressRange {
                first_address: block.first().to_string(),
                last_address: block.last().to_string(),
            },
            address_range_base10: numeric.map(|(first, last)| AddressRange {
                first_address: first.to_string(),
                last_address: last.to_string(),
            }),
            address_range_base16: numeric.map(|(first, last)| AddressRange {
                first_address: format!("{:#x}", first),
                last_address: format!("{:#x}", last),
            }),
            host_count: block.host_count().to_string(),
            prefix_length: block.prefix().bits(),
            network_mask: block.netmask().to_string(),
            mask: block.wildcard().to_string(),
        }
    }
}

/// Response body split into independently writable chunks
///
/// The first chunk is the summary (opened for `net_list` when enumerating),
/// followed by one chunk per batch and the closing `]}`. Serialization
/// happens up front in [`ResponseChunks::new`], so iteration cannot fail.
#[derive(Debug)]
pub struct ResponseChunks {
    header: Option<Vec<u8>>,
    enumerator: Option<RangeEnumerator>,
}

impl ResponseChunks {
    /// Prepare the chunks for a block, enumerating when `enumerator` is set
    pub fn new(block: &Block, enumerator: Option<RangeEnumerator>) -> Result<Self> {
        let mut header = serde_json::to_vec(&Summary::from(block))?;
        if enumerator.is_some() {
            open_net_list(&mut header);
        }

        Ok(Self {
            header: Some(header),
            enumerator,
        })
    }

    fn batch_chunk(batch: &[String], last: bool) -> Vec<u8> {
        let mut chunk = Vec::with_capacity(batch.len() * 18);
        for (i, address) in batch.iter().enumerate() {
            if i > 0 {
                chunk.push(b',');
            }
            chunk.push(b'"');
            chunk.extend_from_slice(address.as_bytes());
            chunk.push(b'"');
        }
        if !last {
            chunk.push(b',');
        }
        chunk
    }
}

impl Iterator for ResponseChunks {
    type Item = Vec<u8>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(header) = self.header.take() {
            return Some(header);
        }

        let enumerator = self.enumerator.as_mut()?;
        match enumerator.next_batch() {
            Some(batch) => Some(Self::batch_chunk(&batch, enumerator.finished())),
            None => {
                self.enumerator = None;
                Some(NET_LIST_CLOSE.to_vec())
            }
        }
    }
}

impl Drop for ResponseChunks {
    fn drop(&mut self) {
        if let (None, Some(enumerator)) = (&self.header, &self.enumerator) {
            warn!(
                emitted = %enumerator.emitted(),
                total = %enumerator.total(),
                "Response stream abandoned before completion"
            );
        }
    }
}

/// Replace the closing brace of a serialized object with the `net_list` opener
fn open_net_list(summary: &mut Vec<u8>) {
    if let Some(end) = summary.iter().rposition(|&b| b == b'}') {
        summary.truncate(end);
        summary.extend_from_slice(NET_LIST_OPEN);
    }
}

/// Write the response for a block to a sink
///
/// Stops at the first failed write and returns it as `SinkFailure`.
///
/// # Examples
///
/// ```
/// use subcalc_cidr::{compute_block, open_enumerator, write_response};
/// use subcalc_core::AddressFamily;
///
/// let block = compute_block(AddressFamily::Inet, "10.0.0.0", 31).unwrap();
/// let mut out = Vec::new();
/// write_response(&block, Some(open_enumerator(&block)), &mut out).unwrap();
///
/// let text = String::from_utf8(out).unwrap();
/// assert!(text.ends_with(r#""net_list":["10.0.0.0","10.0.0.1"]}"#));
/// ```
pub fn write_response<W: Write>(
    block: &Block,
    enumerator: Option<RangeEnumerator>,
    sink: &mut W,
) -> Result<()> {
    for chunk in ResponseChunks::new(block, enumerator)? {
        sink.write_all(&chunk)?;
    }
    sink.flush()?;
    Ok(())
}
