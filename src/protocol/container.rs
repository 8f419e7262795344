use tracing::debug;

use crate::engine::huffman::HuffmanTree;
use crate::error::{Corruption, Error, Result};
use crate::utils::limits::HEADER_SIZE;

/// Everything needed to decode: packed bits, the tree that produced them,
/// and the two counts that bound the stream.
///
/// Wire layout, integers big-endian:
///
/// ```text
/// [original_len: u64][total_bits: u64][tree, byte aligned][packed bytes]
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompressedContainer {
    pub packed: Vec<u8>,
    pub tree: HuffmanTree,
    pub original_len: u64,
    pub total_bits: u64,
}

impl CompressedContainer {
    /// Bytes the packed section must occupy for `total_bits`.
    pub fn expected_packed_len(total_bits: u64) -> u64 {
        total_bits.div_ceil(8)
    }

    /// Zero bits appended to fill the last packed byte.
    pub fn padding_bits(&self) -> u64 {
        (8 - self.total_bits % 8) % 8
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let tree = self.tree.serialize();
        let mut out = Vec::with_capacity(HEADER_SIZE + tree.len() + self.packed.len());
        out.extend_from_slice(&self.original_len.to_be_bytes());
        out.extend_from_slice(&self.total_bits.to_be_bytes());
        out.extend_from_slice(&tree);
        out.extend_from_slice(&self.packed);

        debug!(
            original = self.original_len,
            tree = tree.len(),
            packed = self.packed.len(),
            "encoded container"
        );
        out
    }

    pub fn from_bytes(buf: &[u8]) -> Result<Self> {
        if buf.len() < HEADER_SIZE {
            return Err(Error::corrupt(
                buf.len() as u64 * 8,
                Corruption::TruncatedHeader(HEADER_SIZE),
            ));
        }

        let original_len = read_u64(&buf[0..8]);
        let total_bits = read_u64(&buf[8..16]);

        let (tree, tree_len) = HuffmanTree::deserialize(&buf[HEADER_SIZE..])?;
        let packed = buf[HEADER_SIZE + tree_len..].to_vec();

        let expected = Self::expected_packed_len(total_bits);
        if packed.len() as u64 != expected {
            return Err(Error::corrupt(
                0,
                Corruption::LengthMismatch {
                    expected,
                    actual: packed.len() as u64,
                },
            ));
        }

        debug!(
            original = original_len,
            tree = tree_len,
            packed = packed.len(),
            "decoded container"
        );

        Ok(Self {
            packed,
            tree,
            original_len,
            total_bits,
        })
    }
}

fn read_u64(buf: &[u8]) -> u64 {
    let mut raw = [0u8; 8];
    raw.copy_from_slice(buf);
    u64::from_be_bytes(raw)
}
