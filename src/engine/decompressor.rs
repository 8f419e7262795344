use tracing::debug;

use crate::error::{Corruption, Error, Result};
use crate::protocol::CompressedContainer;
use crate::utils::bits::BitReader;

/// Walks the container's tree bit by bit until `original_len` symbols have
/// been emitted.
///
/// The stop condition is the symbol count alone; padding bits in the last
/// byte are never interpreted. Nothing is returned on failure.
pub fn decompress(container: &CompressedContainer) -> Result<Vec<u8>> {
    let expected_len = CompressedContainer::expected_packed_len(container.total_bits);
    if container.packed.len() as u64 != expected_len {
        return Err(Error::corrupt(
            0,
            Corruption::LengthMismatch {
                expected: expected_len,
                actual: container.packed.len() as u64,
            },
        ));
    }

    let tree = &container.tree;
    let root = tree.root();
    let expected = container.original_len;

    let mut reader = BitReader::with_limit(&container.packed, container.total_bits);
    let mut out = Vec::with_capacity(expected.min(container.total_bits) as usize);
    let mut cursor = root;
    let mut emitted = 0u64;

    while emitted < expected {
        let bit = match reader.read_bit() {
            Some(bit) => bit,
            None => {
                return Err(Error::corrupt(
                    reader.position(),
                    Corruption::UnexpectedEnd {
                        decoded: emitted,
                        expected,
                    },
                ))
            }
        };

        cursor = tree
            .step(cursor, bit)
            .ok_or_else(|| Error::corrupt(reader.position() - 1, Corruption::DeadEnd))?;

        if let Some(symbol) = tree.node(cursor).symbol() {
            out.push(symbol);
            emitted += 1;
            cursor = root;
        }
    }

    if reader.remaining() > 0 {
        return Err(Error::corrupt(
            reader.position(),
            Corruption::TrailingBits(reader.remaining()),
        ));
    }

    debug!(
        bits = container.total_bits,
        output = out.len(),
        "decompressed"
    );
    Ok(out)
}
