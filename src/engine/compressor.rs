use tracing::debug;

use crate::engine::config::EngineConfig;
use crate::engine::frequency::FrequencyTable;
use crate::engine::huffman::{CodeTable, HuffmanTree};
use crate::error::{Error, Result};
use crate::protocol::CompressedContainer;
use crate::utils::bits::BitWriter;

/// Packs `input` through `table`, MSB-first.
///
/// Returns the packed bytes and the number of meaningful bits; the final
/// byte is zero-padded on the right. An empty input never touches the table.
pub fn encode(input: &[u8], table: &CodeTable) -> Result<(Vec<u8>, u64)> {
    if input.is_empty() {
        return Ok((Vec::new(), 0));
    }

    let mut writer = BitWriter::with_capacity(input.len() / 2);
    for (offset, &symbol) in input.iter().enumerate() {
        let code = table
            .get(symbol)
            .ok_or(Error::MissingCode { symbol, offset })?;
        writer.push_bits(code);
    }
    Ok(writer.finish())
}

/// Compresses `input` with the default engine limits.
pub fn compress(input: &[u8]) -> Result<CompressedContainer> {
    compress_with(input, &EngineConfig::default())
}

pub fn compress_with(input: &[u8], config: &EngineConfig) -> Result<CompressedContainer> {
    if input.is_empty() {
        return Err(Error::EmptyInput);
    }
    if input.len() > config.max_input_size {
        return Err(Error::InputTooLarge {
            len: input.len() as u64,
            limit: config.max_input_size as u64,
        });
    }

    let freq = FrequencyTable::from_bytes(input);
    let tree = HuffmanTree::build(&freq)?;
    let table = CodeTable::from_tree(&tree);
    let (packed, total_bits) = encode(input, &table)?;

    debug!(
        input = input.len(),
        symbols = table.len(),
        max_code = table.max_code_length(),
        bits = total_bits,
        packed = packed.len(),
        "compressed"
    );

    Ok(CompressedContainer {
        packed,
        tree,
        original_len: input.len() as u64,
        total_bits,
    })
}
