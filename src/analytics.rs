use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::engine::frequency::FrequencyTable;
use crate::engine::huffman::CodeTable;
use crate::protocol::CompressedContainer;
use crate::utils::limits::HEADER_SIZE;

/// Size and coding statistics for one compressed input.
#[derive(Debug, Clone, Serialize)]
pub struct CompressionReport {
    pub original_bytes: u64,
    pub container_bytes: u64,
    pub tree_bytes: u64,
    pub packed_bytes: u64,
    pub total_bits: u64,
    pub padding_bits: u64,
    pub distinct_symbols: usize,
    pub max_code_length: usize,
    pub entropy_bits: f64,
    pub avg_code_length: f64,
    pub ratio: f64,
    pub sha256: String,
}

impl CompressionReport {
    pub fn analyze(input: &[u8], container: &CompressedContainer) -> Self {
        let freq = FrequencyTable::from_bytes(input);
        let table = CodeTable::from_tree(&container.tree);
        let tree_bytes = container.tree.serialize().len() as u64;
        let packed_bytes = container.packed.len() as u64;
        let container_bytes = HEADER_SIZE as u64 + tree_bytes + packed_bytes;
        let original_bytes = input.len() as u64;

        Self {
            original_bytes,
            container_bytes,
            tree_bytes,
            packed_bytes,
            total_bits: container.total_bits,
            padding_bits: container.padding_bits(),
            distinct_symbols: freq.distinct(),
            max_code_length: table.max_code_length(),
            entropy_bits: freq.entropy_bits(),
            avg_code_length: ratio(table.weighted_length(&freq), original_bytes),
            ratio: ratio(container_bytes, original_bytes),
            sha256: hex::encode(Sha256::digest(input)),
        }
    }

    pub fn get_insights(&self) -> Vec<String> {
        let mut insights = Vec::new();

        insights.push(format!(
            "Codes average {:.3} bits against an entropy of {:.3}",
            self.avg_code_length, self.entropy_bits
        ));

        if self.ratio >= 1.0 {
            insights.push(format!(
                "Container is {:.0}% of the input; tree and header overhead dominate",
                self.ratio * 100.0
            ));
        } else {
            insights.push(format!(
                "Container is {:.1}% of the input",
                self.ratio * 100.0
            ));
        }

        if self.distinct_symbols == 1 {
            insights.push("Single symbol input, one bit per byte".to_string());
        }

        insights
    }
}

fn ratio(num: u64, den: u64) -> f64 {
    if den == 0 {
        0.0
    } else {
        num as f64 / den as f64
    }
}
