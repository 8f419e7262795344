use tracing::{debug, trace};

use crate::engine::frequency::FrequencyTable;
use crate::engine::heap::MinHeap;
use crate::error::{Corruption, Error, Result};
use crate::utils::bits::{BitReader, BitWriter};
use crate::utils::limits::{ALPHABET_SIZE, MAX_CODE_LENGTH, MAX_TREE_NODES};

/// Index of a node in the tree arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(u32);

impl NodeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Leaf(u8),
    Internal { left: NodeId, right: NodeId },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Node {
    pub kind: NodeKind,
    pub weight: u64,
}

impl Node {
    pub fn is_leaf(&self) -> bool {
        matches!(self.kind, NodeKind::Leaf(_))
    }

    pub fn symbol(&self) -> Option<u8> {
        match self.kind {
            NodeKind::Leaf(symbol) => Some(symbol),
            NodeKind::Internal { .. } => None,
        }
    }
}

/// Heap key used while building: lighter first, then earlier insertion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct HeapEntry {
    weight: u64,
    seq: u64,
    node: NodeId,
}

/// Huffman tree stored as a flat arena.
///
/// A tree with a single distinct symbol is a bare leaf root. It is read as
/// if the root had an implicit left edge to that leaf, so the symbol's code
/// is `0` and a `1` bit at the root leads nowhere.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HuffmanTree {
    nodes: Vec<Node>,
    root: NodeId,
}

impl HuffmanTree {
    /// Builds the tree by repeatedly merging the two lightest nodes.
    ///
    /// Leaves are seeded in ascending byte order, ties go to the node that
    /// entered the heap first, and the first node extracted becomes the left
    /// child of each merge.
    pub fn build(freq: &FrequencyTable) -> Result<Self> {
        let distinct = freq.distinct();
        if distinct == 0 {
            return Err(Error::EmptyInput);
        }

        let mut nodes = Vec::with_capacity(2 * distinct - 1);
        let mut seeds = Vec::with_capacity(distinct);
        for (symbol, count) in freq.iter() {
            let node = push_node(&mut nodes, NodeKind::Leaf(symbol), count);
            seeds.push(HeapEntry {
                weight: count,
                seq: seeds.len() as u64,
                node,
            });
        }

        let mut seq = seeds.len() as u64;
        let mut heap = MinHeap::build(seeds);

        while heap.len() > 1 {
            let a = heap.extract_min();
            let b = heap.extract_min();
            let weight = a.weight + b.weight;
            let node = push_node(
                &mut nodes,
                NodeKind::Internal {
                    left: a.node,
                    right: b.node,
                },
                weight,
            );
            trace!(left = a.weight, right = b.weight, merged = weight, "merge");
            heap.insert(HeapEntry { weight, seq, node });
            seq += 1;
        }

        let root = heap.extract_min().node;
        let tree = HuffmanTree { nodes, root };
        debug!(
            symbols = distinct,
            nodes = tree.len(),
            depth = tree.depth(),
            "built huffman tree"
        );
        Ok(tree)
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    /// Number of nodes in the arena.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn leaf_count(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_leaf()).count()
    }

    /// Total weight at the root. Zero for trees read back from bytes.
    pub fn weight(&self) -> u64 {
        self.node(self.root).weight
    }

    pub fn is_single_leaf(&self) -> bool {
        self.node(self.root).is_leaf()
    }

    /// Follows one edge from `at`. Returns `None` when no child matches `bit`.
    pub fn step(&self, at: NodeId, bit: bool) -> Option<NodeId> {
        match self.node(at).kind {
            NodeKind::Internal { left, right } => Some(if bit { right } else { left }),
            NodeKind::Leaf(_) if at == self.root && !bit => Some(at),
            NodeKind::Leaf(_) => None,
        }
    }

    /// Height of the tree in edges; a bare leaf root has depth 0.
    pub fn depth(&self) -> usize {
        let mut max = 0;
        let mut stack = vec![(self.root, 0usize)];
        while let Some((id, depth)) = stack.pop() {
            match self.node(id).kind {
                NodeKind::Leaf(_) => max = max.max(depth),
                NodeKind::Internal { left, right } => {
                    stack.push((right, depth + 1));
                    stack.push((left, depth + 1));
                }
            }
        }
        max
    }

    /// Pre-order shape: `1` + 8-bit symbol for a leaf, `0` for an internal
    /// node followed by its left then right subtree. Padded to a whole byte.
    pub fn serialize(&self) -> Vec<u8> {
        let mut writer = BitWriter::with_capacity(self.nodes.len() * 2);
        let mut stack = vec![self.root];
        while let Some(id) = stack.pop() {
            match self.node(id).kind {
                NodeKind::Leaf(symbol) => {
                    writer.push_bit(true);
                    writer.push_byte(symbol);
                }
                NodeKind::Internal { left, right } => {
                    writer.push_bit(false);
                    stack.push(right);
                    stack.push(left);
                }
            }
        }
        writer.finish().0
    }

    /// Parses a tree written by [`HuffmanTree::serialize`] from the front of
    /// `data`. Returns the tree and the number of bytes it occupied.
    pub fn deserialize(data: &[u8]) -> Result<(Self, usize)> {
        let mut reader = BitReader::new(data);
        let mut seen = [false; ALPHABET_SIZE];
        // Pre-order tags: Some(symbol) for leaves, None for internal nodes
        let mut tags: Vec<Option<u8>> = Vec::new();
        let mut needed = 1usize;

        while needed > 0 {
            if tags.len() == MAX_TREE_NODES {
                return Err(Error::corrupt(
                    reader.position(),
                    Corruption::TreeTooLarge(MAX_TREE_NODES),
                ));
            }
            let is_leaf = reader
                .read_bit()
                .ok_or_else(|| Error::corrupt(reader.position(), Corruption::TruncatedTree))?;
            needed -= 1;

            if is_leaf {
                let symbol = reader
                    .read_byte()
                    .ok_or_else(|| Error::corrupt(reader.position(), Corruption::TruncatedTree))?;
                if seen[symbol as usize] {
                    return Err(Error::corrupt(
                        reader.position() - 8,
                        Corruption::DuplicateSymbol(symbol),
                    ));
                }
                seen[symbol as usize] = true;
                tags.push(Some(symbol));
            } else {
                tags.push(None);
                needed += 2;
            }
        }

        // Walking pre-order backwards, both subtrees of a node are complete
        // by the time the node itself is reached.
        let mut nodes = Vec::with_capacity(tags.len());
        let mut built: Vec<NodeId> = Vec::new();
        for tag in tags.iter().rev() {
            let kind = match *tag {
                Some(symbol) => NodeKind::Leaf(symbol),
                None => {
                    let left = built.pop();
                    let right = built.pop();
                    match (left, right) {
                        (Some(left), Some(right)) => NodeKind::Internal { left, right },
                        _ => {
                            return Err(Error::corrupt(
                                reader.position(),
                                Corruption::TruncatedTree,
                            ))
                        }
                    }
                }
            };
            built.push(push_node(&mut nodes, kind, 0));
        }

        let root = match (built.pop(), built.is_empty()) {
            (Some(root), true) => root,
            _ => {
                return Err(Error::corrupt(
                    reader.position(),
                    Corruption::TruncatedTree,
                ))
            }
        };

        Ok((HuffmanTree { nodes, root }, reader.bytes_consumed()))
    }
}

fn push_node(nodes: &mut Vec<Node>, kind: NodeKind, weight: u64) -> NodeId {
    let id = NodeId(nodes.len() as u32);
    nodes.push(Node { kind, weight });
    id
}

/// Bit-string code for every symbol present in a tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeTable {
    codes: Vec<Option<Vec<bool>>>,
    max_len: usize,
}

impl CodeTable {
    /// Depth-first walk: `0` for a left edge, `1` for a right edge.
    pub fn from_tree(tree: &HuffmanTree) -> Self {
        let mut codes = vec![None; ALPHABET_SIZE];
        let mut max_len = 0;

        if let Some(symbol) = tree.node(tree.root()).symbol() {
            codes[symbol as usize] = Some(vec![false]);
            return CodeTable { codes, max_len: 1 };
        }

        let mut stack = vec![(tree.root(), Vec::new())];
        while let Some((id, path)) = stack.pop() {
            match tree.node(id).kind {
                NodeKind::Leaf(symbol) => {
                    max_len = max_len.max(path.len());
                    codes[symbol as usize] = Some(path);
                }
                NodeKind::Internal { left, right } => {
                    let mut right_path = path.clone();
                    right_path.push(true);
                    stack.push((right, right_path));

                    let mut left_path = path;
                    left_path.push(false);
                    stack.push((left, left_path));
                }
            }
        }

        debug_assert!(max_len <= MAX_CODE_LENGTH, "code length {} over limit", max_len);
        CodeTable { codes, max_len }
    }

    pub fn get(&self, symbol: u8) -> Option<&[bool]> {
        self.codes[symbol as usize].as_deref()
    }

    pub fn max_code_length(&self) -> usize {
        self.max_len
    }

    /// Number of symbols with a code.
    pub fn len(&self) -> usize {
        self.codes.iter().filter(|c| c.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// `(symbol, code)` pairs in ascending symbol order.
    pub fn iter(&self) -> impl Iterator<Item = (u8, &[bool])> + '_ {
        self.codes
            .iter()
            .enumerate()
            .filter_map(|(symbol, code)| code.as_deref().map(|c| (symbol as u8, c)))
    }

    /// Σ frequency × code length, i.e. the encoded size in bits.
    pub fn weighted_length(&self, freq: &FrequencyTable) -> u64 {
        self.iter()
            .map(|(symbol, code)| freq.get(symbol) * code.len() as u64)
            .sum()
    }
}

/// Renders a code as a string of `0` and `1`.
pub fn format_code(code: &[bool]) -> String {
    code.iter().map(|&b| if b { '1' } else { '0' }).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree_for(input: &[u8]) -> HuffmanTree {
        HuffmanTree::build(&FrequencyTable::from_bytes(input)).unwrap()
    }

    #[test]
    fn empty_table_is_rejected() {
        let err = HuffmanTree::build(&FrequencyTable::new()).unwrap_err();
        assert!(matches!(err, Error::EmptyInput));
    }

    #[test]
    fn classic_three_symbol_shape() {
        let freq = FrequencyTable::from_bytes(b"AAAAABBBCC");
        let tree = HuffmanTree::build(&freq).unwrap();
        let table = CodeTable::from_tree(&tree);

        // C(2) + B(3) merge first, then A(5) joins as the earlier entry
        assert_eq!(format_code(table.get(b'A').unwrap()), "0");
        assert_eq!(format_code(table.get(b'C').unwrap()), "10");
        assert_eq!(format_code(table.get(b'B').unwrap()), "11");
        assert_eq!(table.max_code_length(), 2);
        assert_eq!(table.weighted_length(&freq), 15);
        assert_eq!(tree.weight(), 10);
        assert_eq!(tree.len(), 5);
    }

    #[test]
    fn ties_prefer_earlier_entries() {
        // All weights equal: a,b merge first, then c,d, then the two pairs
        let tree = tree_for(b"abcd");
        let table = CodeTable::from_tree(&tree);
        assert_eq!(format_code(table.get(b'a').unwrap()), "00");
        assert_eq!(format_code(table.get(b'b').unwrap()), "01");
        assert_eq!(format_code(table.get(b'c').unwrap()), "10");
        assert_eq!(format_code(table.get(b'd').unwrap()), "11");
    }

    #[test]
    fn single_symbol_gets_one_bit() {
        let tree = tree_for(&[b'x'; 100]);
        assert!(tree.is_single_leaf());
        assert_eq!(tree.depth(), 0);

        let table = CodeTable::from_tree(&tree);
        assert_eq!(table.get(b'x'), Some(&[false][..]));
        assert_eq!(table.max_code_length(), 1);
        assert_eq!(table.len(), 1);

        assert_eq!(tree.step(tree.root(), false), Some(tree.root()));
        assert_eq!(tree.step(tree.root(), true), None);
    }

    #[test]
    fn zero_byte_is_a_normal_leaf() {
        let tree = tree_for(&[0, 0, 0, 1]);
        let table = CodeTable::from_tree(&tree);
        assert_eq!(table.len(), 2);
        assert!(table.get(0).is_some());
        assert_eq!(tree.leaf_count(), 2);
        assert!(!tree.node(tree.root()).is_leaf());
    }

    #[test]
    fn codes_are_prefix_free() {
        let input: Vec<u8> = (0u32..2000).map(|i| (i * i % 251) as u8).collect();
        let table = CodeTable::from_tree(&tree_for(&input));
        let codes: Vec<_> = table.iter().map(|(_, c)| c.to_vec()).collect();
        for (i, a) in codes.iter().enumerate() {
            for (j, b) in codes.iter().enumerate() {
                if i != j {
                    assert!(!b.starts_with(a), "{:?} prefixes {:?}", a, b);
                }
            }
        }
    }

    #[test]
    fn fibonacci_weights_build_a_chain() {
        // Fibonacci-like weights produce the deepest possible tree
        let mut input = Vec::new();
        let (mut a, mut b) = (1u64, 1u64);
        for symbol in 0..30u8 {
            input.extend(std::iter::repeat(symbol).take(a as usize));
            let next = a + b;
            a = b;
            b = next;
        }
        let tree = tree_for(&input);
        let table = CodeTable::from_tree(&tree);
        assert_eq!(table.max_code_length(), 29);
        assert_eq!(tree.depth(), 29);
    }

    #[test]
    fn every_symbol_stays_within_code_limit() {
        // Skewed counts over the full alphabet
        let mut input = Vec::new();
        for symbol in 0..=255u8 {
            let repeats = 1 + (symbol as usize % 16) * (symbol as usize % 16);
            input.extend(std::iter::repeat(symbol).take(repeats));
        }
        let tree = tree_for(&input);
        let table = CodeTable::from_tree(&tree);
        assert_eq!(table.len(), 256);
        assert!(table.max_code_length() > 8);
        assert!(table.max_code_length() <= MAX_CODE_LENGTH);
        assert!(table.iter().all(|(_, code)| !code.is_empty() && code.len() <= MAX_CODE_LENGTH));
    }

    #[test]
    fn serialized_shape_reloads() {
        let tree = tree_for(b"AAAAABBBCC");
        let bytes = tree.serialize();
        // 0 1A 0 1C 1B -> 3 tags + 3 leaf bytes = 29 bits
        assert_eq!(bytes.len(), 4);

        let (loaded, used) = HuffmanTree::deserialize(&bytes).unwrap();
        assert_eq!(used, 4);
        assert_eq!(loaded.weight(), 0);
        assert_eq!(CodeTable::from_tree(&loaded), CodeTable::from_tree(&tree));
    }

    #[test]
    fn single_leaf_serializes_as_bare_leaf() {
        let tree = tree_for(b"qqq");
        let bytes = tree.serialize();
        assert_eq!(bytes, vec![0b1011_1000, 0b1000_0000]);
        let (loaded, used) = HuffmanTree::deserialize(&bytes).unwrap();
        assert_eq!(used, 2);
        assert!(loaded.is_single_leaf());
        assert_eq!(loaded.node(loaded.root()).symbol(), Some(b'q'));
    }

    #[test]
    fn truncated_tree_is_corrupt() {
        let bytes = tree_for(b"AAAAABBBCC").serialize();
        let err = HuffmanTree::deserialize(&bytes[..2]).unwrap_err();
        assert!(matches!(
            err,
            Error::CorruptStream { kind: Corruption::TruncatedTree, .. }
        ));
    }

    #[test]
    fn duplicate_leaf_is_corrupt() {
        let mut writer = BitWriter::new();
        writer.push_bit(false);
        writer.push_bit(true);
        writer.push_byte(7);
        writer.push_bit(true);
        writer.push_byte(7);
        let (bytes, _) = writer.finish();
        let err = HuffmanTree::deserialize(&bytes).unwrap_err();
        assert!(matches!(
            err,
            Error::CorruptStream { kind: Corruption::DuplicateSymbol(7), bit_offset: 11 }
        ));
    }

    #[test]
    fn endless_internal_nodes_are_rejected() {
        let bytes = vec![0u8; 128];
        let err = HuffmanTree::deserialize(&bytes).unwrap_err();
        assert!(matches!(
            err,
            Error::CorruptStream { kind: Corruption::TreeTooLarge(_), .. }
        ));
    }
}
