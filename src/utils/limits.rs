/// Number of distinct byte values
pub const ALPHABET_SIZE: usize = 256;

/// Upper bound on tree nodes: 256 leaves plus 255 internal nodes
pub const MAX_TREE_NODES: usize = 2 * ALPHABET_SIZE - 1;

/// Longest code a 256-symbol tree can produce
pub const MAX_CODE_LENGTH: usize = ALPHABET_SIZE - 1;

/// Container header: original byte count + total bit count
pub const HEADER_SIZE: usize = 16;

/// Largest serialized tree: 511 tag bits + 256 symbol bytes, rounded up
pub const MAX_TREE_BYTES: usize = (MAX_TREE_NODES + ALPHABET_SIZE * 8).div_ceil(8);

/// Default cap on a single input
pub const MAX_INPUT_SIZE: usize = 1024 * 1024 * 1024; // 1GB
