//! # huffpack
//!
//! Static Huffman compression of byte buffers.
//!
//! ```rust
//! let container = huffpack::compress(b"AAAAABBBCC")?;
//! assert_eq!(container.total_bits, 15);
//!
//! let wire = container.to_bytes();
//! let loaded = huffpack::CompressedContainer::from_bytes(&wire)?;
//! assert_eq!(huffpack::decompress(&loaded)?, b"AAAAABBBCC");
//! # Ok::<(), huffpack::Error>(())
//! ```

pub mod analytics;
pub mod config;
pub mod engine;
pub mod error;
pub mod protocol;
pub mod utils;

pub use engine::{compress, compress_with, decompress};
pub use error::{Corruption, Error, Result};
pub use protocol::CompressedContainer;
