pub mod config;
pub mod frequency;
pub mod heap;
pub mod huffman;
pub mod compressor;
pub mod decompressor;

pub use compressor::*;
pub use decompressor::*;
