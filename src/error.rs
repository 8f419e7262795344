//! Error types for the codec.

use thiserror::Error;

/// What kind of structural damage a decoder ran into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Corruption {
    #[error("container shorter than its {0}-byte header")]
    TruncatedHeader(usize),
    #[error("tree section ended early")]
    TruncatedTree,
    #[error("tree has more than {0} nodes")]
    TreeTooLarge(usize),
    #[error("symbol {0} appears twice in the tree")]
    DuplicateSymbol(u8),
    #[error("packed length {actual} does not match {expected} bytes for the bit count")]
    LengthMismatch { expected: u64, actual: u64 },
    #[error("bit has no matching child")]
    DeadEnd,
    #[error("bit stream exhausted after {decoded} of {expected} symbols")]
    UnexpectedEnd { decoded: u64, expected: u64 },
    #[error("{0} encoded bits left over after the last symbol")]
    TrailingBits(u64),
}

/// Error variants for compress / decompress.
#[derive(Debug, Error)]
pub enum Error {
    /// `compress` was handed zero bytes.
    #[error("cannot compress empty input")]
    EmptyInput,

    /// The stream or its tree does not describe a valid encoding.
    #[error("corrupt stream at bit {bit_offset}: {kind}")]
    CorruptStream { bit_offset: u64, kind: Corruption },

    /// The supplied code table has no entry for an input byte.
    #[error("no code for byte {symbol} at input offset {offset}")]
    MissingCode { symbol: u8, offset: usize },

    #[error("input of {len} bytes exceeds the {limit}-byte limit")]
    InputTooLarge { len: u64, limit: u64 },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    pub(crate) fn corrupt(bit_offset: u64, kind: Corruption) -> Self {
        tracing::debug!(bit_offset, %kind, "corrupt stream");
        Error::CorruptStream { bit_offset, kind }
    }

    pub fn is_corrupt(&self) -> bool {
        matches!(self, Error::CorruptStream { .. })
    }
}

/// A specialized Result type for codec operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl io::Write for Captured {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn logged_at(level: tracing::Level) -> String {
        let captured = Captured::default();
        let writer = captured.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(level)
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();

        tracing::subscriber::with_default(subscriber, || {
            let err = Error::corrupt(12, Corruption::DeadEnd);
            assert!(err.is_corrupt());
        });

        let bytes = captured.0.lock().unwrap().clone();
        String::from_utf8(bytes).unwrap()
    }

    #[test]
    fn corruption_stays_below_warn() {
        assert!(logged_at(tracing::Level::WARN).is_empty());
    }

    #[test]
    fn corruption_is_visible_at_debug() {
        let out = logged_at(tracing::Level::DEBUG);
        assert!(out.contains("corrupt stream"));
        assert!(out.contains("bit_offset=12"));
    }
}
