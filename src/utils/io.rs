use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::Path;

use crate::error::{Error, Result};

/// Read a whole file, refusing anything over `limit` bytes
pub fn read_input(path: impl AsRef<Path>, limit: usize) -> Result<Vec<u8>> {
    let path = path.as_ref();
    let len = fs::metadata(path)?.len();
    if len > limit as u64 {
        return Err(Error::InputTooLarge {
            len,
            limit: limit as u64,
        });
    }

    let mut buf = Vec::with_capacity(len as usize);
    File::open(path)?.read_to_end(&mut buf)?;
    tracing::debug!(path = %path.display(), bytes = buf.len(), "read input");
    Ok(buf)
}

/// Write all bytes and flush
pub fn write_output(path: impl AsRef<Path>, buf: &[u8]) -> Result<()> {
    let path = path.as_ref();
    let mut file = File::create(path)?;
    file.write_all(buf)?;
    file.flush()?;
    tracing::debug!(path = %path.display(), bytes = buf.len(), "wrote output");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_then_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.bin");
        write_output(&path, b"abc").unwrap();
        assert_eq!(read_input(&path, 16).unwrap(), b"abc");
    }

    #[test]
    fn oversized_input_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("big.bin");
        write_output(&path, &[7u8; 32]).unwrap();
        let err = read_input(&path, 31).unwrap_err();
        assert!(matches!(err, Error::InputTooLarge { len: 32, limit: 31 }));
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_input(dir.path().join("nope"), 10).unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }
}
