use crc32fast::Hasher;

/// Compute CRC32 checksum for a byte slice
pub fn crc32(data: &[u8]) -> u32 {
    let mut hasher = Hasher::new();
    hasher.update(data);
    hasher.finalize()
}

/// True when `restored` matches `original` in both length and checksum
pub fn verify_roundtrip(original: &[u8], restored: &[u8]) -> bool {
    original.len() == restored.len() && crc32(original) == crc32(restored)
}
