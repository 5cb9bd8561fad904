use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};

/// Compute SHA-256 of an in-memory byte slice.
pub fn sha256_bytes(data: &[u8]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// Encode a raw 32-byte hash as a lowercase hex string (64 chars).
pub fn to_hex(hash: &[u8; 32]) -> String {
    hash.iter().map(|b| format!("{b:02x}")).collect()
}

/// Where the binarized copy of a source image is written.
/// Layout: `<base>/<first_2_hex_chars>/<full_hex>.processed.png`
pub fn processed_artifact_path(base: &Path, source_hash_hex: &str) -> PathBuf {
    let shard = source_hash_hex.get(..2).unwrap_or("00");
    base.join(shard).join(format!("{source_hash_hex}.processed.png"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sha256_bytes_known_vector() {
        // SHA-256 of empty bytes is a known constant.
        let hex = to_hex(&sha256_bytes(b""));
        assert_eq!(
            hex,
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn to_hex_length() {
        assert_eq!(to_hex(&sha256_bytes(b"test")).len(), 64);
    }

    #[test]
    fn artifact_path_layout() {
        let base = PathBuf::from("/tmp/idscan");
        let path = processed_artifact_path(&base, "ab12cd");
        assert_eq!(path, PathBuf::from("/tmp/idscan/ab/ab12cd.processed.png"));
    }

    #[test]
    fn artifact_path_tolerates_short_hash() {
        let path = processed_artifact_path(Path::new("/w"), "a");
        assert_eq!(path, PathBuf::from("/w/00/a.processed.png"));
    }
}
