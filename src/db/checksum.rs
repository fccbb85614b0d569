//! Checksum calculation for notice payloads.

use sha2::{Digest, Sha256};

/// Calculate the SHA-256 checksum of a raw notice payload.
///
/// Used for logging and auditing duplicate deliveries; the ivorn remains the
/// deduplication key.
///
/// # Returns
/// Hexadecimal string representation of the SHA-256 hash.
pub fn calculate_checksum(content: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content);
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checksum_consistency() {
        let payload = b"<voe:VOEvent role=\"observation\"/>";
        assert_eq!(calculate_checksum(payload), calculate_checksum(payload));
    }

    #[test]
    fn test_different_content_different_checksum() {
        assert_ne!(
            calculate_checksum(b"<voe:VOEvent role=\"observation\"/>"),
            calculate_checksum(b"<voe:VOEvent role=\"test\"/>")
        );
    }
}
