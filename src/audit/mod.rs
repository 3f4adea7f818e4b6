//! Audit trail for anonymization operations
//!
//! Original values are never written in plaintext; entries carry SHA-256
//! hashes so an operator can correlate substitutions without recovering PII.

pub mod logger;

pub use logger::AuditLogger;

use sha2::{Digest, Sha256};

/// Hash a PII value for audit and report output
pub fn hash_value(value: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(value.as_bytes());
    let result = hasher.finalize();
    format!("{result:x}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_is_stable_and_discriminating() {
        let a = hash_value("test@example.com");
        let b = hash_value("test@example.com");
        let c = hash_value("other@example.com");
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(a.len(), 64);
    }
}
