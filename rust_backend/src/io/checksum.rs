//! Fingerprint of an emitted record set.

use sha2::{Digest, Sha256};

use crate::core::domain::ObservationRecord;
use crate::core::error::{PreschedError, PreschedResult};

/// SHA-256 of `content`, hex encoded.
pub fn calculate_checksum(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    let result = hasher.finalize();
    hex::encode(result)
}

/// Checksum of the compact JSON serialisation of `records`.
///
/// Two runs on identical inputs produce identical checksums.
pub fn record_checksum(records: &[ObservationRecord]) -> PreschedResult<String> {
    let json = serde_json::to_string(records)
        .map_err(|e| PreschedError::ParseError(format!("Failed to serialise records: {}", e)))?;
    Ok(calculate_checksum(&json))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checksum_consistency() {
        let content = r#"{"field": "COSMOS"}"#;
        assert_eq!(calculate_checksum(content), calculate_checksum(content));
        assert_eq!(calculate_checksum(content).len(), 64);
    }

    #[test]
    fn test_different_content_different_checksum() {
        assert_ne!(calculate_checksum("[1]"), calculate_checksum("[2]"));
    }

    #[test]
    fn test_empty_record_set() {
        assert_eq!(record_checksum(&[]).unwrap(), calculate_checksum("[]"));
    }
}
