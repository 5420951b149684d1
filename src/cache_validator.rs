use hex;
use sha2::{Digest, Sha256};

/// Validates cached upstream responses using SHA-256 checksums
///
/// Protects the response cache against poisoning by:
/// 1. Generating a checksum when a response is cached
/// 2. Validating the checksum when the response is retrieved
/// 3. Rejecting corrupted or tampered entries (treated as a cache miss)

/// Wrapper for a cached response with integrity validation
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct ValidatedCacheEntry {
    /// The cached response (JSON string)
    pub data: String,
    /// SHA-256 checksum of the data (hex encoded)
    pub checksum: String,
}

impl ValidatedCacheEntry {
    /// Creates a new validated cache entry with computed checksum
    pub fn new(data: String) -> Self {
        let checksum = Self::compute_checksum(&data);
        Self { data, checksum }
    }

    /// Computes SHA-256 checksum of the data
    fn compute_checksum(data: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(data.as_bytes());
        hex::encode(hasher.finalize())
    }

    /// Validates the integrity of the cached data
    ///
    /// Returns true if the checksum matches, false if tampered
    pub fn is_valid(&self) -> bool {
        let computed = Self::compute_checksum(&self.data);
        computed == self.checksum
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_entry_validation() {
        let data = r#"{"status":200,"headers":[],"body":[]}"#.to_string();
        let entry = ValidatedCacheEntry::new(data.clone());

        assert!(entry.is_valid());
        assert_eq!(entry.data, data);
    }

    #[test]
    fn test_tampered_data_rejected() {
        let data = r#"{"status":200,"headers":[],"body":[]}"#.to_string();
        let entry = ValidatedCacheEntry::new(data);

        // Tamper with the data
        let mut tampered = entry;
        tampered.data = r#"{"status":500,"headers":[],"body":[]}"#.to_string();

        assert!(!tampered.is_valid());
    }

    #[test]
    fn test_checksum_consistency() {
        let data = "cached response".to_string();
        let entry1 = ValidatedCacheEntry::new(data.clone());
        let entry2 = ValidatedCacheEntry::new(data);

        assert_eq!(entry1.checksum, entry2.checksum);
    }
}
