//! Cache Entry Module
//!
//! Defines the record kept per key by the in-process store.

use std::time::Duration;

use tokio::time::Instant;

use crate::cache::CacheValue;

// == Cache Entry ==
/// A stored value plus its optional expiration instant.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    /// The stored value
    pub value: CacheValue,
    /// Expiration instant, None = no expiration
    pub expires_at: Option<Instant>,
}

impl CacheEntry {
    // == Constructor ==
    /// Creates a new entry relative to `now`.
    ///
    /// A TTL of zero or less yields an entry that is already expired at `now`.
    /// A TTL too large to represent as an instant never expires.
    pub fn new(value: CacheValue, ttl_seconds: Option<i64>, now: Instant) -> Self {
        let expires_at = match ttl_seconds {
            None => None,
            Some(ttl) => match u64::try_from(ttl) {
                Ok(secs) => now.checked_add(Duration::from_secs(secs)),
                Err(_) => Some(now),
            },
        };

        Self { value, expires_at }
    }

    // == Is Expired ==
    /// Checks whether the entry is expired at `now`.
    ///
    /// Boundary condition: an entry is expired once `now >= expires_at`, so a
    /// read exactly at the TTL boundary already observes absence.
    pub fn is_expired_at(&self, now: Instant) -> bool {
        match self.expires_at {
            Some(expires) => now >= expires,
            None => false,
        }
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_entry_creation_no_ttl() {
        let now = Instant::now();
        let entry = CacheEntry::new(json!("test_value"), None, now);

        assert_eq!(entry.value, json!("test_value"));
        assert!(entry.expires_at.is_none());
        assert!(!entry.is_expired_at(now + Duration::from_secs(3600)));
    }

    #[test]
    fn test_entry_creation_with_ttl() {
        let now = Instant::now();
        let entry = CacheEntry::new(json!(42), Some(60), now);

        assert_eq!(entry.expires_at, Some(now + Duration::from_secs(60)));
        assert!(!entry.is_expired_at(now));
        assert!(!entry.is_expired_at(now + Duration::from_secs(59)));
    }

    #[test]
    fn test_expiration_boundary_condition() {
        let now = Instant::now();
        let entry = CacheEntry::new(json!("v"), Some(1), now);

        assert!(!entry.is_expired_at(now + Duration::from_millis(999)));
        assert!(entry.is_expired_at(now + Duration::from_secs(1)));
    }

    #[test]
    fn test_zero_and_negative_ttl_expire_immediately() {
        let now = Instant::now();

        assert!(CacheEntry::new(json!("v"), Some(0), now).is_expired_at(now));
        assert!(CacheEntry::new(json!("v"), Some(-5), now).is_expired_at(now));
    }

    #[test]
    fn test_unrepresentable_ttl_never_expires() {
        let now = Instant::now();
        let entry = CacheEntry::new(json!("v"), Some(i64::MAX), now);

        assert!(entry.expires_at.is_none());
        assert!(!entry.is_expired_at(now + Duration::from_secs(86_400 * 365)));
    }
}
