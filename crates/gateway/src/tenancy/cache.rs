//! In-memory tenant lookup cache with TTL
//!
//! Memoizes subdomain-to-organization lookups (including confirmed misses)
//! so hot tenant hosts do not hit the database on every request. Routing
//! decisions themselves are never cached; only the store lookup is.

use std::collections::HashMap;
use std::sync::RwLock;
use std::time::{Duration, Instant};
use uuid::Uuid;

/// Default cache TTL (5 minutes)
const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(300);

/// Cache entry with expiration
#[derive(Clone)]
struct CacheEntry {
    org_id: Option<Uuid>,
    expires_at: Instant,
}

impl CacheEntry {
    fn new(org_id: Option<Uuid>, ttl: Duration) -> Self {
        Self {
            org_id,
            expires_at: Instant::now() + ttl,
        }
    }

    fn is_expired(&self) -> bool {
        Instant::now() > self.expires_at
    }
}

/// Thread-safe in-memory tenant cache
pub struct TenantCache {
    /// Maps subdomain slug -> org_id (None means no active org owns the slug)
    entries: RwLock<HashMap<String, CacheEntry>>,
    ttl: Duration,
}

impl Default for TenantCache {
    fn default() -> Self {
        Self::new()
    }
}

impl TenantCache {
    /// Create a new cache with default TTL
    pub fn new() -> Self {
        Self::with_ttl(DEFAULT_CACHE_TTL)
    }

    /// Create a new cache with custom TTL
    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            ttl,
        }
    }

    /// Get the cached lookup for a subdomain
    /// Returns Some(Some(org_id)) for a cached hit
    /// Returns Some(None) if the subdomain was cached as unresolvable
    /// Returns None if not in cache or expired
    pub fn get(&self, subdomain: &str) -> Option<Option<Uuid>> {
        let entries = self.entries.read().ok()?;
        let entry = entries.get(subdomain)?;

        if entry.is_expired() {
            None
        } else {
            Some(entry.org_id)
        }
    }

    /// Cache a subdomain -> org_id lookup result
    pub fn set(&self, subdomain: &str, org_id: Option<Uuid>) {
        if let Ok(mut entries) = self.entries.write() {
            entries.insert(subdomain.to_string(), CacheEntry::new(org_id, self.ttl));
        }
    }

    /// Invalidate a specific subdomain (slug freed or club retired)
    pub fn invalidate(&self, subdomain: &str) {
        if let Ok(mut entries) = self.entries.write() {
            entries.remove(subdomain);
        }
    }

    /// Invalidate all entries for an org (status changed under us)
    pub fn invalidate_org(&self, org_id: Uuid) {
        if let Ok(mut entries) = self.entries.write() {
            entries.retain(|_, entry| entry.org_id != Some(org_id));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread::sleep;

    #[test]
    fn test_cache_get_set() {
        let cache = TenantCache::new();
        let org_id = Uuid::new_v4();

        // Initially empty
        assert!(cache.get("bowman").is_none());

        // Set and get
        cache.set("bowman", Some(org_id));
        assert_eq!(cache.get("bowman"), Some(Some(org_id)));
    }

    #[test]
    fn test_cache_negative() {
        let cache = TenantCache::new();

        // Cache a confirmed miss
        cache.set("ghost", None);
        assert_eq!(cache.get("ghost"), Some(None));
    }

    #[test]
    fn test_cache_expiration() {
        let cache = TenantCache::with_ttl(Duration::from_millis(50));
        let org_id = Uuid::new_v4();

        cache.set("bowman", Some(org_id));
        assert_eq!(cache.get("bowman"), Some(Some(org_id)));

        // Wait for expiration
        sleep(Duration::from_millis(60));
        assert!(cache.get("bowman").is_none());
    }

    #[test]
    fn test_cache_invalidate() {
        let cache = TenantCache::new();
        let org_id = Uuid::new_v4();

        cache.set("bowman", Some(org_id));
        cache.invalidate("bowman");
        assert!(cache.get("bowman").is_none());
    }

    #[test]
    fn test_cache_invalidate_org() {
        let cache = TenantCache::new();
        let org_id = Uuid::new_v4();
        let other_org = Uuid::new_v4();

        cache.set("bowman", Some(org_id));
        cache.set("bowman-juniors", Some(org_id));
        cache.set("north-ridge", Some(other_org));

        cache.invalidate_org(org_id);

        assert!(cache.get("bowman").is_none());
        assert!(cache.get("bowman-juniors").is_none());
        assert_eq!(cache.get("north-ridge"), Some(Some(other_org)));
    }
}
