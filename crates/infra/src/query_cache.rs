//! Explicit read cache with keyed invalidation.
//!
//! Replaces a process-wide "refetch on mutation" cache: every entry is keyed
//! by `(resource, params)` and writers invalidate what they touched.

use std::collections::{BTreeMap, HashMap};
use std::future::Future;
use std::sync::RwLock;

use chrono::{DateTime, Duration, Utc};

use bizlens_core::UserId;

/// Cache key: resource name plus sorted filter parameters.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QueryKey {
    resource: &'static str,
    params: BTreeMap<String, String>,
}

impl QueryKey {
    pub fn new(resource: &'static str) -> Self {
        Self {
            resource,
            params: BTreeMap::new(),
        }
    }

    /// Key for a resource filtered by owner (the common case).
    pub fn owned(resource: &'static str, owner: UserId) -> Self {
        Self::new(resource).param("owner_id", owner)
    }

    pub fn param(mut self, name: impl Into<String>, value: impl ToString) -> Self {
        self.params.insert(name.into(), value.to_string());
        self
    }

    pub fn resource(&self) -> &'static str {
        self.resource
    }

    fn has_param(&self, name: &str, value: &str) -> bool {
        self.params.get(name).map(String::as_str) == Some(value)
    }
}

#[derive(Debug, Clone)]
struct CachedEntry<V> {
    value: V,
    cached_at: DateTime<Utc>,
}

#[derive(Debug)]
pub struct QueryCache<V> {
    entries: RwLock<HashMap<QueryKey, CachedEntry<V>>>,
    max_age: Option<Duration>,
}

impl<V: Clone> Default for QueryCache<V> {
    fn default() -> Self {
        Self::new(None)
    }
}

impl<V: Clone> QueryCache<V> {
    /// `max_age = None` keeps entries until invalidated.
    pub fn new(max_age: Option<Duration>) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            max_age,
        }
    }

    /// Fresh cached value for `key`, if any.
    pub fn get(&self, key: &QueryKey) -> Option<V> {
        let map = self.entries.read().ok()?;
        let entry = map.get(key)?;
        if let Some(max) = self.max_age {
            if Utc::now().signed_duration_since(entry.cached_at) > max {
                return None;
            }
        }
        Some(entry.value.clone())
    }

    pub fn insert(&self, key: QueryKey, value: V) {
        if let Ok(mut map) = self.entries.write() {
            map.insert(
                key,
                CachedEntry {
                    value,
                    cached_at: Utc::now(),
                },
            );
        }
    }

    /// Return the cached value or run `fetch` and cache its success.
    ///
    /// Errors are passed through and never cached.
    pub async fn get_or_fetch<F, Fut, E>(&self, key: QueryKey, fetch: F) -> Result<V, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>>,
    {
        if let Some(hit) = self.get(&key) {
            tracing::trace!(resource = key.resource(), "query cache hit");
            return Ok(hit);
        }
        let value = fetch().await?;
        self.insert(key, value.clone());
        Ok(value)
    }

    /// Drop every entry of `resource`.
    pub fn invalidate(&self, resource: &str) {
        if let Ok(mut map) = self.entries.write() {
            map.retain(|k, _| k.resource != resource);
        }
    }

    /// Drop entries of `resource` whose `param` equals `value`.
    pub fn invalidate_where(&self, resource: &str, param: &str, value: impl ToString) {
        let value = value.to_string();
        if let Ok(mut map) = self.entries.write() {
            map.retain(|k, _| !(k.resource == resource && k.has_param(param, &value)));
        }
    }

    /// Drop the entries for one owner's view of `resource`.
    pub fn invalidate_owner(&self, resource: &str, owner: UserId) {
        self.invalidate_where(resource, "owner_id", owner);
    }

    pub fn clear(&self) {
        if let Ok(mut map) = self.entries.write() {
            map.clear();
        }
    }

    pub fn len(&self) -> usize {
        self.entries.read().map(|m| m.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn default_cache_keeps_entries_until_invalidated() {
        let cache: QueryCache<Vec<u32>> = QueryCache::default();
        assert!(cache.max_age.is_none());
        assert!(cache.is_empty());

        let key = QueryKey::new("employees");
        cache.insert(key.clone(), vec![1, 2]);
        assert_eq!(cache.get(&key), Some(vec![1, 2]));
        cache.invalidate("employees");
        assert_eq!(cache.get(&key), None);
    }

    #[tokio::test]
    async fn second_read_is_served_from_cache() {
        let cache: QueryCache<u32> = QueryCache::default();
        let calls = AtomicUsize::new(0);
        let key = QueryKey::owned("metrics", UserId::new());

        for _ in 0..3 {
            let v: Result<u32, ()> = cache
                .get_or_fetch(key.clone(), || async {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok(7)
                })
                .await;
            assert_eq!(v, Ok(7));
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn errors_are_not_cached() {
        let cache: QueryCache<u32> = QueryCache::default();
        let key = QueryKey::new("metrics");

        let first: Result<u32, &str> = cache.get_or_fetch(key.clone(), || async { Err("down") }).await;
        assert!(first.is_err());
        assert!(cache.is_empty());

        let second: Result<u32, &str> = cache.get_or_fetch(key, || async { Ok(1) }).await;
        assert_eq!(second, Ok(1));
    }

    #[test]
    fn invalidate_owner_only_drops_that_owner() {
        let cache: QueryCache<u32> = QueryCache::default();
        let alice = UserId::new();
        let bob = UserId::new();
        cache.insert(QueryKey::owned("inventory", alice), 1);
        cache.insert(QueryKey::owned("inventory", bob), 2);
        cache.insert(QueryKey::owned("metrics", alice), 3);

        cache.invalidate_owner("inventory", alice);

        assert_eq!(cache.get(&QueryKey::owned("inventory", alice)), None);
        assert_eq!(cache.get(&QueryKey::owned("inventory", bob)), Some(2));
        assert_eq!(cache.get(&QueryKey::owned("metrics", alice)), Some(3));
    }

    #[test]
    fn invalidate_resource_drops_all_its_keys() {
        let cache: QueryCache<u32> = QueryCache::default();
        cache.insert(QueryKey::owned("inventory", UserId::new()), 1);
        cache.insert(QueryKey::owned("inventory", UserId::new()), 2);
        cache.insert(QueryKey::new("employees"), 3);

        cache.invalidate("inventory");
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn stale_entries_are_ignored() {
        let cache: QueryCache<u32> = QueryCache::new(Some(Duration::zero()));
        let key = QueryKey::new("metrics");
        cache.insert(key.clone(), 1);
        std::thread::sleep(std::time::Duration::from_millis(5));
        assert_eq!(cache.get(&key), None);
    }

    #[test]
    fn param_order_does_not_matter() {
        let a = QueryKey::new("x").param("a", 1).param("b", 2);
        let b = QueryKey::new("x").param("b", 2).param("a", 1);
        assert_eq!(a, b);
    }
}
