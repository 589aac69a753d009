use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur with cache operations
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Cache miss: {0}")]
    CacheMiss(String),
}

/// In-memory store for generated result sets
///
/// Values are kept as serialized JSON and expire after the configured TTL,
/// which bounds how long a results view can be re-opened.
pub struct ResultCache {
    entries: moka::future::Cache<String, Vec<u8>>,
    ttl_secs: u64,
}

impl ResultCache {
    pub fn new(capacity: u64, ttl_secs: u64) -> Self {
        let entries = moka::future::CacheBuilder::new(capacity)
            .time_to_live(Duration::from_secs(ttl_secs))
            .build();

        Self { entries, ttl_secs }
    }

    pub async fn get<T>(&self, key: &str) -> Result<T, CacheError>
    where
        T: for<'de> Deserialize<'de>,
    {
        match self.entries.get(key).await {
            Some(bytes) => {
                tracing::trace!("Cache hit: {}", key);
                Ok(serde_json::from_slice(&bytes)?)
            }
            None => {
                tracing::trace!("Cache miss: {}", key);
                Err(CacheError::CacheMiss(key.to_string()))
            }
        }
    }

    pub async fn set<T>(&self, key: &str, value: &T) -> Result<(), CacheError>
    where
        T: Serialize,
    {
        let bytes = serde_json::to_vec(value)?;
        self.entries.insert(key.to_string(), bytes).await;

        tracing::trace!("Cache set: {}", key);
        Ok(())
    }

    /// Remove an entry; returns whether it was present
    pub async fn delete(&self, key: &str) -> bool {
        self.entries.remove(key).await.is_some()
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            entries: self.entries.entry_count(),
            ttl_secs: self.ttl_secs,
        }
    }
}

/// Cache statistics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheStats {
    pub entries: u64,
    pub ttl_secs: u64,
}

/// Cache key builder
pub struct CacheKey;

impl CacheKey {
    /// Build a cache key for a generated result set
    pub fn results(result_id: &str) -> String {
        format!("results:{}", result_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_cache_set_get_delete() {
        let cache = ResultCache::new(100, 60);
        let key = CacheKey::results("abc");

        cache.set(&key, &vec![1u8, 2, 3]).await.unwrap();
        let value: Vec<u8> = cache.get(&key).await.unwrap();
        assert_eq!(value, vec![1, 2, 3]);

        assert!(cache.delete(&key).await);
        assert!(!cache.delete(&key).await);
        assert!(matches!(cache.get::<Vec<u8>>(&key).await, Err(CacheError::CacheMiss(_))));
    }

    #[test]
    fn test_cache_type_mismatch() {
        let cache = ResultCache::new(10, 60);
        tokio_test::block_on(async {
            cache.set("k", &"text").await.unwrap();
            let err = cache.get::<u32>("k").await.unwrap_err();
            assert!(matches!(err, CacheError::SerializationError(_)));
        });
    }

    #[test]
    fn test_cache_key_builder() {
        assert_eq!(CacheKey::results("123"), "results:123");
    }
}
