//! Response Cache
//! 
//! Bounded in-memory memoisation of generated text. Identical surveys render
//! identical tip prompts, so a repeat submission skips the model round trip.

use async_trait::async_trait;
use sha2::{Digest, Sha256};
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::agent::LLMProvider;

type CacheKey = [u8; 32];

#[derive(Default)]
struct CacheState {
    responses: HashMap<CacheKey, String>,
    /// Insertion order for eviction
    order: VecDeque<CacheKey>,
}

pub struct LLMCache {
    state: RwLock<CacheState>,
    capacity: usize,
}

impl LLMCache {
    pub const DEFAULT_CAPACITY: usize = 64;

    pub fn new() -> Self {
        Self::with_capacity(Self::DEFAULT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            state: RwLock::new(CacheState::default()),
            capacity: capacity.max(1),
        }
    }

    fn key(model: &str, prompt: &str, system: Option<&str>) -> CacheKey {
        let mut hasher = Sha256::new();
        for part in [model, prompt, system.unwrap_or("")] {
            hasher.update((part.len() as u64).to_le_bytes());
            hasher.update(part.as_bytes());
        }
        hasher.finalize().into()
    }

    pub async fn get(&self, model: &str, prompt: &str, system: Option<&str>) -> Option<String> {
        let key = Self::key(model, prompt, system);
        self.state.read().await.responses.get(&key).cloned()
    }

    /// Insert, evicting the oldest entry once full
    pub async fn set(&self, model: &str, prompt: &str, system: Option<&str>, response: String) {
        let key = Self::key(model, prompt, system);
        let mut state = self.state.write().await;
        if state.responses.insert(key, response).is_none() {
            state.order.push_back(key);
        }
        while state.order.len() > self.capacity {
            if let Some(oldest) = state.order.pop_front() {
                state.responses.remove(&oldest);
            }
        }
    }

    pub async fn len(&self) -> usize {
        self.state.read().await.responses.len()
    }

    pub async fn clear(&self) {
        let mut state = self.state.write().await;
        state.responses.clear();
        state.order.clear();
    }
}

impl Default for LLMCache {
    fn default() -> Self {
        Self::new()
    }
}

/// Provider decorator that answers repeats from an `LLMCache`.
/// Failed generations are never cached.
pub struct CachedProvider {
    inner: Arc<dyn LLMProvider>,
    cache: Arc<LLMCache>,
}

impl CachedProvider {
    pub fn new(inner: Arc<dyn LLMProvider>, cache: Arc<LLMCache>) -> Self {
        Self { inner, cache }
    }
}

#[async_trait]
impl LLMProvider for CachedProvider {
    async fn generate(&self, model: &str, prompt: String, system: Option<String>) -> anyhow::Result<String> {
        if let Some(cached) = self.cache.get(model, &prompt, system.as_deref()).await {
            tracing::debug!("Generation cache hit for model {}", model);
            return Ok(cached);
        }

        let response = self.inner.generate(model, prompt.clone(), system.clone()).await?;
        self.cache.set(model, &prompt, system.as_deref(), response.clone()).await;
        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingProvider {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl LLMProvider for CountingProvider {
        async fn generate(&self, _model: &str, prompt: String, _system: Option<String>) -> anyhow::Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if prompt == "fail" {
                anyhow::bail!("boom");
            }
            Ok(format!("echo {}", prompt))
        }
    }

    #[tokio::test]
    async fn test_cache_get_set() {
        let cache = LLMCache::new();
        cache.set("m", "hello", Some("sys"), "hi".into()).await;
        assert_eq!(cache.get("m", "hello", Some("sys")).await.as_deref(), Some("hi"));
        assert!(cache.get("m", "hello", None).await.is_none());
    }

    #[tokio::test]
    async fn test_cache_evicts_oldest() {
        let cache = LLMCache::with_capacity(2);
        cache.set("m", "a", None, "1".into()).await;
        cache.set("m", "b", None, "2".into()).await;
        cache.set("m", "c", None, "3".into()).await;
        assert_eq!(cache.len().await, 2);
        assert!(cache.get("m", "a", None).await.is_none());
        assert_eq!(cache.get("m", "c", None).await.as_deref(), Some("3"));
    }

    #[tokio::test]
    async fn test_cache_clear() {
        let cache = LLMCache::new();
        cache.set("m", "p", None, "r".into()).await;
        cache.clear().await;
        assert_eq!(cache.len().await, 0);
    }

    #[tokio::test]
    async fn test_cached_provider_skips_repeat_calls() {
        let inner = Arc::new(CountingProvider { calls: AtomicUsize::new(0) });
        let provider = CachedProvider::new(inner.clone(), Arc::new(LLMCache::new()));

        assert_eq!(provider.generate("m", "x".into(), None).await.unwrap(), "echo x");
        assert_eq!(provider.generate("m", "x".into(), None).await.unwrap(), "echo x");
        assert_eq!(inner.calls.load(Ordering::SeqCst), 1);

        assert!(provider.generate("m", "fail".into(), None).await.is_err());
        assert!(provider.generate("m", "fail".into(), None).await.is_err());
        assert_eq!(inner.calls.load(Ordering::SeqCst), 3);
    }
}
