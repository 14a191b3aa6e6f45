use super::definition::{PatternDefinition, PatternKey};
use super::source::{BuiltinPatternSource, PatternSource};
use screenforge_core::{Result, ScreenforgeError};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// Read-mostly cache of pattern definitions keyed by `(family, variant)`.
///
/// Entries are never mutated in place; a stale entry is dropped with
/// [`PatternCache::invalidate`] or [`PatternCache::clear`] and loaded again.
#[derive(Debug, Default)]
pub struct PatternCache {
    entries: RwLock<HashMap<PatternKey, Arc<PatternDefinition>>>,
}

impl PatternCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &PatternKey) -> Option<Arc<PatternDefinition>> {
        self.entries.read().unwrap_or_else(|e| e.into_inner()).get(key).cloned()
    }

    /// Insert a definition. If the key is already cached the existing entry
    /// is kept and returned, so concurrent loads of one key agree.
    pub fn put(&self, definition: PatternDefinition) -> Arc<PatternDefinition> {
        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        entries.entry(definition.key()).or_insert_with(|| Arc::new(definition)).clone()
    }

    pub fn invalidate(&self, key: &PatternKey) -> bool {
        self.entries.write().unwrap_or_else(|e| e.into_inner()).remove(key).is_some()
    }

    pub fn clear(&self) {
        self.entries.write().unwrap_or_else(|e| e.into_inner()).clear();
    }

    pub fn len(&self) -> usize {
        self.entries.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Loads pattern definitions from a [`PatternSource`] through a [`PatternCache`].
pub struct PatternRegistry {
    source: Arc<dyn PatternSource>,
    cache: PatternCache,
}

impl PatternRegistry {
    pub fn new(source: Arc<dyn PatternSource>) -> Self {
        Self { source, cache: PatternCache::new() }
    }

    /// Registry over the built-in patterns only.
    pub fn builtin() -> Self {
        Self::new(Arc::new(BuiltinPatternSource))
    }

    pub fn cache(&self) -> &PatternCache {
        &self.cache
    }

    pub fn source_name(&self) -> &str {
        self.source.name()
    }

    pub fn cached(&self, key: &PatternKey) -> Option<Arc<PatternDefinition>> {
        self.cache.get(key)
    }

    pub fn invalidate(&self, key: &PatternKey) -> bool {
        self.cache.invalidate(key)
    }

    pub fn clear_cache(&self) {
        tracing::debug!(entries = self.cache.len(), "clearing pattern cache");
        self.cache.clear();
    }

    /// Return the definition for `key`, fetching and checking it on a cache miss.
    ///
    /// Cached entries are re-checked so a corrupt entry surfaces as an error
    /// instead of reaching synthesis.
    pub async fn load(&self, key: &PatternKey) -> Result<Arc<PatternDefinition>> {
        if let Some(cached) = self.cache.get(key) {
            cached.check()?;
            return Ok(cached);
        }

        let definition = self.source.fetch(key).await?;
        if definition.key() != *key {
            return Err(ScreenforgeError::configuration(
                &key.family,
                key.variant,
                format!("source '{}' returned pattern {}", self.source.name(), definition.key()),
            ));
        }
        definition.check()?;

        tracing::debug!(pattern = %key, source = self.source.name(), "pattern loaded");
        Ok(self.cache.put(definition))
    }

    /// [`PatternRegistry::load`] with exactly one retry after clearing the cache.
    pub async fn load_with_retry(&self, key: &PatternKey) -> Result<Arc<PatternDefinition>> {
        match self.load(key).await {
            Ok(definition) => Ok(definition),
            Err(first) => {
                tracing::warn!(
                    pattern = %key,
                    error = %first,
                    "pattern load failed, retrying after cache clear"
                );
                self.clear_cache();
                self.load(key).await.map_err(|second| {
                    tracing::error!(pattern = %key, error = %second, "pattern load failed twice");
                    second
                })
            }
        }
    }

    /// Keys the underlying source can serve.
    pub async fn available(&self) -> Result<Vec<PatternKey>> {
        self.source.list().await
    }
}
