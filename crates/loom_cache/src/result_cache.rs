//! Build results keyed by artifact identity.

use loom_source::ArtifactIdentity;
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};
use tracing::trace;

/// Thread-safe map from artifact identity to a shared build result.
///
/// Values are handed out as `Arc`s so a result can be returned to several
/// callers without copying. The cache never evicts on its own; callers
/// [`invalidate`](Self::invalidate) entries they know to be stale.
pub struct ResultCache<V> {
    entries: RwLock<HashMap<ArtifactIdentity, Arc<V>>>,
}

impl<V> ResultCache<V> {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Returns the result stored for `identity`.
    pub fn get(&self, identity: &ArtifactIdentity) -> Option<Arc<V>> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(identity)
            .cloned()
    }

    /// Stores `value` for `identity`, replacing any previous result.
    pub fn insert(&self, identity: ArtifactIdentity, value: V) -> Arc<V> {
        trace!(artifact = %identity, "caching build result");
        let value = Arc::new(value);
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(identity, Arc::clone(&value));
        value
    }

    /// Drops the result stored for `identity`, returning it.
    pub fn invalidate(&self, identity: &ArtifactIdentity) -> Option<Arc<V>> {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(identity)
    }

    /// Number of cached results.
    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Returns `true` when nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<V> Default for ResultCache<V> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_and_get() {
        let cache = ResultCache::new();
        let id = ArtifactIdentity::durable("site/Default.aspx");
        assert!(cache.get(&id).is_none());
        cache.insert(id.clone(), "ASP.Default_aspx".to_string());
        assert_eq!(cache.get(&id).as_deref().map(String::as_str), Some("ASP.Default_aspx"));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn synthetic_and_durable_are_distinct() {
        let cache = ResultCache::new();
        cache.insert(ArtifactIdentity::durable("a.aspx"), 1);
        cache.insert(ArtifactIdentity::synthetic("a.aspx", "designer"), 2);
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn invalidate_removes() {
        let cache = ResultCache::new();
        let id = ArtifactIdentity::durable("a.aspx");
        cache.insert(id.clone(), 1);
        assert_eq!(cache.invalidate(&id).as_deref(), Some(&1));
        assert!(cache.is_empty());
    }
}
