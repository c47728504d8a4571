use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use crate::errors::Result;
use crate::path::{compile, CompiledPath};

/// Default number of distinct paths kept compiled.
pub const DEFAULT_CACHE_CAPACITY: usize = 1024;

/// Evaluation context shared by clones of an [`crate::Endpointer`].
///
/// Holds the compiled-path cache; there are no other knobs. Clones share the
/// same cache.
#[derive(Clone)]
pub struct Context {
    cache: Option<Arc<RwLock<HashMap<String, Arc<CompiledPath>>>>>,
    capacity: usize,
}

impl Default for Context {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_CACHE_CAPACITY)
    }
}

impl Context {
    /// Cache at most `capacity` paths. Once full, further paths are compiled
    /// on every call instead of evicting.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            cache: Some(Arc::new(RwLock::new(HashMap::new()))),
            capacity,
        }
    }

    /// Compile on every call.
    pub fn uncached() -> Self {
        Self { cache: None, capacity: 0 }
    }

    pub fn compiled(&self, path: &str) -> Result<Arc<CompiledPath>> {
        let Some(cache) = &self.cache else {
            return compile(path).map(Arc::new);
        };

        if let Some(hit) = cache.read().unwrap_or_else(PoisonError::into_inner).get(path) {
            return Ok(Arc::clone(hit));
        }

        let compiled = Arc::new(compile(path)?);
        let mut map = cache.write().unwrap_or_else(PoisonError::into_inner);
        if map.len() < self.capacity {
            map.entry(path.to_string()).or_insert_with(|| Arc::clone(&compiled));
        } else {
            tracing::debug!(path, capacity = self.capacity, "path cache full, not caching");
        }
        Ok(compiled)
    }

    /// Number of cached paths.
    pub fn cached_len(&self) -> usize {
        self.cache
            .as_ref()
            .map_or(0, |c| c.read().unwrap_or_else(PoisonError::into_inner).len())
    }
}
