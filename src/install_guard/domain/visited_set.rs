use std::collections::{HashMap, HashSet};
use std::sync::{Arc, RwLock};

/// Per-root memo of `name@version` keys already claimed by a fetch task.
///
/// Clones share the same underlying set. `mark` performs the check and the
/// insert under one write lock, so two tasks racing on the same key never
/// both see it as unvisited.
///
/// Requested keys whose manifest named another version (a dist-tag or a
/// range) are also remembered, so stubs created for the requested key can
/// be rewritten once the walk is done.
#[derive(Debug, Clone, Default)]
pub struct VisitedSet {
    inner: Arc<RwLock<HashSet<String>>>,
    resolutions: Arc<RwLock<HashMap<String, String>>>,
}

impl VisitedSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claims `key`. Returns `true` when the caller is the first to visit it.
    pub fn mark(&self, key: &str) -> bool {
        let mut visited = self.inner.write().unwrap_or_else(|e| e.into_inner());
        visited.insert(key.to_string())
    }

    /// Records that fetching `requested` produced `version`.
    pub fn record_resolution(&self, requested: &str, version: &str) {
        let mut resolutions = self.resolutions.write().unwrap_or_else(|e| e.into_inner());
        resolutions.insert(requested.to_string(), version.to_string());
    }

    /// Version the registry returned for `requested`, if it differed.
    pub fn resolution(&self, requested: &str) -> Option<String> {
        let resolutions = self.resolutions.read().unwrap_or_else(|e| e.into_inner());
        resolutions.get(requested).cloned()
    }

    pub fn contains(&self, key: &str) -> bool {
        let visited = self.inner.read().unwrap_or_else(|e| e.into_inner());
        visited.contains(key)
    }

    pub fn len(&self) -> usize {
        self.inner.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
