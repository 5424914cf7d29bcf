use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

/// A package flagged as malicious, as shown to the user before confirming
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlaggedPackage {
    pub key: String,
    pub summary: String,
}

/// Shared `name@version` → summary map of malicious verdicts.
///
/// Append-only for the lifetime of one invocation and shared across all of
/// its roots. The first summary recorded for a key wins.
#[derive(Debug, Clone, Default)]
pub struct MaliciousRegistry {
    entries: Arc<Mutex<BTreeMap<String, String>>>,
}

impl MaliciousRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a verdict. Returns `false` if the key was already present.
    pub fn record(&self, key: impl Into<String>, summary: impl Into<String>) -> bool {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        let key = key.into();
        if entries.contains_key(&key) {
            return false;
        }
        entries.insert(key, summary.into());
        true
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Flagged packages sorted by key.
    pub fn snapshot(&self) -> Vec<FlaggedPackage> {
        self.entries
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .iter()
            .map(|(key, summary)| FlaggedPackage {
                key: key.clone(),
                summary: summary.clone(),
            })
            .collect()
    }
}
