use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Progress counters shared between scan tasks and the UI.
///
/// Clones share the same counters. `fetched` counts manifests actually
/// requested from the registry (stub hits are not counted), `enqueued` and
/// `analyzed` track the analysis queue.
#[derive(Debug, Clone, Default)]
pub struct ScanProgress {
    fetched: Arc<AtomicUsize>,
    enqueued: Arc<AtomicUsize>,
    analyzed: Arc<AtomicUsize>,
}

impl ScanProgress {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_fetch(&self) {
        self.fetched.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_enqueued(&self) {
        self.enqueued.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_analyzed(&self) {
        self.analyzed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn fetched(&self) -> usize {
        self.fetched.load(Ordering::Relaxed)
    }

    pub fn enqueued(&self) -> usize {
        self.enqueued.load(Ordering::Relaxed)
    }

    pub fn analyzed(&self) -> usize {
        self.analyzed.load(Ordering::Relaxed)
    }
}
