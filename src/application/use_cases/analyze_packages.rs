use super::ScanDeadline;
use crate::install_guard::domain::{
    AnalysisVerdict, Ecosystem, MaliciousRegistry, PackageRef, ScanProgress,
};
use crate::ports::outbound::MalwareAnalysisService;
use crate::shared::error::GuardError;
use crate::shared::Result;
use std::sync::Arc;
use tokio::sync::{mpsc, watch, Mutex};
use tokio::task::JoinHandle;

/// Size of the analysis pool
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueueConfig {
    /// Items that can wait in the queue before `enqueue` blocks
    pub capacity: usize,
    /// Worker tasks submitting items concurrently
    pub workers: usize,
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            capacity: 100,
            workers: 10,
        }
    }
}

struct WorkItem {
    key: String,
    epoch: u64,
}

/// Everything a worker needs besides its receiver
struct WorkerContext<A> {
    service: Arc<A>,
    ecosystem: Ecosystem,
    malicious: MaliciousRegistry,
    progress: ScanProgress,
    pending: Arc<watch::Sender<usize>>,
    epoch: Arc<watch::Sender<u64>>,
}

/// AnalysisWorkQueue - Fixed worker pool over a bounded queue
///
/// Items are `name@version` keys. Each worker submits its item to the
/// analysis service, fetches the report and records malicious verdicts into
/// the shared `MaliciousRegistry`. Failures only affect their own item.
///
/// The pool is started once per invocation and reused for every root.
/// Cancelling a root bumps the queue epoch: in-flight calls for that root
/// are aborted and items it left behind are discarded instead of being
/// analyzed on behalf of the next root.
pub struct AnalysisWorkQueue {
    sender: Option<mpsc::Sender<WorkItem>>,
    pending: Arc<watch::Sender<usize>>,
    epoch: Arc<watch::Sender<u64>>,
    progress: ScanProgress,
    workers: Vec<JoinHandle<()>>,
}

impl AnalysisWorkQueue {
    /// Spawns `config.workers` workers on the current tokio runtime
    pub fn start<A>(
        service: Arc<A>,
        ecosystem: Ecosystem,
        malicious: MaliciousRegistry,
        progress: ScanProgress,
        config: QueueConfig,
    ) -> Self
    where
        A: MalwareAnalysisService + 'static,
    {
        let (sender, receiver) = mpsc::channel(config.capacity.max(1));
        let receiver = Arc::new(Mutex::new(receiver));
        let (pending, _) = watch::channel(0usize);
        let pending = Arc::new(pending);
        let (epoch, _) = watch::channel(0u64);
        let epoch = Arc::new(epoch);

        let context = Arc::new(WorkerContext {
            service,
            ecosystem,
            malicious,
            progress: progress.clone(),
            pending: Arc::clone(&pending),
            epoch: Arc::clone(&epoch),
        });

        let workers = (0..config.workers.max(1))
            .map(|id| {
                let receiver = Arc::clone(&receiver);
                let context = Arc::clone(&context);
                tokio::spawn(run_worker(id, receiver, context))
            })
            .collect();

        tracing::debug!(
            capacity = config.capacity,
            workers = config.workers,
            "analysis pool started"
        );

        Self {
            sender: Some(sender),
            pending,
            epoch,
            progress,
            workers,
        }
    }

    /// Queues one `name@version` key, waiting while the queue is full
    pub async fn enqueue(&self, key: impl Into<String>) -> Result<()> {
        let Some(sender) = &self.sender else {
            anyhow::bail!("Analysis queue has been shut down");
        };

        let item = WorkItem {
            key: key.into(),
            epoch: *self.epoch.borrow(),
        };

        // Counted only once a slot is reserved, so a cancelled wait leaves no phantom item.
        let slot = sender
            .reserve()
            .await
            .map_err(|_| anyhow::anyhow!("Analysis workers have stopped"))?;
        self.pending.send_modify(|n| *n += 1);
        slot.send(item);
        self.progress.record_enqueued();
        Ok(())
    }

    /// Waits until every queued item has been processed
    ///
    /// # Errors
    /// Returns `GuardError::Cancelled` for `root` if the deadline passes
    /// first; items still queued are then discarded
    pub async fn drain(&self, root: &str, deadline: &ScanDeadline) -> Result<()> {
        let mut pending = self.pending.subscribe();
        let waited = tokio::time::timeout_at(deadline.instant(), pending.wait_for(|n| *n == 0))
            .await
            .map(|idle| idle.map(|_| ()));

        match waited {
            Ok(Ok(())) => Ok(()),
            Ok(Err(_)) => anyhow::bail!("Analysis queue closed while draining"),
            Err(_) => {
                self.cancel_pending();
                Err(deadline.cancelled(root).into())
            }
        }
    }

    /// Queues all `keys` and waits for them, bounded by `deadline`
    pub async fn analyze_all(
        &self,
        root: &str,
        keys: Vec<String>,
        deadline: &ScanDeadline,
    ) -> Result<()> {
        let enqueue_all = async {
            for key in keys {
                self.enqueue(key).await?;
            }
            Ok::<_, anyhow::Error>(())
        };

        match tokio::time::timeout_at(deadline.instant(), enqueue_all).await {
            Ok(result) => result?,
            Err(_) => {
                self.cancel_pending();
                return Err(deadline.cancelled(root).into());
            }
        }

        self.drain(root, deadline).await
    }

    /// Invalidates every item queued so far
    fn cancel_pending(&self) {
        self.epoch.send_modify(|epoch| *epoch += 1);
        tracing::debug!(epoch = *self.epoch.borrow(), "discarding queued analysis items");
    }

    /// Number of items queued or in progress
    pub fn pending(&self) -> usize {
        *self.pending.borrow()
    }

    /// Closes the queue and waits for every worker to exit
    pub async fn shutdown(mut self) {
        self.sender.take();
        for worker in self.workers.drain(..) {
            if let Err(e) = worker.await {
                tracing::warn!(error = %e, "analysis worker panicked");
            }
        }
        tracing::debug!("analysis pool stopped");
    }
}

async fn run_worker<A: MalwareAnalysisService>(
    id: usize,
    receiver: Arc<Mutex<mpsc::Receiver<WorkItem>>>,
    context: Arc<WorkerContext<A>>,
) {
    loop {
        let item = receiver.lock().await.recv().await;
        let Some(item) = item else {
            break;
        };

        if item.epoch == *context.epoch.borrow() {
            let mut epoch = context.epoch.subscribe();
            tokio::select! {
                _ = context.process(&item) => {}
                _ = epoch.wait_for(|current| *current != item.epoch) => {
                    tracing::debug!(worker = id, key = %item.key, "analysis aborted by cancelled scan");
                }
            }
        } else {
            tracing::debug!(worker = id, key = %item.key, "skipping item of a cancelled scan");
        }

        context.pending.send_modify(|n| *n = n.saturating_sub(1));
    }
}

impl<A: MalwareAnalysisService> WorkerContext<A> {
    async fn process(&self, item: &WorkItem) {
        match self.analyze(&item.key).await {
            Ok(Some(verdict)) if verdict.is_malicious => {
                // A verdict that arrives after its scan was cancelled is dropped.
                if item.epoch == *self.epoch.borrow() {
                    tracing::info!(package = %verdict.package, "package flagged as malicious");
                    self.malicious.record(item.key.as_str(), verdict.summary);
                }
            }
            Ok(Some(_)) => {
                tracing::debug!(key = %item.key, "package analyzed as benign");
            }
            Ok(None) => {
                tracing::debug!(key = %item.key, "no inference available; package unverified");
            }
            Err(e) => {
                tracing::warn!(key = %item.key, error = %e, "analysis failed; package unverified");
            }
        }

        self.progress.record_analyzed();
    }

    async fn analyze(&self, key: &str) -> std::result::Result<Option<AnalysisVerdict>, GuardError> {
        let failed = |e: anyhow::Error| GuardError::Analysis {
            package: key.to_string(),
            details: format!("{:#}", e),
        };

        let package = PackageRef::parse_spec(key).map_err(failed)?;
        let analysis_id = self
            .service
            .submit(self.ecosystem, &package)
            .await
            .map_err(failed)?;
        let report = self
            .service
            .fetch_report(&analysis_id)
            .await
            .map_err(failed)?;

        Ok(report.and_then(|report| AnalysisVerdict::from_report(package, &report)))
    }
}
