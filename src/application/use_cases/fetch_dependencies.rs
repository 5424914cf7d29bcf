use super::ScanDeadline;
use crate::install_guard::domain::{DependencyNode, PackageRef, ScanProgress, VisitedSet};
use crate::install_guard::policies::normalize_version;
use crate::install_guard::policies::version_normalization::LATEST_TAG;
use crate::ports::outbound::PackageRegistry;
use crate::shared::error::GuardError;
use crate::shared::Result;
use futures::future::BoxFuture;
use futures::FutureExt;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

/// Dependency tree of one root together with its analysis input
#[derive(Debug, Clone)]
pub struct ResolvedGraph {
    pub tree: DependencyNode,
    /// Deduplicated `name@version` keys, root first
    pub flattened: Vec<String>,
}

/// State shared by every fetch task of one root's scan
struct FetchContext<R> {
    registry: Arc<R>,
    permits: Arc<Semaphore>,
    progress: ScanProgress,
    visited: VisitedSet,
}

impl<R> Clone for FetchContext<R> {
    fn clone(&self) -> Self {
        Self {
            registry: Arc::clone(&self.registry),
            permits: Arc::clone(&self.permits),
            progress: self.progress.clone(),
            visited: self.visited.clone(),
        }
    }
}

/// DependencyGraphFetcher - Concurrent transitive dependency walk
///
/// Every dependency edge becomes its own tokio task. A `VisitedSet` scoped to
/// the root's scan makes sure each `name@version` is fetched at most once;
/// later visits get a childless stub. A semaphore bounds how many registry
/// requests are in flight at once, independent of graph shape, and is only
/// held across the request itself so waiting parents never starve children.
pub struct DependencyGraphFetcher<R> {
    registry: Arc<R>,
    permits: Arc<Semaphore>,
    progress: ScanProgress,
}

impl<R: PackageRegistry + 'static> DependencyGraphFetcher<R> {
    pub fn new(registry: Arc<R>, max_concurrent_fetches: usize, progress: ScanProgress) -> Self {
        Self {
            registry,
            permits: Arc::new(Semaphore::new(max_concurrent_fetches.max(1))),
            progress,
        }
    }

    /// Fetches the full dependency graph of `root`
    ///
    /// # Errors
    /// - `GuardError::Fetch` if the root's own manifest cannot be fetched
    /// - `GuardError::Cancelled` if the deadline passes first; every in-flight
    ///   fetch task is aborted
    pub async fn fetch(&self, root: &PackageRef, deadline: &ScanDeadline) -> Result<ResolvedGraph> {
        let context = FetchContext {
            registry: Arc::clone(&self.registry),
            permits: Arc::clone(&self.permits),
            progress: self.progress.clone(),
            visited: VisitedSet::new(),
        };

        let visited = context.visited.clone();
        let mut tree = match tokio::time::timeout_at(
            deadline.instant(),
            fetch_node(context, root.clone()),
        )
        .await
        {
            Ok(tree) => tree?,
            Err(_) => return Err(deadline.cancelled(root.key()).into()),
        };
        // Every task has finished, so each dist-tag or range seen has its resolution.
        tree.resolve_stubs(&|key: &str| visited.resolution(key));

        let flattened = tree.flatten();
        tracing::debug!(
            root = %root,
            nodes = tree.node_count(),
            unique = flattened.len(),
            "dependency graph fetched"
        );

        Ok(ResolvedGraph { tree, flattened })
    }
}

/// Version requested for a declared dependency edge
fn edge_version(range: &str) -> String {
    let version = normalize_version(range);
    if version.is_empty() {
        LATEST_TAG.to_string()
    } else {
        version
    }
}

fn fetch_node<R: PackageRegistry + 'static>(
    context: FetchContext<R>,
    package: PackageRef,
) -> BoxFuture<'static, Result<DependencyNode>> {
    async move {
        if !context.visited.mark(&package.key()) {
            return Ok(DependencyNode::stub(package));
        }

        let manifest = {
            let _permit = context.permits.acquire().await?;
            context
                .registry
                .fetch_manifest(package.name(), package.version())
                .await
        }
        .map_err(|e| GuardError::Fetch {
            package: package.key(),
            details: format!("{:#}", e),
        })?;
        context.progress.record_fetch();

        let resolved = if manifest.version.is_empty() {
            package.clone()
        } else {
            package.with_version(manifest.version)
        };

        // A range or dist-tag may land on a version another task already owns.
        if resolved.key() != package.key() {
            context
                .visited
                .record_resolution(&package.key(), resolved.version());
            if !context.visited.mark(&resolved.key()) {
                return Ok(DependencyNode::stub(resolved));
            }
        }

        let mut node = DependencyNode::new(resolved);
        let mut children = JoinSet::new();

        for (name, range) in manifest.dependencies {
            match PackageRef::new(name.as_str(), edge_version(&range)) {
                Ok(child) => {
                    children.spawn(fetch_node(context.clone(), child));
                }
                Err(e) => {
                    tracing::warn!(parent = %node.package(), dependency = %name, error = %e, "skipping invalid dependency");
                }
            }
        }

        while let Some(joined) = children.join_next().await {
            match joined {
                Ok(Ok(child)) => node.attach(child),
                Ok(Err(e)) => {
                    tracing::warn!(parent = %node.package(), error = %e, "dropping dependency subtree");
                }
                Err(e) => {
                    tracing::warn!(parent = %node.package(), error = %e, "dependency fetch task failed");
                }
            }
        }

        Ok(node)
    }
    .boxed()
}
