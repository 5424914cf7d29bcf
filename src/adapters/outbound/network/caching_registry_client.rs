use crate::install_guard::domain::Ecosystem;
use crate::ports::outbound::{PackageManifest, PackageRegistry};
use crate::shared::Result;
use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::Arc;

/// Cache key for manifests
#[derive(Debug, Clone, Hash, Eq, PartialEq)]
struct ManifestKey {
    name: String,
    version: String,
}

impl ManifestKey {
    fn new(name: &str, version: &str) -> Self {
        Self {
            name: name.to_string(),
            version: version.to_string(),
        }
    }
}

/// CachingPackageRegistry wraps a PackageRegistry and memoizes its answers.
///
/// The visited set only deduplicates within one root's scan; this decorator
/// lets later roots of the same install reuse manifests and latest tags the
/// earlier roots already fetched. Only successful lookups are cached, so a
/// transient failure is retried by the next root.
pub struct CachingPackageRegistry<R: PackageRegistry> {
    inner: R,
    manifests: Arc<DashMap<ManifestKey, PackageManifest>>,
    latest: Arc<DashMap<String, Option<String>>>,
}

impl<R: PackageRegistry> CachingPackageRegistry<R> {
    /// Creates a new caching registry wrapping the given inner registry
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            manifests: Arc::new(DashMap::new()),
            latest: Arc::new(DashMap::new()),
        }
    }

    /// Returns the number of cached manifests
    pub fn cached_manifests(&self) -> usize {
        self.manifests.len()
    }
}

#[async_trait]
impl<R: PackageRegistry> PackageRegistry for CachingPackageRegistry<R> {
    fn ecosystem(&self) -> Ecosystem {
        self.inner.ecosystem()
    }

    async fn fetch_latest_version(&self, name: &str) -> Result<Option<String>> {
        if let Some(cached) = self.latest.get(name) {
            return Ok(cached.clone());
        }

        let latest = self.inner.fetch_latest_version(name).await?;
        self.latest.insert(name.to_string(), latest.clone());
        Ok(latest)
    }

    async fn fetch_manifest(&self, name: &str, version: &str) -> Result<PackageManifest> {
        let key = ManifestKey::new(name, version);

        if let Some(cached) = self.manifests.get(&key) {
            return Ok(cached.clone());
        }

        let manifest = self.inner.fetch_manifest(name, version).await?;
        self.manifests.insert(key, manifest.clone());
        Ok(manifest)
    }
}
