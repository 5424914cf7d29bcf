use async_trait::async_trait;
use pmguard::prelude::*;
use pmguard::ports::outbound::PackageManifest;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Mock PackageRegistry serving an in-memory package graph
///
/// A manifest request for the `latest` tag answers with the version set
/// through `with_latest`, mirroring how registries resolve dist-tags.
#[derive(Clone)]
pub struct MockPackageRegistry {
    ecosystem: Ecosystem,
    manifests: HashMap<String, PackageManifest>,
    latest: HashMap<String, String>,
    manifest_requests: Arc<AtomicUsize>,
}

impl MockPackageRegistry {
    pub fn new(ecosystem: Ecosystem) -> Self {
        Self {
            ecosystem,
            manifests: HashMap::new(),
            latest: HashMap::new(),
            manifest_requests: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn with_package(mut self, name: &str, version: &str, deps: &[(&str, &str)]) -> Self {
        self.manifests.insert(
            format!("{}@{}", name, version),
            PackageManifest {
                name: name.to_string(),
                version: version.to_string(),
                dependencies: deps
                    .iter()
                    .map(|(dep, range)| (dep.to_string(), range.to_string()))
                    .collect(),
            },
        );
        self
    }

    pub fn with_latest(mut self, name: &str, version: &str) -> Self {
        self.latest.insert(name.to_string(), version.to_string());
        self
    }

    /// Number of manifest requests that reached this registry
    pub fn manifest_requests(&self) -> usize {
        self.manifest_requests.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PackageRegistry for MockPackageRegistry {
    fn ecosystem(&self) -> Ecosystem {
        self.ecosystem
    }

    async fn fetch_latest_version(&self, name: &str) -> Result<Option<String>> {
        if !self.manifests.keys().any(|key| key.starts_with(&format!("{}@", name))) {
            anyhow::bail!("Package not found: {}", name);
        }
        Ok(self.latest.get(name).cloned())
    }

    async fn fetch_manifest(&self, name: &str, version: &str) -> Result<PackageManifest> {
        self.manifest_requests.fetch_add(1, Ordering::SeqCst);

        let version = match version {
            "latest" => self
                .latest
                .get(name)
                .cloned()
                .ok_or_else(|| anyhow::anyhow!("No latest tag for {}", name))?,
            other => other.to_string(),
        };

        self.manifests
            .get(&format!("{}@{}", name, version))
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("Version not found: {}@{}", name, version))
    }
}
