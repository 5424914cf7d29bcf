use crate::install_guard::domain::Ecosystem;
use crate::shared::Result;
use async_trait::async_trait;
use std::collections::BTreeMap;

/// Declared dependencies of one package version, as published by the registry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageManifest {
    pub name: String,
    /// Concrete version the registry answered with. For a dist-tag or range
    /// request this differs from the requested version.
    pub version: String,
    /// Dependency name → raw version range
    pub dependencies: BTreeMap<String, String>,
}

/// PackageRegistry port for reading package metadata
///
/// This port abstracts the package registry (npm, PyPI) used to resolve
/// versions and walk dependency graphs.
///
/// # Async Support
/// Implementations must be `Send + Sync`: one instance is shared by every
/// concurrent fetch task of a scan.
#[async_trait]
pub trait PackageRegistry: Send + Sync {
    /// Ecosystem this registry serves
    fn ecosystem(&self) -> Ecosystem;

    /// Fetches the version the `latest` dist-tag points to
    ///
    /// # Returns
    /// `None` when the package exists but publishes no latest tag
    ///
    /// # Errors
    /// Returns an error if the request fails, the registry answers with a
    /// non-success status, or the response cannot be parsed
    async fn fetch_latest_version(&self, name: &str) -> Result<Option<String>>;

    /// Fetches the dependency manifest for one package version
    ///
    /// # Arguments
    /// * `name` - Package name
    /// * `version` - Normalized version or dist-tag
    async fn fetch_manifest(&self, name: &str, version: &str) -> Result<PackageManifest>;
}

#[async_trait]
impl<R: PackageRegistry + ?Sized> PackageRegistry for std::sync::Arc<R> {
    fn ecosystem(&self) -> Ecosystem {
        (**self).ecosystem()
    }

    async fn fetch_latest_version(&self, name: &str) -> Result<Option<String>> {
        (**self).fetch_latest_version(name).await
    }

    async fn fetch_manifest(&self, name: &str, version: &str) -> Result<PackageManifest> {
        (**self).fetch_manifest(name, version).await
    }
}
