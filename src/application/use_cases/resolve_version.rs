use crate::install_guard::domain::PackageRef;
use crate::install_guard::policies::normalize_version;
use crate::ports::outbound::PackageRegistry;
use crate::shared::error::GuardError;
use crate::shared::Result;

/// VersionResolver - Turns a requested package into a fetchable version
///
/// An empty version asks the registry for its `latest` dist-tag; any other
/// specifier is normalized (`^`/`~` stripped, `*` mapped to `latest`) and
/// handed to the registry as is.
pub struct VersionResolver<R> {
    registry: R,
}

impl<R: PackageRegistry> VersionResolver<R> {
    pub fn new(registry: R) -> Self {
        Self { registry }
    }

    /// Resolves `package` to a concrete version or dist-tag
    ///
    /// # Errors
    /// Returns `GuardError::Resolution` when the registry lookup fails or the
    /// package publishes no latest version
    pub async fn resolve(&self, package: &PackageRef) -> Result<PackageRef> {
        if !package.version().trim().is_empty() {
            return Ok(package.with_version(normalize_version(package.version())));
        }

        let latest = self
            .registry
            .fetch_latest_version(package.name())
            .await
            .map_err(|e| GuardError::Resolution {
                package: package.name().to_string(),
                details: format!("{:#}", e),
            })?;

        match latest {
            Some(version) => {
                tracing::debug!(package = package.name(), %version, "resolved latest version");
                Ok(package.with_version(version))
            }
            None => Err(GuardError::Resolution {
                package: package.name().to_string(),
                details: "The registry publishes no latest version".to_string(),
            }
            .into()),
        }
    }
}
