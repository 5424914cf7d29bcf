use super::http::{build_client, get_json_with_retry, DEFAULT_MAX_RETRIES};
use crate::install_guard::domain::Ecosystem;
use crate::install_guard::policies::version_normalization::LATEST_TAG;
use crate::ports::outbound::{PackageManifest, PackageRegistry};
use crate::shared::security::validate_url_component;
use crate::shared::Result;
use async_trait::async_trait;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::time::Duration;

#[derive(Debug, Deserialize)]
struct PyPiPackageInfo {
    info: PyPiInfo,
}

#[derive(Debug, Deserialize)]
struct PyPiInfo {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    version: Option<String>,
    #[serde(default)]
    requires_dist: Option<Vec<String>>,
}

/// PyPiRegistryClient adapter for the PyPI JSON API
///
/// Implements the PackageRegistry port. Dependencies come from
/// `info.requires_dist`; requirements only pulled in by an extra are skipped,
/// `==` pins keep their version and every other specifier resolves to the
/// latest release.
pub struct PyPiRegistryClient {
    client: reqwest::Client,
    base_url: String,
    max_retries: u32,
}

impl PyPiRegistryClient {
    pub const DEFAULT_BASE_URL: &'static str = "https://pypi.org";
    const TIMEOUT_SECONDS: u64 = 10;

    /// Creates a client for pypi.org
    pub fn new() -> Result<Self> {
        Self::with_base_url(Self::DEFAULT_BASE_URL)
    }

    /// Creates a client for a PyPI compatible index
    pub fn with_base_url(base_url: &str) -> Result<Self> {
        Ok(Self {
            client: build_client(Duration::from_secs(Self::TIMEOUT_SECONDS))?,
            base_url: base_url.trim_end_matches('/').to_string(),
            max_retries: DEFAULT_MAX_RETRIES,
        })
    }

    async fn fetch_info(&self, name: &str, version: Option<&str>) -> Result<Option<PyPiInfo>> {
        // Security: Validate URL components before using them
        validate_url_component(name, "Package name")?;
        let encoded_name = urlencoding::encode(name);

        let url = match version {
            Some(version) => {
                validate_url_component(version, "Version")?;
                format!(
                    "{}/pypi/{}/{}/json",
                    self.base_url,
                    encoded_name,
                    urlencoding::encode(version)
                )
            }
            None => format!("{}/pypi/{}/json", self.base_url, encoded_name),
        };

        let package_info: Option<PyPiPackageInfo> =
            get_json_with_retry(&self.client, &url, self.max_retries).await?;
        Ok(package_info.map(|p| p.info))
    }
}

/// Parses one `requires_dist` entry into `(name, version range)`.
///
/// Returns `None` for requirements gated on an extra.
fn parse_requires_dist(requirement: &str) -> Option<(String, String)> {
    let (spec, marker) = match requirement.split_once(';') {
        Some((spec, marker)) => (spec.trim(), Some(marker)),
        None => (requirement.trim(), None),
    };

    if marker.is_some_and(|m| m.contains("extra")) {
        return None;
    }

    let name_end = spec
        .find(|c: char| !(c.is_alphanumeric() || c == '-' || c == '_' || c == '.'))
        .unwrap_or(spec.len());
    let name = &spec[..name_end];
    if name.is_empty() {
        return None;
    }

    let rest = spec[name_end..].trim_start();
    let rest = match rest.strip_prefix('[') {
        Some(extras) => extras.split_once(']').map(|(_, after)| after).unwrap_or(""),
        None => rest,
    };
    let constraint = rest
        .trim()
        .trim_start_matches('(')
        .trim_end_matches(')')
        .trim();

    let version = match constraint.strip_prefix("==") {
        Some(pinned) if !pinned.contains(',') && !pinned.contains('*') => {
            pinned.trim().to_string()
        }
        _ => "*".to_string(),
    };

    Some((name.to_string(), version))
}

#[async_trait]
impl PackageRegistry for PyPiRegistryClient {
    fn ecosystem(&self) -> Ecosystem {
        Ecosystem::PyPi
    }

    async fn fetch_latest_version(&self, name: &str) -> Result<Option<String>> {
        match self.fetch_info(name, None).await? {
            Some(info) => Ok(info.version),
            None => anyhow::bail!("Package {} was not found on PyPI", name),
        }
    }

    async fn fetch_manifest(&self, name: &str, version: &str) -> Result<PackageManifest> {
        let requested = (version != LATEST_TAG).then_some(version);

        let Some(info) = self.fetch_info(name, requested).await? else {
            anyhow::bail!("Version {} of {} was not found on PyPI", version, name);
        };

        let dependencies: BTreeMap<String, String> = info
            .requires_dist
            .unwrap_or_default()
            .iter()
            .filter_map(|requirement| parse_requires_dist(requirement))
            .collect();

        Ok(PackageManifest {
            name: info.name.unwrap_or_else(|| name.to_string()),
            version: info.version.unwrap_or_else(|| version.to_string()),
            dependencies,
        })
    }
}
