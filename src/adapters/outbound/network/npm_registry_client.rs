use super::http::{build_client, get_json_with_retry, DEFAULT_MAX_RETRIES};
use crate::install_guard::domain::Ecosystem;
use crate::ports::outbound::{PackageManifest, PackageRegistry};
use crate::shared::security::validate_url_component;
use crate::shared::Result;
use async_trait::async_trait;
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use std::time::Duration;

#[derive(Debug, Deserialize)]
struct NpmPackument {
    #[serde(default, rename = "dist-tags")]
    dist_tags: HashMap<String, String>,
}

#[derive(Debug, Deserialize)]
struct NpmVersionManifest {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    version: Option<String>,
    #[serde(default)]
    dependencies: BTreeMap<String, String>,
}

/// NpmRegistryClient adapter for the npm registry HTTP API
///
/// Implements the PackageRegistry port against `registry.npmjs.org` (or any
/// compatible mirror). Only runtime `dependencies` are walked; dev and peer
/// dependencies are not installed for consumers and are ignored.
pub struct NpmRegistryClient {
    client: reqwest::Client,
    base_url: String,
    max_retries: u32,
}

impl NpmRegistryClient {
    pub const DEFAULT_BASE_URL: &'static str = "https://registry.npmjs.org";
    const TIMEOUT_SECONDS: u64 = 15;

    /// Creates a client for the public npm registry
    pub fn new() -> Result<Self> {
        Self::with_base_url(Self::DEFAULT_BASE_URL)
    }

    /// Creates a client for a registry mirror
    pub fn with_base_url(base_url: &str) -> Result<Self> {
        Ok(Self {
            client: build_client(Duration::from_secs(Self::TIMEOUT_SECONDS))?,
            base_url: base_url.trim_end_matches('/').to_string(),
            max_retries: DEFAULT_MAX_RETRIES,
        })
    }

    /// Encodes a package name for the URL path.
    ///
    /// Scoped names keep their `@` and have the scope separator encoded, the
    /// form the registry expects (`@types%2Fnode`).
    fn encode_name(name: &str) -> Result<String> {
        let (scope, bare) = match name.strip_prefix('@').and_then(|n| n.split_once('/')) {
            Some((scope, bare)) => (Some(scope), bare),
            None => (None, name),
        };

        validate_url_component(bare, "Package name")?;
        let encoded_bare = urlencoding::encode(bare);

        match scope {
            Some(scope) => {
                validate_url_component(scope, "Package scope")?;
                Ok(format!("@{}%2F{}", urlencoding::encode(scope), encoded_bare))
            }
            None => Ok(encoded_bare.into_owned()),
        }
    }
}

#[async_trait]
impl PackageRegistry for NpmRegistryClient {
    fn ecosystem(&self) -> Ecosystem {
        Ecosystem::Npm
    }

    async fn fetch_latest_version(&self, name: &str) -> Result<Option<String>> {
        let url = format!("{}/{}", self.base_url, Self::encode_name(name)?);

        let packument: Option<NpmPackument> =
            get_json_with_retry(&self.client, &url, self.max_retries).await?;

        match packument {
            Some(mut packument) => Ok(packument.dist_tags.remove("latest")),
            None => anyhow::bail!("Package {} was not found in the npm registry", name),
        }
    }

    async fn fetch_manifest(&self, name: &str, version: &str) -> Result<PackageManifest> {
        validate_url_component(version, "Version")?;
        let url = format!(
            "{}/{}/{}",
            self.base_url,
            Self::encode_name(name)?,
            urlencoding::encode(version)
        );

        let manifest: Option<NpmVersionManifest> =
            get_json_with_retry(&self.client, &url, self.max_retries).await?;

        let Some(manifest) = manifest else {
            anyhow::bail!("Version {} of {} was not found in the npm registry", version, name);
        };

        Ok(PackageManifest {
            name: manifest.name.unwrap_or_else(|| name.to_string()),
            version: manifest.version.unwrap_or_else(|| version.to_string()),
            dependencies: manifest.dependencies,
        })
    }
}
