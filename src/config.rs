//! Configuration file support for pmguard.
//!
//! Provides YAML-based configuration through `pmguard.config.yml` files,
//! including data structures, file loading, validation, and merging with
//! command-line overrides.

use anyhow::{bail, Context};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

use crate::adapters::outbound::network::{NpmRegistryClient, PyPiRegistryClient};
use crate::application::dto::ScanSettings;
use crate::install_guard::policies::RootFailurePolicy;
use crate::shared::Result;

pub const CONFIG_FILENAME: &str = "pmguard.config.yml";

/// Environment variable overriding `analysis_api_key`
pub const API_KEY_ENV: &str = "PMGUARD_API_KEY";

/// Environment variable overriding `analysis_service_url`
pub const ANALYSIS_URL_ENV: &str = "PMGUARD_ANALYSIS_URL";

/// Top-level configuration file schema.
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFile {
    pub npm_registry_url: Option<String>,
    pub pypi_registry_url: Option<String>,
    pub analysis_service_url: Option<String>,
    pub analysis_api_key: Option<String>,
    pub queue_capacity: Option<usize>,
    pub analysis_workers: Option<usize>,
    pub max_concurrent_fetches: Option<usize>,
    pub scan_timeout_secs: Option<u64>,
    pub root_failure_policy: Option<String>,
    /// Captures unknown fields for warnings.
    #[serde(flatten)]
    pub unknown_fields: HashMap<String, serde_yaml_ng::Value>,
}

/// Load config from an explicit path. Returns an error if the file is not found.
pub fn load_config_from_path(path: &Path) -> Result<ConfigFile> {
    let content = std::fs::read_to_string(path).with_context(|| {
        format!(
            "Failed to read config file: {}\n\n💡 Hint: Check that the file exists and is readable.",
            path.display()
        )
    })?;

    let config: ConfigFile = serde_yaml_ng::from_str(&content).with_context(|| {
        format!(
            "Failed to parse config file: {}\n\n💡 Hint: Ensure the file contains valid YAML syntax.",
            path.display()
        )
    })?;

    validate_config(&config)?;
    warn_unknown_fields(&config);

    Ok(config)
}

/// Auto-discover config in a directory. Returns `None` silently if not found.
pub fn discover_config(dir: &Path) -> Result<Option<ConfigFile>> {
    let config_path = dir.join(CONFIG_FILENAME);

    if !config_path.exists() {
        return Ok(None);
    }

    let config = load_config_from_path(&config_path)?;
    Ok(Some(config))
}

/// Validate the loaded configuration.
fn validate_config(config: &ConfigFile) -> Result<()> {
    let counts = [
        ("queue_capacity", config.queue_capacity.map(|v| v as u64)),
        ("analysis_workers", config.analysis_workers.map(|v| v as u64)),
        (
            "max_concurrent_fetches",
            config.max_concurrent_fetches.map(|v| v as u64),
        ),
        ("scan_timeout_secs", config.scan_timeout_secs),
    ];
    for (field, value) in counts {
        if value == Some(0) {
            bail!(
                "Invalid config: {} must be greater than 0.\n\n\
                 💡 Hint: Remove the field to use the default.",
                field
            );
        }
    }

    let urls = [
        ("npm_registry_url", &config.npm_registry_url),
        ("pypi_registry_url", &config.pypi_registry_url),
        ("analysis_service_url", &config.analysis_service_url),
    ];
    for (field, value) in urls {
        if let Some(url) = value {
            if !(url.starts_with("https://") || url.starts_with("http://")) {
                bail!(
                    "Invalid config: {} must be an http(s) URL, got '{}'.\n\n\
                     💡 Hint: Use a full URL such as \"https://registry.npmjs.org\".",
                    field,
                    url
                );
            }
        }
    }

    if let Some(ref policy) = config.root_failure_policy {
        policy
            .parse::<RootFailurePolicy>()
            .map_err(|e| anyhow::anyhow!("Invalid config: {}", e))?;
    }

    Ok(())
}

/// Warn about unknown fields in the config file.
fn warn_unknown_fields(config: &ConfigFile) {
    for key in config.unknown_fields.keys() {
        eprintln!(
            "⚠️  Warning: Unknown config field '{}' will be ignored.",
            key
        );
    }
}

/// Values given on the command line; `None` defers to the config file.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub queue_capacity: Option<usize>,
    pub analysis_workers: Option<usize>,
    pub scan_timeout_secs: Option<u64>,
    pub skip_failed_roots: bool,
}

/// Effective configuration of one invocation.
#[derive(Debug, Clone)]
pub struct GuardConfig {
    pub npm_registry_url: String,
    pub pypi_registry_url: String,
    pub analysis_service_url: Option<String>,
    pub analysis_api_key: Option<String>,
    pub scan: ScanSettings,
}

impl GuardConfig {
    /// Merges command line, environment, config file and defaults, in that order.
    ///
    /// `env` looks up environment variables, so callers and tests control
    /// what is visible.
    pub fn resolve(
        overrides: &ConfigOverrides,
        file: Option<ConfigFile>,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self> {
        let file = file.unwrap_or_default();

        let root_failure_policy = if overrides.skip_failed_roots {
            RootFailurePolicy::SkipRoot
        } else {
            match file.root_failure_policy.as_deref() {
                Some(policy) => policy.parse().map_err(anyhow::Error::msg)?,
                None => RootFailurePolicy::default(),
            }
        };

        let scan = ScanSettings {
            queue_capacity: overrides
                .queue_capacity
                .or(file.queue_capacity)
                .unwrap_or(ScanSettings::DEFAULT_QUEUE_CAPACITY),
            analysis_workers: overrides
                .analysis_workers
                .or(file.analysis_workers)
                .unwrap_or(ScanSettings::DEFAULT_ANALYSIS_WORKERS),
            max_concurrent_fetches: file
                .max_concurrent_fetches
                .unwrap_or(ScanSettings::DEFAULT_MAX_CONCURRENT_FETCHES),
            scan_timeout: Duration::from_secs(
                overrides
                    .scan_timeout_secs
                    .or(file.scan_timeout_secs)
                    .unwrap_or(ScanSettings::DEFAULT_SCAN_TIMEOUT_SECS),
            ),
            root_failure_policy,
        };
        scan.validate()?;

        let non_empty = |value: Option<String>| value.filter(|v| !v.trim().is_empty());

        Ok(Self {
            npm_registry_url: file
                .npm_registry_url
                .unwrap_or_else(|| NpmRegistryClient::DEFAULT_BASE_URL.to_string()),
            pypi_registry_url: file
                .pypi_registry_url
                .unwrap_or_else(|| PyPiRegistryClient::DEFAULT_BASE_URL.to_string()),
            analysis_service_url: non_empty(env(ANALYSIS_URL_ENV))
                .or(non_empty(file.analysis_service_url)),
            analysis_api_key: non_empty(env(API_KEY_ENV)).or(non_empty(file.analysis_api_key)),
            scan,
        })
    }

    /// The analysis service URL, required whenever packages are scanned
    pub fn require_analysis_url(&self) -> Result<&str> {
        match self.analysis_service_url.as_deref() {
            Some(url) => Ok(url),
            None => bail!(
                "No malware analysis service configured.\n\n\
                 💡 Hint: Set analysis_service_url in {} or the {} environment variable.",
                CONFIG_FILENAME,
                ANALYSIS_URL_ENV
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn test_load_valid_config() {
        let dir = TempDir::new().unwrap();
        let config_path = dir.path().join("config.yml");
        fs::write(
            &config_path,
            r#"
npm_registry_url: https://npm.mirror.example
analysis_service_url: https://analysis.example
analysis_api_key: from-file
queue_capacity: 50
analysis_workers: 4
max_concurrent_fetches: 8
scan_timeout_secs: 60
root_failure_policy: skip-root
"#,
        )
        .unwrap();

        let config = load_config_from_path(&config_path).unwrap();
        assert_eq!(
            config.npm_registry_url.as_deref(),
            Some("https://npm.mirror.example")
        );
        assert_eq!(config.queue_capacity, Some(50));
        assert_eq!(config.analysis_workers, Some(4));
        assert_eq!(config.max_concurrent_fetches, Some(8));
        assert_eq!(config.scan_timeout_secs, Some(60));
        assert_eq!(config.root_failure_policy.as_deref(), Some("skip-root"));
        assert!(config.unknown_fields.is_empty());
    }

    #[test]
    fn test_discover_config_found() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(CONFIG_FILENAME), "analysis_workers: 2\n").unwrap();

        let config = discover_config(dir.path()).unwrap();
        assert_eq!(config.unwrap().analysis_workers, Some(2));
    }

    #[test]
    fn test_discover_config_not_found() {
        let dir = TempDir::new().unwrap();
        let config = discover_config(dir.path()).unwrap();
        assert!(config.is_none());
    }

    #[test]
    fn test_load_config_missing_file() {
        let result = load_config_from_path(Path::new("/nonexistent/config.yml"));
        let err = format!("{}", result.unwrap_err());
        assert!(err.contains("Failed to read config file"));
    }

    #[test]
    fn test_load_config_parse_error() {
        let dir = TempDir::new().unwrap();
        let config_path = dir.path().join("bad.yml");
        fs::write(&config_path, "invalid: yaml: [[[broken").unwrap();

        let err = format!("{}", load_config_from_path(&config_path).unwrap_err());
        assert!(err.contains("Failed to parse config file"));
    }

    #[test]
    fn test_zero_workers_validation_error() {
        let dir = TempDir::new().unwrap();
        let config_path = dir.path().join("config.yml");
        fs::write(&config_path, "analysis_workers: 0\n").unwrap();

        let err = format!("{}", load_config_from_path(&config_path).unwrap_err());
        assert!(err.contains("analysis_workers must be greater than 0"));
    }

    #[test]
    fn test_invalid_policy_and_url_rejected() {
        let dir = TempDir::new().unwrap();
        let config_path = dir.path().join("config.yml");

        fs::write(&config_path, "root_failure_policy: sometimes\n").unwrap();
        let err = format!("{}", load_config_from_path(&config_path).unwrap_err());
        assert!(err.contains("Invalid root failure policy"));

        fs::write(&config_path, "pypi_registry_url: pypi.org\n").unwrap();
        let err = format!("{}", load_config_from_path(&config_path).unwrap_err());
        assert!(err.contains("must be an http(s) URL"));
    }

    #[test]
    fn test_unknown_fields_are_collected() {
        let dir = TempDir::new().unwrap();
        let config_path = dir.path().join("config.yml");
        fs::write(&config_path, "analysis_workers: 3\ncolour: blue\n").unwrap();

        let config = load_config_from_path(&config_path).unwrap();
        assert!(config.unknown_fields.contains_key("colour"));
    }

    #[test]
    fn test_resolve_defaults() {
        let config = GuardConfig::resolve(&ConfigOverrides::default(), None, no_env).unwrap();

        assert_eq!(config.npm_registry_url, "https://registry.npmjs.org");
        assert_eq!(config.pypi_registry_url, "https://pypi.org");
        assert_eq!(config.scan, ScanSettings::default());
        assert!(config.analysis_service_url.is_none());
        assert!(config.require_analysis_url().is_err());
    }

    #[test]
    fn test_resolve_precedence() {
        let file = ConfigFile {
            analysis_service_url: Some("https://file.example".to_string()),
            analysis_api_key: Some("file-key".to_string()),
            analysis_workers: Some(4),
            queue_capacity: Some(20),
            scan_timeout_secs: Some(60),
            root_failure_policy: Some("fail-fast".to_string()),
            ..ConfigFile::default()
        };
        let overrides = ConfigOverrides {
            analysis_workers: Some(16),
            skip_failed_roots: true,
            ..ConfigOverrides::default()
        };
        let env = |name: &str| (name == API_KEY_ENV).then(|| "env-key".to_string());

        let config = GuardConfig::resolve(&overrides, Some(file), env).unwrap();

        assert_eq!(config.scan.analysis_workers, 16);
        assert_eq!(config.scan.queue_capacity, 20);
        assert_eq!(config.scan.scan_timeout, Duration::from_secs(60));
        assert_eq!(config.scan.root_failure_policy, RootFailurePolicy::SkipRoot);
        assert_eq!(config.analysis_api_key.as_deref(), Some("env-key"));
        assert_eq!(
            config.require_analysis_url().unwrap(),
            "https://file.example"
        );
    }

    #[test]
    fn test_resolve_rejects_zero_override() {
        let overrides = ConfigOverrides {
            scan_timeout_secs: Some(0),
            ..ConfigOverrides::default()
        };
        assert!(GuardConfig::resolve(&overrides, None, no_env).is_err());
    }
}
