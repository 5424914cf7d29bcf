use crate::shared::error::GuardError;
use crate::shared::security::validate_package_lengths;
use crate::shared::Result;
use serde::Serialize;

/// Package ecosystem a registry and the analysis service understand
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Ecosystem {
    #[serde(rename = "npm")]
    Npm,
    #[serde(rename = "pypi")]
    PyPi,
}

impl Ecosystem {
    pub fn as_str(&self) -> &'static str {
        match self {
            Ecosystem::Npm => "npm",
            Ecosystem::PyPi => "pypi",
        }
    }
}

impl std::fmt::Display for Ecosystem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A package name paired with a (possibly still unresolved) version.
///
/// The version may be empty (resolve from the registry's latest tag), a
/// concrete version, a dist-tag, or a range qualifier that is normalized
/// before it reaches the registry.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PackageRef {
    name: String,
    version: String,
}

impl PackageRef {
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Result<Self> {
        let name = name.into();
        let version = version.into();

        if name.trim().is_empty() {
            anyhow::bail!("Package name cannot be empty");
        }
        validate_package_lengths(&name, &version)?;

        Ok(Self { name, version })
    }

    /// Parses an npm style `name@version` spec.
    ///
    /// A leading `@` belongs to the scope, so `@scope/pkg@1.0.0` splits into
    /// `("@scope/pkg", "1.0.0")` and `@scope/pkg` has an empty version. More
    /// than one version separator is rejected.
    pub fn parse_spec(spec: &str) -> Result<Self> {
        let invalid = |reason: &str| GuardError::InvalidPackageSpec {
            spec: spec.to_string(),
            reason: reason.to_string(),
        };

        let (scope_prefix, body) = match spec.strip_prefix('@') {
            Some(rest) => ("@", rest),
            None => ("", spec),
        };

        let parts: Vec<&str> = body.split('@').collect();
        let (name, version) = match parts.as_slice() {
            [name] => (*name, ""),
            [name, version] => (*name, *version),
            _ => return Err(invalid("more than one '@' version separator").into()),
        };

        if name.is_empty() {
            return Err(invalid("package name is empty").into());
        }
        if !scope_prefix.is_empty() && !name.contains('/') {
            return Err(invalid("scoped package is missing '/name'").into());
        }

        Self::new(format!("{}{}", scope_prefix, name), version)
    }

    /// Parses a pip requirement as typed on the command line.
    ///
    /// Only `==` pins carry a version; extras are dropped and any other
    /// specifier leaves the version empty so the latest release is resolved.
    pub fn parse_requirement(requirement: &str) -> Result<Self> {
        let requirement = requirement.trim();
        let name_end = requirement
            .find(|c: char| !(c.is_alphanumeric() || c == '-' || c == '_' || c == '.'))
            .unwrap_or(requirement.len());
        let name = &requirement[..name_end];

        if name.is_empty() {
            return Err(GuardError::InvalidPackageSpec {
                spec: requirement.to_string(),
                reason: "requirement does not start with a package name".to_string(),
            }
            .into());
        }

        let rest = &requirement[name_end..];
        let rest = match rest.strip_prefix('[') {
            Some(extras) => extras.split_once(']').map(|(_, after)| after).unwrap_or(""),
            None => rest,
        };

        let version = match rest.trim().strip_prefix("==") {
            Some(pinned) if !pinned.contains(',') => pinned.trim(),
            _ => "",
        };

        Self::new(name, version)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    /// Returns a copy pointing at another version of the same package.
    pub fn with_version(&self, version: impl Into<String>) -> Self {
        Self {
            name: self.name.clone(),
            version: version.into(),
        }
    }

    /// The `name@version` key used by the visited set, the flattened
    /// dependency list and the malicious registry.
    pub fn key(&self) -> String {
        format!("{}@{}", self.name, self.version)
    }
}

impl std::fmt::Display for PackageRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.version.is_empty() {
            write!(f, "{}", self.name)
        } else {
            write!(f, "{}@{}", self.name, self.version)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_spec_plain() {
        let pkg = PackageRef::parse_spec("pkg@1.0.0").unwrap();
        assert_eq!(pkg.name(), "pkg");
        assert_eq!(pkg.version(), "1.0.0");
    }

    #[test]
    fn test_parse_spec_scoped_with_version() {
        let pkg = PackageRef::parse_spec("@scope/pkg@1.0.0").unwrap();
        assert_eq!(pkg.name(), "@scope/pkg");
        assert_eq!(pkg.version(), "1.0.0");
    }

    #[test]
    fn test_parse_spec_scoped_without_version() {
        let pkg = PackageRef::parse_spec("@scope/pkg").unwrap();
        assert_eq!(pkg.name(), "@scope/pkg");
        assert_eq!(pkg.version(), "");
    }

    #[test]
    fn test_parse_spec_without_version() {
        let pkg = PackageRef::parse_spec("express").unwrap();
        assert_eq!(pkg.name(), "express");
        assert_eq!(pkg.version(), "");
    }

    #[test]
    fn test_parse_spec_multiple_separators() {
        let err = PackageRef::parse_spec("pkg@1@2").unwrap_err();
        assert!(matches!(
            err.downcast_ref::<GuardError>(),
            Some(GuardError::InvalidPackageSpec { .. })
        ));
    }

    #[test]
    fn test_parse_spec_empty_name() {
        assert!(PackageRef::parse_spec("@1.0.0").is_err());
        assert!(PackageRef::parse_spec("").is_err());
    }

    #[test]
    fn test_parse_spec_range_kept_verbatim() {
        let pkg = PackageRef::parse_spec("lodash@^4.17.0").unwrap();
        assert_eq!(pkg.version(), "^4.17.0");
    }

    #[test]
    fn test_parse_requirement_pinned() {
        let pkg = PackageRef::parse_requirement("requests==2.31.0").unwrap();
        assert_eq!(pkg.name(), "requests");
        assert_eq!(pkg.version(), "2.31.0");
    }

    #[test]
    fn test_parse_requirement_with_extras() {
        let pkg = PackageRef::parse_requirement("requests[socks]==2.31.0").unwrap();
        assert_eq!(pkg.name(), "requests");
        assert_eq!(pkg.version(), "2.31.0");
    }

    #[test]
    fn test_parse_requirement_range_resolves_latest() {
        let pkg = PackageRef::parse_requirement("django>=4.2").unwrap();
        assert_eq!(pkg.name(), "django");
        assert_eq!(pkg.version(), "");

        let pkg = PackageRef::parse_requirement("flask").unwrap();
        assert_eq!(pkg.version(), "");
    }

    #[test]
    fn test_parse_requirement_invalid() {
        assert!(PackageRef::parse_requirement(">=1.0").is_err());
    }

    #[test]
    fn test_key_and_display() {
        let pkg = PackageRef::new("evil", "1.0.0").unwrap();
        assert_eq!(pkg.key(), "evil@1.0.0");
        assert_eq!(pkg.to_string(), "evil@1.0.0");

        let unversioned = PackageRef::new("evil", "").unwrap();
        assert_eq!(unversioned.to_string(), "evil");
    }

    #[test]
    fn test_with_version() {
        let pkg = PackageRef::new("react", "latest").unwrap();
        let resolved = pkg.with_version("18.2.0");
        assert_eq!(resolved.key(), "react@18.2.0");
    }

    #[test]
    fn test_ecosystem_display() {
        assert_eq!(Ecosystem::Npm.to_string(), "npm");
        assert_eq!(Ecosystem::PyPi.to_string(), "pypi");
    }
}
