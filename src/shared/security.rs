use crate::shared::Result;

/// Maximum length for package names (security limit)
pub const MAX_PACKAGE_NAME_LENGTH: usize = 214;

/// Maximum length for package versions (security limit)
pub const MAX_VERSION_LENGTH: usize = 256;

/// Validates a package name or version before it is placed in a registry URL.
///
/// # Security
/// Rejects path separators, `..` and URL delimiters so a crafted dependency
/// manifest cannot redirect requests to other registry endpoints. Scoped npm
/// names are percent-encoded by the caller before this check, so `/` is never
/// legitimate here.
///
/// # Arguments
/// * `component` - The raw URL component
/// * `component_type` - Description used in error messages (e.g. "Package name")
pub fn validate_url_component(component: &str, component_type: &str) -> Result<()> {
    if component.is_empty() {
        anyhow::bail!("{} must not be empty", component_type);
    }

    if component.contains('/') || component.contains('\\') {
        anyhow::bail!(
            "Security: {} contains path separators which are not allowed",
            component_type
        );
    }

    if component.contains("..") {
        anyhow::bail!(
            "Security: {} contains '..' which is not allowed",
            component_type
        );
    }

    if component.contains('#') || component.contains('?') {
        anyhow::bail!(
            "Security: {} contains URL-unsafe characters",
            component_type
        );
    }

    Ok(())
}

/// Validates the length of a package name and version pair.
pub fn validate_package_lengths(name: &str, version: &str) -> Result<()> {
    if name.len() > MAX_PACKAGE_NAME_LENGTH {
        anyhow::bail!(
            "Package name is too long ({} bytes). Maximum allowed: {} bytes",
            name.len(),
            MAX_PACKAGE_NAME_LENGTH
        );
    }

    if version.len() > MAX_VERSION_LENGTH {
        anyhow::bail!(
            "Package version is too long ({} bytes). Maximum allowed: {} bytes",
            version.len(),
            MAX_VERSION_LENGTH
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_url_component_plain_name() {
        assert!(validate_url_component("express", "Package name").is_ok());
        assert!(validate_url_component("4.18.2", "Version").is_ok());
    }

    #[test]
    fn test_validate_url_component_rejects_separators() {
        let result = validate_url_component("../admin", "Package name");
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("path separators"));
    }

    #[test]
    fn test_validate_url_component_rejects_dot_dot() {
        let result = validate_url_component("..", "Version");
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("'..'"));
    }

    #[test]
    fn test_validate_url_component_rejects_query() {
        let result = validate_url_component("pkg?x=1", "Package name");
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("URL-unsafe"));
    }

    #[test]
    fn test_validate_url_component_rejects_empty() {
        assert!(validate_url_component("", "Version").is_err());
    }

    #[test]
    fn test_validate_package_lengths() {
        assert!(validate_package_lengths("lodash", "4.17.21").is_ok());
        let long_name = "a".repeat(MAX_PACKAGE_NAME_LENGTH + 1);
        let result = validate_package_lengths(&long_name, "1.0.0");
        assert!(result.unwrap_err().to_string().contains("too long"));
    }
}
