use super::{Ecosystem, PackageRef};
use crate::shared::Result;

/// Package manager binaries the guard knows how to front
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackageManager {
    Npm,
    Pnpm,
    Yarn,
    Pip,
    Pip3,
}

impl PackageManager {
    pub fn program(&self) -> &'static str {
        match self {
            PackageManager::Npm => "npm",
            PackageManager::Pnpm => "pnpm",
            PackageManager::Yarn => "yarn",
            PackageManager::Pip => "pip",
            PackageManager::Pip3 => "pip3",
        }
    }

    pub fn ecosystem(&self) -> Ecosystem {
        match self {
            PackageManager::Npm | PackageManager::Pnpm | PackageManager::Yarn => Ecosystem::Npm,
            PackageManager::Pip | PackageManager::Pip3 => Ecosystem::PyPi,
        }
    }

    fn install_actions(&self) -> &'static [&'static str] {
        match self {
            PackageManager::Npm | PackageManager::Pnpm => &["install", "i", "add"],
            PackageManager::Yarn => &["add"],
            PackageManager::Pip | PackageManager::Pip3 => &["install"],
        }
    }

    /// Flags whose next argument is a value, not a package.
    fn value_flags(&self) -> &'static [&'static str] {
        match self {
            PackageManager::Pip | PackageManager::Pip3 => &[
                "-r",
                "--requirement",
                "-c",
                "--constraint",
                "-e",
                "--editable",
                "-i",
                "--index-url",
                "--extra-index-url",
            ],
            _ => &["--registry", "--tag"],
        }
    }
}

impl std::str::FromStr for PackageManager {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "npm" => Ok(PackageManager::Npm),
            "pnpm" => Ok(PackageManager::Pnpm),
            "yarn" => Ok(PackageManager::Yarn),
            "pip" => Ok(PackageManager::Pip),
            "pip3" => Ok(PackageManager::Pip3),
            _ => Err(format!(
                "Unsupported package manager: {}. Please specify one of npm, pnpm, yarn, pip, pip3",
                s
            )),
        }
    }
}

/// A package-manager invocation as typed by the user.
///
/// `args` are kept verbatim; the executor always receives
/// `action` followed by `args`, whatever the scan decided.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallCommand {
    manager: PackageManager,
    action: String,
    args: Vec<String>,
}

impl InstallCommand {
    pub fn new(manager: PackageManager, action: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            manager,
            action: action.into(),
            args,
        }
    }

    pub fn manager(&self) -> PackageManager {
        self.manager
    }

    pub fn is_install(&self) -> bool {
        self.manager.install_actions().contains(&self.action.as_str())
    }

    /// The original action and arguments, unmodified.
    pub fn original_args(&self) -> Vec<String> {
        std::iter::once(self.action.clone())
            .chain(self.args.iter().cloned())
            .collect()
    }

    /// Arguments naming packages to install. Empty for non-install actions.
    pub fn package_args(&self) -> Vec<&str> {
        if !self.is_install() {
            return Vec::new();
        }

        let value_flags = self.manager.value_flags();
        let mut packages = Vec::new();
        let mut skip_next = false;

        for arg in &self.args {
            if skip_next {
                skip_next = false;
                continue;
            }
            if arg.starts_with('-') {
                skip_next = !arg.contains('=') && value_flags.contains(&arg.as_str());
                continue;
            }
            packages.push(arg.as_str());
        }

        packages
    }

    /// Parses the package arguments into root package references.
    pub fn root_packages(&self) -> Result<Vec<PackageRef>> {
        self.package_args()
            .into_iter()
            .map(|arg| match self.manager.ecosystem() {
                Ecosystem::Npm => PackageRef::parse_spec(arg),
                Ecosystem::PyPi => PackageRef::parse_requirement(arg),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_package_manager_from_str() {
        assert_eq!(PackageManager::from_str("pnpm").unwrap(), PackageManager::Pnpm);
        let err = PackageManager::from_str("cargo").unwrap_err();
        assert!(err.contains("Unsupported package manager"));
    }

    #[test]
    fn test_ecosystem_mapping() {
        assert_eq!(PackageManager::Yarn.ecosystem(), Ecosystem::Npm);
        assert_eq!(PackageManager::Pip3.ecosystem(), Ecosystem::PyPi);
    }

    #[test]
    fn test_npm_install_package_args_skip_flags() {
        let command = InstallCommand::new(
            PackageManager::Npm,
            "install",
            args(&["--save-dev", "express@4.18.2", "--registry", "https://r.example", "@types/node"]),
        );
        assert!(command.is_install());
        assert_eq!(command.package_args(), vec!["express@4.18.2", "@types/node"]);
    }

    #[test]
    fn test_pip_requirement_file_value_is_skipped() {
        let command = InstallCommand::new(
            PackageManager::Pip,
            "install",
            args(&["-r", "requirements.txt", "requests==2.31.0", "--index-url=https://x"]),
        );
        assert_eq!(command.package_args(), vec!["requests==2.31.0"]);

        let roots = command.root_packages().unwrap();
        assert_eq!(roots.len(), 1);
        assert_eq!(roots[0].key(), "requests@2.31.0");
    }

    #[test]
    fn test_non_install_action_has_no_packages() {
        let command = InstallCommand::new(PackageManager::Npm, "run", args(&["build"]));
        assert!(!command.is_install());
        assert!(command.package_args().is_empty());
    }

    #[test]
    fn test_yarn_install_is_not_gated() {
        let command = InstallCommand::new(PackageManager::Yarn, "install", vec![]);
        assert!(!command.is_install());
    }

    #[test]
    fn test_original_args_are_unmodified() {
        let command = InstallCommand::new(
            PackageManager::Npm,
            "i",
            args(&["good@1.0.0", "evil@1.0.0", "-D"]),
        );
        assert_eq!(
            command.original_args(),
            args(&["i", "good@1.0.0", "evil@1.0.0", "-D"])
        );
    }

    #[test]
    fn test_root_packages_propagates_parse_error() {
        let command = InstallCommand::new(PackageManager::Npm, "add", args(&["pkg@1@2"]));
        assert!(command.root_packages().is_err());
    }
}
