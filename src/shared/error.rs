use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// Exit codes for the CLI application.
///
/// On the clean path the package manager's own exit code is returned instead,
/// so these only cover outcomes decided by the guard itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Success - scan was clean (or dry run finished)
    Success = 0,
    /// Flagged packages were found and the user declined the install
    InstallBlocked = 1,
    /// Invalid command-line arguments (clap parsing errors)
    InvalidArguments = 2,
    /// Application error (resolution failure, timeout, executor missing, etc.)
    ApplicationError = 3,
}

impl ExitCode {
    /// Convert to i32 for use with std::process::exit
    pub fn as_i32(self) -> i32 {
        self as i32
    }
}

impl fmt::Display for ExitCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExitCode::Success => write!(f, "Success (0)"),
            ExitCode::InstallBlocked => write!(f, "Install Blocked (1)"),
            ExitCode::InvalidArguments => write!(f, "Invalid Arguments (2)"),
            ExitCode::ApplicationError => write!(f, "Application Error (3)"),
        }
    }
}

/// Errors raised while guarding an install.
///
/// `Fetch` and `Analysis` are recoverable: the scan logs them and drops the
/// affected subtree or item. `Resolution` and `Cancelled` fail the root they
/// belong to, and the root failure policy decides whether that ends the run.
#[derive(Debug, Error)]
pub enum GuardError {
    #[error("Failed to resolve a version for package: {package}\nDetails: {details}\n\n💡 Hint: Check the package name and that the registry is reachable")]
    Resolution { package: String, details: String },

    #[error("Failed to fetch dependency manifest: {package}\nDetails: {details}\n\n💡 Hint: The registry may be unreachable or the version may not exist")]
    Fetch { package: String, details: String },

    #[error("Failed to analyze package: {package}\nDetails: {details}\n\n💡 Hint: The package was treated as unverified")]
    Analysis { package: String, details: String },

    #[error("Scan of {package} was cancelled after {}s\n\n💡 Hint: Raise the scan timeout with --timeout or scan_timeout_secs", timeout.as_secs())]
    Cancelled { package: String, timeout: Duration },

    #[error("Invalid package spec: {spec}\nReason: {reason}\n\n💡 Hint: Use the form name, name@version or @scope/name@version")]
    InvalidPackageSpec { spec: String, reason: String },

    #[error("Failed to run package manager: {program}\nDetails: {details}\n\n💡 Hint: Make sure {program} is installed and on your PATH")]
    Executor { program: String, details: String },

    /// Validation error for builder patterns and settings
    #[error("Validation error: {message}")]
    Validation { message: String },
}

impl GuardError {
    /// Whether the error only affects one dependency node or analysis item.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, GuardError::Fetch { .. } | GuardError::Analysis { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_code_values() {
        assert_eq!(ExitCode::Success.as_i32(), 0);
        assert_eq!(ExitCode::InstallBlocked.as_i32(), 1);
        assert_eq!(ExitCode::InvalidArguments.as_i32(), 2);
        assert_eq!(ExitCode::ApplicationError.as_i32(), 3);
    }

    #[test]
    fn test_exit_code_display() {
        assert_eq!(format!("{}", ExitCode::Success), "Success (0)");
        assert_eq!(
            format!("{}", ExitCode::InstallBlocked),
            "Install Blocked (1)"
        );
        assert_eq!(
            format!("{}", ExitCode::ApplicationError),
            "Application Error (3)"
        );
    }

    #[test]
    fn test_resolution_error_display() {
        let error = GuardError::Resolution {
            package: "left-pad".to_string(),
            details: "no latest dist-tag".to_string(),
        };
        let display = format!("{}", error);
        assert!(display.contains("Failed to resolve a version"));
        assert!(display.contains("left-pad"));
        assert!(display.contains("no latest dist-tag"));
        assert!(display.contains("💡 Hint:"));
    }

    #[test]
    fn test_cancelled_display_includes_timeout() {
        let error = GuardError::Cancelled {
            package: "express@4.18.2".to_string(),
            timeout: Duration::from_secs(30),
        };
        let display = format!("{}", error);
        assert!(display.contains("express@4.18.2"));
        assert!(display.contains("30s"));
    }

    #[test]
    fn test_executor_error_display() {
        let error = GuardError::Executor {
            program: "pnpm".to_string(),
            details: "No such file or directory".to_string(),
        };
        let display = format!("{}", error);
        assert!(display.contains("Failed to run package manager: pnpm"));
        assert!(display.contains("No such file or directory"));
    }

    #[test]
    fn test_is_recoverable() {
        let fetch = GuardError::Fetch {
            package: "a@1.0.0".to_string(),
            details: "404".to_string(),
        };
        let analysis = GuardError::Analysis {
            package: "a@1.0.0".to_string(),
            details: "503".to_string(),
        };
        let cancelled = GuardError::Cancelled {
            package: "a@1.0.0".to_string(),
            timeout: Duration::from_secs(1),
        };
        assert!(fetch.is_recoverable());
        assert!(analysis.is_recoverable());
        assert!(!cancelled.is_recoverable());
    }

    #[test]
    fn test_anyhow_downcast_preserves_variant() {
        let err: anyhow::Error = GuardError::Validation {
            message: "workers must be greater than zero".to_string(),
        }
        .into();
        assert!(matches!(
            err.downcast_ref::<GuardError>(),
            Some(GuardError::Validation { .. })
        ));
    }
}
