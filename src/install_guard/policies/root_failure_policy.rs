/// What a failed root does to the rest of a multi-package install.
///
/// A root fails when its version cannot be resolved, its own manifest
/// cannot be fetched, or its scan exceeds the deadline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RootFailurePolicy {
    /// Abort the whole invocation on the first failed root
    #[default]
    FailFast,
    /// Record the failure, keep scanning the other roots
    SkipRoot,
}

impl std::str::FromStr for RootFailurePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('_', "-").as_str() {
            "fail-fast" => Ok(RootFailurePolicy::FailFast),
            "skip-root" => Ok(RootFailurePolicy::SkipRoot),
            _ => Err(format!(
                "Invalid root failure policy: {}. Please specify 'fail-fast' or 'skip-root'",
                s
            )),
        }
    }
}

impl std::fmt::Display for RootFailurePolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RootFailurePolicy::FailFast => write!(f, "fail-fast"),
            RootFailurePolicy::SkipRoot => write!(f, "skip-root"),
        }
    }
}
