pub mod confirmation;
pub mod root_failure_policy;
pub mod version_normalization;

pub use confirmation::is_affirmative;
pub use root_failure_policy::RootFailurePolicy;
pub use version_normalization::normalize_version;
