/// Process adapters for launching external programs
mod package_manager_executor;

pub use package_manager_executor::PackageManagerExecutor;
