//! pmguard - malware guard for package-manager installs
//!
//! This library resolves every package an install command would pull in,
//! walks its transitive dependency graph, submits each package to a malware
//! analysis service and only then lets the package manager run, following
//! hexagonal architecture and Domain-Driven Design principles.
//!
//! # Architecture
//!
//! The library is organized into the following layers:
//!
//! - **Domain Layer** (`install_guard`): Package references, the dependency tree,
//!   gate states and the policies that act on them
//! - **Application Layer** (`application`): The install gate use case, the
//!   dependency fetcher and the analysis work queue
//! - **Ports** (`ports`): Interface definitions for infrastructure
//! - **Adapters** (`adapters`): Registry and analysis clients, terminal and process adapters
//! - **Shared** (`shared`): Common utilities and error types
//!
//! # Example
//!
//! ```no_run
//! use pmguard::prelude::*;
//! use std::sync::Arc;
//!
//! # async fn run() -> Result<()> {
//! let registry = Arc::new(CachingPackageRegistry::new(NpmRegistryClient::new()?));
//! let analysis = Arc::new(HttpAnalysisClient::new("https://analysis.example", None)?);
//!
//! let use_case = InstallGateUseCase::new(
//!     registry,
//!     analysis,
//!     StdinConfirmationPrompt::new(),
//!     PackageManagerExecutor::new(),
//!     StderrProgressReporter::new(),
//!     ScanSettings::default(),
//! );
//!
//! let command = InstallCommand::new(
//!     PackageManager::Npm,
//!     "install",
//!     vec!["express@4.18.2".to_string()],
//! );
//! let outcome = use_case.execute(GuardRequest::new(command, false)).await?;
//! std::process::exit(outcome.exit_code());
//! # }
//! ```

pub mod adapters;
pub mod application;
pub mod config;
pub mod install_guard;
pub mod ports;
pub mod shared;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::adapters::outbound::console::{
        StderrProgressReporter, StdinConfirmationPrompt,
    };
    pub use crate::adapters::outbound::network::{
        CachingPackageRegistry, HttpAnalysisClient, NpmRegistryClient, PyPiRegistryClient,
    };
    pub use crate::adapters::outbound::process::PackageManagerExecutor;
    pub use crate::application::dto::{GuardOutcome, GuardRequest, ScanSettings};
    pub use crate::application::use_cases::{InstallGateUseCase, PassThroughUseCase};
    pub use crate::install_guard::domain::{
        DependencyNode, Ecosystem, FlaggedPackage, GateState, InstallCommand, PackageManager,
        PackageRef, ScanSession,
    };
    pub use crate::install_guard::policies::RootFailurePolicy;
    pub use crate::ports::outbound::{
        CommandExecutor, ConfirmationPrompt, MalwareAnalysisService, PackageRegistry,
        ProgressReporter,
    };
    pub use crate::shared::Result;
}
