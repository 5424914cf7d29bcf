/// Outbound ports (Driven ports) - Infrastructure interfaces
///
/// These ports define the interfaces that the application core uses
/// to interact with external systems (registries, analysis service,
/// terminal, package-manager processes).
pub mod command_executor;
pub mod confirmation_prompt;
pub mod malware_analysis;
pub mod package_registry;
pub mod progress_reporter;

pub use command_executor::CommandExecutor;
pub use confirmation_prompt::ConfirmationPrompt;
pub use malware_analysis::MalwareAnalysisService;
pub use package_registry::{PackageManifest, PackageRegistry};
pub use progress_reporter::ProgressReporter;
