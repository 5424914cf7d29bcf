/// Use cases module containing application business logic orchestration
mod analyze_packages;
mod fetch_dependencies;
mod install_gate;
mod pass_through;
mod resolve_version;
mod scan_deadline;

pub use analyze_packages::{AnalysisWorkQueue, QueueConfig};
pub use fetch_dependencies::{DependencyGraphFetcher, ResolvedGraph};
pub use install_gate::InstallGateUseCase;
pub use pass_through::PassThroughUseCase;
pub use resolve_version::VersionResolver;
pub use scan_deadline::ScanDeadline;
