pub mod dependency_node;
pub mod gate_state;
pub mod install_command;
pub mod malicious_registry;
pub mod package;
pub mod scan_progress;
pub mod verdict;
pub mod visited_set;

pub use dependency_node::DependencyNode;
pub use gate_state::{GateState, ScanSession, ScanStatus};
pub use install_command::{InstallCommand, PackageManager};
pub use malicious_registry::{FlaggedPackage, MaliciousRegistry};
pub use package::{Ecosystem, PackageRef};
pub use scan_progress::ScanProgress;
pub use verdict::{AnalysisReport, AnalysisVerdict, Inference};
pub use visited_set::VisitedSet;
