/// Mock implementations for testing
mod mock_analysis_service;
mod mock_command_executor;
mod mock_confirmation_prompt;
mod mock_package_registry;
mod mock_progress_reporter;

pub use mock_analysis_service::MockAnalysisService;
pub use mock_command_executor::MockCommandExecutor;
pub use mock_confirmation_prompt::MockConfirmationPrompt;
pub use mock_package_registry::MockPackageRegistry;
pub use mock_progress_reporter::MockProgressReporter;
