/// Console adapters for user-facing output and input
mod progress_reporter;
mod stdin_prompt;

pub use progress_reporter::StderrProgressReporter;
pub use stdin_prompt::StdinConfirmationPrompt;
