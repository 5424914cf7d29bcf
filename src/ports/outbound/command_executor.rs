use crate::shared::Result;
use async_trait::async_trait;

/// CommandExecutor port for running the real package manager
#[async_trait]
pub trait CommandExecutor {
    /// Runs `program` with `args`, inheriting standard I/O
    ///
    /// # Returns
    /// The process exit code
    ///
    /// # Errors
    /// Returns `GuardError::Executor` if the process cannot be started
    async fn execute(&self, program: &str, args: &[String]) -> Result<i32>;
}
