use crate::ports::outbound::CommandExecutor;
use crate::shared::error::GuardError;
use crate::shared::Result;
use async_trait::async_trait;
use std::process::Stdio;
use tokio::process::Command;

/// Exit code reported when the package manager is killed by a signal
const SIGNAL_EXIT_CODE: i32 = 1;

/// PackageManagerExecutor adapter that runs the real package manager
///
/// Standard input, output and error are inherited, so the package manager
/// talks to the terminal directly once the guard hands over.
pub struct PackageManagerExecutor;

impl PackageManagerExecutor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for PackageManagerExecutor {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CommandExecutor for PackageManagerExecutor {
    async fn execute(&self, program: &str, args: &[String]) -> Result<i32> {
        tracing::info!(program, ?args, "handing over to package manager");

        let status = Command::new(program)
            .args(args)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .await
            .map_err(|e| GuardError::Executor {
                program: program.to_string(),
                details: e.to_string(),
            })?;

        Ok(status.code().unwrap_or(SIGNAL_EXIT_CODE))
    }
}
