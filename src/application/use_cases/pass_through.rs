use crate::application::dto::{GuardOutcome, GuardRequest};
use crate::install_guard::domain::{GateState, InstallCommand};
use crate::ports::outbound::{CommandExecutor, ProgressReporter};
use crate::shared::Result;
use anyhow::Context;

/// Hands the original command to the package manager unless this is a dry run
///
/// # Returns
/// The package manager's exit code, or `None` for a dry run
pub(crate) async fn hand_over<E, P>(
    executor: &E,
    reporter: &P,
    command: &InstallCommand,
    dry_run: bool,
) -> Result<Option<i32>>
where
    E: CommandExecutor,
    P: ProgressReporter,
{
    let program = command.manager().program();
    let args = command.original_args();

    if dry_run {
        reporter.report_completion(&format!(
            "Dry run: would run `{} {}`",
            program,
            args.join(" ")
        ));
        return Ok(None);
    }

    let exit_code = executor
        .execute(program, &args)
        .await
        .with_context(|| format!("Failed to run {}", program))?;
    Ok(Some(exit_code))
}

/// PassThroughUseCase - Runs commands that install nothing new
///
/// `npm ci`, `pip install -r requirements.txt` and non-install actions name
/// no packages, so there is nothing to scan and no analysis service is
/// needed.
pub struct PassThroughUseCase<E, P> {
    command_executor: E,
    progress_reporter: P,
}

impl<E, P> PassThroughUseCase<E, P>
where
    E: CommandExecutor,
    P: ProgressReporter,
{
    pub fn new(command_executor: E, progress_reporter: P) -> Self {
        Self {
            command_executor,
            progress_reporter,
        }
    }

    /// Runs the command without scanning
    ///
    /// # Errors
    /// Returns an executor failure when the package manager cannot be started
    pub async fn execute(&self, request: GuardRequest) -> Result<GuardOutcome> {
        pass_through(&self.command_executor, &self.progress_reporter, &request).await
    }
}

/// Runs `request` unscanned and reports it as a clean outcome
pub(crate) async fn pass_through<E, P>(
    executor: &E,
    reporter: &P,
    request: &GuardRequest,
) -> Result<GuardOutcome>
where
    E: CommandExecutor,
    P: ProgressReporter,
{
    let command = &request.command;
    tracing::info!(
        program = command.manager().program(),
        install = command.is_install(),
        "no packages to scan; passing command through"
    );

    let exit_code = hand_over(executor, reporter, command, request.dry_run).await?;
    Ok(GuardOutcome::new(GateState::Clean, vec![], vec![], exit_code))
}
