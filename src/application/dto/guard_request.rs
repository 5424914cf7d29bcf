use crate::install_guard::domain::InstallCommand;
use crate::shared::error::GuardError;
use crate::shared::Result;

/// GuardRequest - Internal request DTO for the install gate use case
#[derive(Debug, Clone)]
pub struct GuardRequest {
    /// The package manager command as typed by the user
    pub command: InstallCommand,
    /// Scan and gate, but never run the package manager
    pub dry_run: bool,
}

impl GuardRequest {
    pub fn new(command: InstallCommand, dry_run: bool) -> Self {
        Self { command, dry_run }
    }

    pub fn builder() -> GuardRequestBuilder {
        GuardRequestBuilder::default()
    }
}

/// Builder for [`GuardRequest`]
#[derive(Debug, Default)]
pub struct GuardRequestBuilder {
    command: Option<InstallCommand>,
    dry_run: bool,
}

impl GuardRequestBuilder {
    pub fn command(mut self, command: InstallCommand) -> Self {
        self.command = Some(command);
        self
    }

    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Builds the request
    ///
    /// # Errors
    /// Returns `GuardError::Validation` when no command was set
    pub fn build(self) -> Result<GuardRequest> {
        let command = self.command.ok_or_else(|| GuardError::Validation {
            message: "A package manager command is required".to_string(),
        })?;
        Ok(GuardRequest::new(command, self.dry_run))
    }
}
