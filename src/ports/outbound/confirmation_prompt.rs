use crate::install_guard::domain::FlaggedPackage;
use crate::shared::Result;
use async_trait::async_trait;

/// ConfirmationPrompt port for the interactive "install anyway?" question
#[async_trait]
pub trait ConfirmationPrompt {
    /// Shows every flagged package with its summary and reads one line of input
    ///
    /// # Returns
    /// The raw line as typed by the user
    ///
    /// # Errors
    /// Returns an error if input cannot be read (closed stdin, I/O failure)
    async fn read_confirmation(&self, flagged: &[FlaggedPackage]) -> Result<String>;
}
