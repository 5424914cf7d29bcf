use crate::install_guard::domain::FlaggedPackage;
use crate::ports::outbound::ConfirmationPrompt;
use crate::shared::Result;
use async_trait::async_trait;
use owo_colors::OwoColorize;
use std::io::{self, BufRead, Write};

/// StdinConfirmationPrompt adapter for the interactive install confirmation
///
/// Lists the flagged packages on stderr and reads one line from stdin.
/// End of input counts as a read failure, so a closed stdin never installs.
/// The read runs on tokio's blocking pool, off the async worker threads.
pub struct StdinConfirmationPrompt;

impl StdinConfirmationPrompt {
    pub fn new() -> Self {
        Self
    }

    fn render(flagged: &[FlaggedPackage]) -> String {
        let mut out = String::new();
        out.push_str(&format!(
            "{}\n",
            format!(
                "⚠️  {} package(s) flagged as malicious:",
                flagged.len()
            )
            .bold()
            .red()
        ));
        for package in flagged {
            out.push_str(&format!("   - {}: {}\n", package.key.yellow(), package.summary));
        }
        out.push_str("Install anyway? [y/N] ");
        out
    }
}

impl Default for StdinConfirmationPrompt {
    fn default() -> Self {
        Self::new()
    }
}

fn read_line_from_stdin() -> Result<String> {
    let mut line = String::new();
    let read = io::stdin().lock().read_line(&mut line)?;
    if read == 0 {
        anyhow::bail!("No confirmation received: standard input is closed");
    }
    Ok(line)
}

#[async_trait]
impl ConfirmationPrompt for StdinConfirmationPrompt {
    async fn read_confirmation(&self, flagged: &[FlaggedPackage]) -> Result<String> {
        let mut stderr = io::stderr();
        write!(stderr, "{}", Self::render(flagged))?;
        stderr.flush()?;

        tokio::task::spawn_blocking(read_line_from_stdin).await?
    }
}
