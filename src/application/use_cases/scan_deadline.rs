use crate::shared::error::GuardError;
use std::time::Duration;
use tokio::time::Instant;

/// The single deadline governing one root's scan.
///
/// Resolution, fetching and the analysis drain of a root all run against the
/// same instant, so the budget covers the whole scan rather than each step.
#[derive(Debug, Clone, Copy)]
pub struct ScanDeadline {
    at: Instant,
    budget: Duration,
}

impl ScanDeadline {
    /// Starts a deadline `budget` from now
    pub fn after(budget: Duration) -> Self {
        Self {
            at: Instant::now() + budget,
            budget,
        }
    }

    pub fn instant(&self) -> Instant {
        self.at
    }

    pub fn budget(&self) -> Duration {
        self.budget
    }

    pub fn is_expired(&self) -> bool {
        Instant::now() >= self.at
    }

    /// The error reported when the scan of `package` runs past this deadline
    pub fn cancelled(&self, package: impl Into<String>) -> GuardError {
        GuardError::Cancelled {
            package: package.into(),
            timeout: self.budget,
        }
    }
}
