use crate::install_guard::domain::{FlaggedPackage, GateState, ScanSession};
use crate::shared::error::ExitCode;

/// GuardOutcome - Internal response DTO from the install gate use case
#[derive(Debug, Clone)]
pub struct GuardOutcome {
    /// `Clean` or `Blocked`
    pub final_state: GateState,
    /// One session per requested root, in request order
    pub sessions: Vec<ScanSession>,
    /// Every flagged package across all roots, sorted by key
    pub flagged: Vec<FlaggedPackage>,
    /// Exit code of the package manager, `None` if it was not run
    pub executor_exit_code: Option<i32>,
    /// Every state the gate entered, starting at `Idle`; empty for pass-through
    pub transitions: Vec<GateState>,
}

impl GuardOutcome {
    pub fn new(
        final_state: GateState,
        sessions: Vec<ScanSession>,
        flagged: Vec<FlaggedPackage>,
        executor_exit_code: Option<i32>,
    ) -> Self {
        Self {
            final_state,
            sessions,
            flagged,
            executor_exit_code,
            transitions: Vec::new(),
        }
    }

    pub fn with_transitions(mut self, transitions: Vec<GateState>) -> Self {
        self.transitions = transitions;
        self
    }

    /// Whether the gate stopped at `Flagged` on the way to its final state
    pub fn passed_through_flagged(&self) -> bool {
        self.transitions.contains(&GateState::Flagged)
    }

    pub fn was_executed(&self) -> bool {
        self.executor_exit_code.is_some()
    }

    /// Process exit code for this outcome
    ///
    /// The package manager's own exit code wins when it ran.
    pub fn exit_code(&self) -> i32 {
        match (&self.final_state, self.executor_exit_code) {
            (GateState::Blocked, _) => ExitCode::InstallBlocked.as_i32(),
            (_, Some(code)) => code,
            (_, None) => ExitCode::Success.as_i32(),
        }
    }
}
