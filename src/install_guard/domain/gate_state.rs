use super::PackageRef;

/// States of the install gate.
///
/// ```text
/// Idle -> Scanning(root) -> Aggregating -> Scanning(next root) ...
///                                      \-> Clean
///                                      \-> Flagged -> Clean | Blocked
/// Scanning | Aggregating -> Error
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateState {
    Idle,
    Scanning { root: String },
    Aggregating,
    Flagged,
    Clean,
    Blocked,
    Error,
}

impl GateState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, GateState::Clean | GateState::Blocked | GateState::Error)
    }

    pub fn can_transition_to(&self, next: &GateState) -> bool {
        use GateState::*;
        matches!(
            (self, next),
            (Idle, Scanning { .. })
                | (Scanning { .. }, Aggregating)
                | (Scanning { .. }, Error)
                | (Aggregating, Scanning { .. })
                | (Aggregating, Clean)
                | (Aggregating, Flagged)
                | (Aggregating, Error)
                | (Flagged, Clean)
                | (Flagged, Blocked)
        )
    }
}

impl std::fmt::Display for GateState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GateState::Idle => write!(f, "idle"),
            GateState::Scanning { root } => write!(f, "scanning({})", root),
            GateState::Aggregating => write!(f, "aggregating"),
            GateState::Flagged => write!(f, "flagged"),
            GateState::Clean => write!(f, "clean"),
            GateState::Blocked => write!(f, "blocked"),
            GateState::Error => write!(f, "error"),
        }
    }
}

/// How a single root's scan ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanStatus {
    Clean,
    Flagged,
    /// The root could not be scanned; only reachable under the skip-root policy
    Failed { reason: String },
}

/// Bookkeeping for one requested root package
#[derive(Debug, Clone, PartialEq)]
pub struct ScanSession {
    pub requested: PackageRef,
    pub resolved: Option<PackageRef>,
    /// Flattened keys analyzed for this root, root included
    pub analyzed_keys: Vec<String>,
    /// Keys of this root's tree found in the malicious registry
    pub flagged_keys: Vec<String>,
    pub status: ScanStatus,
}

impl ScanSession {
    pub fn failed(requested: PackageRef, resolved: Option<PackageRef>, reason: String) -> Self {
        Self {
            requested,
            resolved,
            analyzed_keys: Vec::new(),
            flagged_keys: Vec::new(),
            status: ScanStatus::Failed { reason },
        }
    }

    pub fn completed(
        requested: PackageRef,
        resolved: PackageRef,
        analyzed_keys: Vec<String>,
        flagged_keys: Vec<String>,
    ) -> Self {
        let status = if flagged_keys.is_empty() {
            ScanStatus::Clean
        } else {
            ScanStatus::Flagged
        };
        Self {
            requested,
            resolved: Some(resolved),
            analyzed_keys,
            flagged_keys,
            status,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self.status, ScanStatus::Failed { .. })
    }
}
