/// Data Transfer Objects for application layer
///
/// DTOs are used to transfer data between the application layer
/// and adapters, keeping the domain layer isolated.
mod guard_outcome;
mod guard_request;
mod scan_settings;

pub use guard_outcome::GuardOutcome;
pub use guard_request::{GuardRequest, GuardRequestBuilder};
pub use scan_settings::ScanSettings;
