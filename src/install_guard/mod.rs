/// Install guard domain layer
///
/// Pure models and policies for guarding package installs. Nothing in here
/// performs I/O; registries, the analysis service and the terminal are
/// reached through the ports.
pub mod domain;
pub mod policies;
