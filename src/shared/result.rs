/// Result alias used across the guard.
///
/// Errors are `anyhow::Error`; typed failures are `GuardError` values that
/// callers recover with `downcast_ref`.
pub type Result<T> = std::result::Result<T, anyhow::Error>;
