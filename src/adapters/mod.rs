/// Adapters layer - Infrastructure implementations
///
/// This layer contains concrete implementations of the ports,
/// providing the actual integration with registries, the analysis
/// service, the terminal and the package manager process.
pub mod outbound;
