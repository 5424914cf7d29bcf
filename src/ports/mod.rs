/// Ports module defining interfaces for hexagonal architecture
///
/// Every external collaborator of the guard (registry, analysis service,
/// terminal, package-manager process) is reached through an outbound port.
pub mod outbound;
