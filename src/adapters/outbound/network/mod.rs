/// Network adapters for registry and analysis service calls
mod analysis_client;
mod caching_registry_client;
mod http;
mod npm_registry_client;
mod pypi_registry_client;

pub use analysis_client::HttpAnalysisClient;
pub use caching_registry_client::CachingPackageRegistry;
pub use npm_registry_client::NpmRegistryClient;
pub use pypi_registry_client::PyPiRegistryClient;
