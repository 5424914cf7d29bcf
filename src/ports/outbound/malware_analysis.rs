use crate::install_guard::domain::{AnalysisReport, Ecosystem, PackageRef};
use crate::shared::Result;
use async_trait::async_trait;

/// MalwareAnalysisService port for the remote malware inference capability
///
/// Transport, authentication and connection setup belong to the adapter.
/// Implementations must be `Send + Sync`: every analysis worker shares one
/// instance.
#[async_trait]
pub trait MalwareAnalysisService: Send + Sync {
    /// Submits a package version for analysis
    ///
    /// # Returns
    /// The identifier of the analysis, used to fetch its report
    async fn submit(&self, ecosystem: Ecosystem, package: &PackageRef) -> Result<String>;

    /// Fetches the report for a previous submission
    ///
    /// # Returns
    /// `None` when no report exists for the identifier
    async fn fetch_report(&self, analysis_id: &str) -> Result<Option<AnalysisReport>>;
}

#[async_trait]
impl<A: MalwareAnalysisService + ?Sized> MalwareAnalysisService for std::sync::Arc<A> {
    async fn submit(&self, ecosystem: Ecosystem, package: &PackageRef) -> Result<String> {
        (**self).submit(ecosystem, package).await
    }

    async fn fetch_report(&self, analysis_id: &str) -> Result<Option<AnalysisReport>> {
        (**self).fetch_report(analysis_id).await
    }
}
