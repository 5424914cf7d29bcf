use super::PackageRef;
use serde::Deserialize;

/// Inference section of an analysis report
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Inference {
    #[serde(default)]
    pub is_malicious: bool,
    #[serde(default)]
    pub summary: String,
}

/// Report returned by the malware analysis service for one submission.
///
/// A report without an inference means the service has not decided yet; the
/// package is then treated as unverified.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AnalysisReport {
    #[serde(default)]
    pub inference: Option<Inference>,
}

impl AnalysisReport {
    pub fn with_inference(is_malicious: bool, summary: impl Into<String>) -> Self {
        Self {
            inference: Some(Inference {
                is_malicious,
                summary: summary.into(),
            }),
        }
    }
}

/// Malicious/benign determination for one analyzed package version
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisVerdict {
    pub package: PackageRef,
    pub is_malicious: bool,
    pub summary: String,
}

impl AnalysisVerdict {
    /// Builds a verdict from a report, or `None` when the report carries no inference.
    pub fn from_report(package: PackageRef, report: &AnalysisReport) -> Option<Self> {
        report.inference.as_ref().map(|inference| Self {
            package,
            is_malicious: inference.is_malicious,
            summary: inference.summary.clone(),
        })
    }
}
