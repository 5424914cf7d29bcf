use async_trait::async_trait;
use pmguard::install_guard::domain::AnalysisReport;
use pmguard::prelude::*;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

/// Mock MalwareAnalysisService with scripted verdicts
///
/// Every package is benign unless flagged. The analysis id is the
/// submitted `name@version` key.
#[derive(Clone, Default)]
pub struct MockAnalysisService {
    malicious: HashMap<String, String>,
    unreported: HashSet<String>,
    submitted: Arc<Mutex<Vec<String>>>,
}

impl MockAnalysisService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_malicious(mut self, key: &str, summary: &str) -> Self {
        self.malicious.insert(key.to_string(), summary.to_string());
        self
    }

    /// The service answers with no report for this key
    pub fn without_report(mut self, key: &str) -> Self {
        self.unreported.insert(key.to_string());
        self
    }

    /// Keys submitted so far, sorted
    pub fn submitted(&self) -> Vec<String> {
        let mut submitted = self.submitted.lock().unwrap().clone();
        submitted.sort();
        submitted
    }
}

#[async_trait]
impl MalwareAnalysisService for MockAnalysisService {
    async fn submit(&self, _ecosystem: Ecosystem, package: &PackageRef) -> Result<String> {
        let key = package.key();
        self.submitted.lock().unwrap().push(key.clone());
        Ok(key)
    }

    async fn fetch_report(&self, analysis_id: &str) -> Result<Option<AnalysisReport>> {
        if self.unreported.contains(analysis_id) {
            return Ok(None);
        }
        let report = match self.malicious.get(analysis_id) {
            Some(summary) => AnalysisReport::with_inference(true, summary.clone()),
            None => AnalysisReport::with_inference(false, "no findings"),
        };
        Ok(Some(report))
    }
}
