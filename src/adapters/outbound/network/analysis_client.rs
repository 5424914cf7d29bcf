use super::http::build_client;
use crate::install_guard::domain::{AnalysisReport, Ecosystem, PackageRef};
use crate::ports::outbound::MalwareAnalysisService;
use crate::shared::security::validate_url_component;
use crate::shared::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// HttpAnalysisClient adapter for the malware analysis service
///
/// Speaks the service's JSON API:
/// - `POST {base}/v1/analyze` with `{ecosystem, name, version}` returns `{analysis_id}`
/// - `GET {base}/v1/reports/{analysis_id}` returns the report, `404` when none exists
///
/// # Security
/// - Sends the API key as a bearer token when configured
/// - Implements timeout (30 seconds)
/// - Does not retry: a failed item is reported unverified by the queue
pub struct HttpAnalysisClient {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl HttpAnalysisClient {
    const TIMEOUT_SECONDS: u64 = 30;

    pub fn new(base_url: &str, api_key: Option<String>) -> Result<Self> {
        Ok(Self {
            client: build_client(Duration::from_secs(Self::TIMEOUT_SECONDS))?,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.filter(|key| !key.trim().is_empty()),
        })
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.api_key {
            Some(key) => request.bearer_auth(key),
            None => request,
        }
    }
}

#[derive(Debug, Serialize)]
struct AnalyzeRequest<'a> {
    ecosystem: Ecosystem,
    name: &'a str,
    version: &'a str,
}

#[derive(Debug, Deserialize)]
struct AnalyzeResponse {
    analysis_id: String,
}

#[async_trait]
impl MalwareAnalysisService for HttpAnalysisClient {
    async fn submit(&self, ecosystem: Ecosystem, package: &PackageRef) -> Result<String> {
        let url = format!("{}/v1/analyze", self.base_url);
        let body = AnalyzeRequest {
            ecosystem,
            name: package.name(),
            version: package.version(),
        };

        let response = self
            .authorize(self.client.post(&url))
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            anyhow::bail!(
                "Analysis service returned status code {} for {}",
                response.status(),
                package
            );
        }

        let analyze: AnalyzeResponse = response.json().await?;
        Ok(analyze.analysis_id)
    }

    async fn fetch_report(&self, analysis_id: &str) -> Result<Option<AnalysisReport>> {
        validate_url_component(analysis_id, "Analysis id")?;
        let url = format!(
            "{}/v1/reports/{}",
            self.base_url,
            urlencoding::encode(analysis_id)
        );

        let response = self.authorize(self.client.get(&url)).send().await?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            anyhow::bail!(
                "Analysis service returned status code {} for analysis {}",
                response.status(),
                analysis_id
            );
        }

        let report: AnalysisReport = response.json().await?;
        Ok(Some(report))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};
    use serde_json::json;

    #[test]
    fn test_analysis_client_creation() {
        let client = HttpAnalysisClient::new("https://analysis.example", Some(" ".to_string()));
        assert!(client.is_ok());
        assert!(client.unwrap().api_key.is_none());
    }

    #[tokio::test]
    async fn test_submit_returns_analysis_id() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/v1/analyze")
            .match_header("authorization", "Bearer secret")
            .match_body(Matcher::Json(json!({
                "ecosystem": "npm",
                "name": "evil",
                "version": "1.0.0"
            })))
            .with_status(200)
            .with_body(r#"{"analysis_id": "an-123"}"#)
            .expect(1)
            .create_async()
            .await;

        let client = HttpAnalysisClient::new(&server.url(), Some("secret".to_string())).unwrap();
        let package = PackageRef::new("evil", "1.0.0").unwrap();
        let id = client.submit(Ecosystem::Npm, &package).await.unwrap();

        mock.assert_async().await;
        assert_eq!(id, "an-123");
    }

    #[tokio::test]
    async fn test_submit_error_status() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", "/v1/analyze")
            .with_status(500)
            .create_async()
            .await;

        let client = HttpAnalysisClient::new(&server.url(), None).unwrap();
        let package = PackageRef::new("good", "1.0.0").unwrap();
        let err = client.submit(Ecosystem::PyPi, &package).await.unwrap_err();
        assert!(err.to_string().contains("500"));
    }

    #[tokio::test]
    async fn test_fetch_report_with_inference() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/v1/reports/an-123")
            .with_status(200)
            .with_body(
                json!({
                    "inference": {"is_malicious": true, "summary": "postinstall downloads a binary"}
                })
                .to_string(),
            )
            .create_async()
            .await;

        let client = HttpAnalysisClient::new(&server.url(), None).unwrap();
        let report = client.fetch_report("an-123").await.unwrap().unwrap();
        let inference = report.inference.unwrap();
        assert!(inference.is_malicious);
        assert_eq!(inference.summary, "postinstall downloads a binary");
    }

    #[tokio::test]
    async fn test_fetch_report_not_found() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/v1/reports/unknown")
            .with_status(404)
            .create_async()
            .await;

        let client = HttpAnalysisClient::new(&server.url(), None).unwrap();
        assert!(client.fetch_report("unknown").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_fetch_report_rejects_path_injection() {
        let client = HttpAnalysisClient::new("https://analysis.example", None).unwrap();
        assert!(client.fetch_report("../admin").await.is_err());
    }
}
