use crate::shared::Result;
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Default attempts for idempotent registry reads
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Builds the reqwest client shared by the network adapters
pub fn build_client(timeout: Duration) -> Result<reqwest::Client> {
    let version = env!("CARGO_PKG_VERSION");
    let user_agent = format!("pmguard/{}", version);
    let client = reqwest::Client::builder()
        .timeout(timeout)
        .user_agent(user_agent)
        .build()?;
    Ok(client)
}

/// Outcome of one GET attempt
enum Attempt<T> {
    Found(T),
    NotFound,
    /// Client error that retrying will not fix
    Rejected(anyhow::Error),
    Retryable(anyhow::Error),
}

async fn get_json_once<T: DeserializeOwned>(client: &reqwest::Client, url: &str) -> Attempt<T> {
    let response = match client.get(url).send().await {
        Ok(response) => response,
        Err(e) => return Attempt::Retryable(e.into()),
    };

    let status = response.status();
    if status == reqwest::StatusCode::NOT_FOUND {
        return Attempt::NotFound;
    }
    if status.is_client_error() {
        return Attempt::Rejected(anyhow::anyhow!("Registry returned status code {}", status));
    }
    if !status.is_success() {
        return Attempt::Retryable(anyhow::anyhow!("Registry returned status code {}", status));
    }

    match response.json::<T>().await {
        Ok(body) => Attempt::Found(body),
        Err(e) => Attempt::Rejected(anyhow::anyhow!("Malformed registry response: {}", e)),
    }
}

/// GETs a JSON document, retrying transport failures and server errors
///
/// # Returns
/// `None` for a 404, the parsed body otherwise
///
/// # Errors
/// Returns the last error once `max_retries` attempts are exhausted, or
/// immediately for other 4xx statuses and malformed bodies
pub async fn get_json_with_retry<T: DeserializeOwned>(
    client: &reqwest::Client,
    url: &str,
    max_retries: u32,
) -> Result<Option<T>> {
    let mut last_error = None;

    for attempt in 1..=max_retries.max(1) {
        match get_json_once(client, url).await {
            Attempt::Found(body) => return Ok(Some(body)),
            Attempt::NotFound => return Ok(None),
            Attempt::Rejected(e) => return Err(e),
            Attempt::Retryable(e) => {
                tracing::debug!(url, attempt, error = %e, "registry request failed");
                last_error = Some(e);
                if attempt < max_retries {
                    tokio::time::sleep(Duration::from_millis(100 * attempt as u64)).await;
                }
            }
        }
    }

    Err(last_error.unwrap_or_else(|| anyhow::anyhow!("Request to {} was never attempted", url)))
}
