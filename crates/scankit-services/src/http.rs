//! Shared HTTP plumbing for the collaborator clients.

use std::time::Duration;

use scankit_core::ServiceError;

const CONNECT_TIMEOUT_SECS: u64 = 10;

/// Builds the HTTP client used by all collaborator endpoints.
pub(crate) fn build_client(timeout_secs: u64) -> Result<reqwest::Client, ServiceError> {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
        .build()
        .map_err(|e| ServiceError::ClientBuild {
            reason: e.to_string(),
        })
}

/// Sends a JSON POST and returns the raw response body, mapping
/// transport and non-2xx failures onto [`ServiceError`].
pub(crate) async fn post_json<B: serde::Serialize>(
    client: &reqwest::Client,
    service: &str,
    url: &str,
    api_key: Option<&str>,
    body: &B,
) -> Result<String, ServiceError> {
    let mut request = client.post(url).json(body);
    if let Some(key) = api_key {
        request = request.bearer_auth(key);
    }

    let response = request.send().await.map_err(|e| ServiceError::RequestFailed {
        service: service.to_string(),
        reason: e.to_string(),
    })?;

    let status = response.status();
    let text = response.text().await.map_err(|e| ServiceError::RequestFailed {
        service: service.to_string(),
        reason: e.to_string(),
    })?;

    if !status.is_success() {
        return Err(ServiceError::RequestFailed {
            service: service.to_string(),
            reason: format!("status {}: {}", status.as_u16(), truncate(&text, 200)),
        });
    }
    Ok(text)
}

fn truncate(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}
