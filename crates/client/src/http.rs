//! Shared reqwest plumbing.

use serde::de::DeserializeOwned;

use crate::config::ClientConfig;
use crate::error::ApiError;

pub(crate) fn build_client(config: &ClientConfig) -> Result<reqwest::Client, ApiError> {
    reqwest::Client::builder()
        .timeout(config.request_timeout)
        .build()
        .map_err(|e| ApiError::Network(e.to_string()))
}

pub(crate) fn endpoint(base_url: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

/// Send and turn any non-2xx status into [`ApiError::Status`].
pub(crate) async fn send(request: reqwest::RequestBuilder) -> Result<reqwest::Response, ApiError> {
    let resp = request
        .send()
        .await
        .map_err(|e| ApiError::Network(e.to_string()))?;

    let status = resp.status();
    if !status.is_success() {
        return Err(ApiError::Status {
            status: status.as_u16(),
            body: resp.text().await.unwrap_or_default(),
        });
    }
    Ok(resp)
}

pub(crate) async fn read_json<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, ApiError> {
    resp.json().await.map_err(|e| ApiError::Parse(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_joins_with_single_slash() {
        assert_eq!(endpoint("http://h:1/", "/api/x"), "http://h:1/api/x");
        assert_eq!(endpoint("http://h:1", "api/x"), "http://h:1/api/x");
    }
}
