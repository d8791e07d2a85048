//! HTTP client for the bug tracker API.

use db::models::bug::{Bug, CreateBug, UpdateBug};
use serde::de::DeserializeOwned;
use thiserror::Error;
use utils::response::ApiResponse;
use uuid::Uuid;

#[derive(Debug, Clone, Error)]
pub enum ApiClientError {
    /// Failure reported by the server, carrying its message.
    #[error("{0}")]
    Api(String),
    /// The request never produced a usable response.
    #[error("request failed: {0}")]
    Transport(String),
}

impl From<reqwest::Error> for ApiClientError {
    fn from(error: reqwest::Error) -> Self {
        ApiClientError::Transport(error.to_string())
    }
}

#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            http: reqwest::Client::new(),
            base_url,
        }
    }

    pub async fn list_bugs(&self) -> Result<Vec<Bug>, ApiClientError> {
        let response = self.http.get(self.url("/api/bugs")).send().await?;
        require_data(unwrap_envelope(response).await?)
    }

    pub async fn create_bug(&self, payload: &CreateBug) -> Result<Bug, ApiClientError> {
        let response = self
            .http
            .post(self.url("/api/bugs"))
            .json(payload)
            .send()
            .await?;
        require_data(unwrap_envelope(response).await?)
    }

    pub async fn update_bug(&self, id: Uuid, payload: &UpdateBug) -> Result<Bug, ApiClientError> {
        let response = self
            .http
            .put(self.url(&format!("/api/bugs/{id}")))
            .json(payload)
            .send()
            .await?;
        require_data(unwrap_envelope(response).await?)
    }

    pub async fn delete_bug(&self, id: Uuid) -> Result<(), ApiClientError> {
        let response = self
            .http
            .delete(self.url(&format!("/api/bugs/{id}")))
            .send()
            .await?;
        unwrap_envelope::<Option<()>>(response).await?;
        Ok(())
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }
}

/// Parse the response envelope, preferring the message it carries on
/// failure and falling back to a generic one when the body is unusable.
async fn unwrap_envelope<T: DeserializeOwned>(
    response: reqwest::Response,
) -> Result<ApiResponse<T>, ApiClientError> {
    let status = response.status();
    let body = response.bytes().await?;
    match serde_json::from_slice::<ApiResponse<T>>(&body) {
        Ok(envelope) if envelope.success => Ok(envelope),
        Ok(envelope) => Err(ApiClientError::Api(failure_message(envelope.message))),
        Err(_) => Err(ApiClientError::Api(format!(
            "request failed with status {status}"
        ))),
    }
}

fn failure_message(message: Option<String>) -> String {
    message.unwrap_or_else(|| "request failed".to_string())
}

fn require_data<T>(envelope: ApiResponse<T>) -> Result<T, ApiClientError> {
    envelope
        .data
        .ok_or_else(|| ApiClientError::Api("malformed server response".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_is_trimmed() {
        let client = ApiClient::new("http://127.0.0.1:8787/");
        assert_eq!(client.url("/api/bugs"), "http://127.0.0.1:8787/api/bugs");
    }

    #[test]
    fn test_error_prefers_server_message() {
        assert_eq!(
            failure_message(Some("title is required".to_string())),
            "title is required"
        );
    }

    #[test]
    fn test_error_falls_back_to_generic_message() {
        assert_eq!(failure_message(None), "request failed");
    }
}
