//! HTTP client for the external chat backend used in proxy mode.

use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{info, warn};
use url::Url;

use crate::error::AppError;

#[derive(Serialize)]
struct BackendRequest<'a> {
    question: &'a str,
}

#[derive(Deserialize)]
struct BackendResponse {
    response: Option<String>,
}

/// Forwards questions to `<base>/api/chat` and returns the `response` field.
#[derive(Clone)]
pub struct BackendClient {
    client: Client,
    endpoint: Url,
}

impl BackendClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, AppError> {
        let endpoint = Url::parse(base_url)?.join("/api/chat")?;
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Config(format!("Failed to build HTTP client: {}", e)))?;

        info!("Chat backend endpoint: {}", endpoint);
        Ok(Self { client, endpoint })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    pub async fn ask(&self, question: &str) -> Result<String, AppError> {
        let res = self
            .client
            .post(self.endpoint.clone())
            .json(&BackendRequest { question })
            .send()
            .await?;

        let status = res.status();
        if !status.is_success() {
            warn!("Chat backend answered {}", status);
            return Err(AppError::Backend(format!("Backend returned {}", status)));
        }

        let body: BackendResponse = res.json().await?;
        body.response
            .filter(|r| !r.is_empty())
            .ok_or_else(|| AppError::Backend("Backend response had no answer".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_is_joined_onto_base() {
        let client = BackendClient::new("http://localhost:5000", Duration::from_secs(1)).unwrap();
        assert_eq!(client.endpoint().as_str(), "http://localhost:5000/api/chat");
    }

    #[test]
    fn test_rejects_bad_url() {
        let result = BackendClient::new("not a url", Duration::from_secs(1));
        assert!(matches!(result, Err(AppError::Config(_))));
    }
}
