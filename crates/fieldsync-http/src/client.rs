//! HTTP client for the sync API.

use std::time::Duration;

use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, trace};

use fieldsync_core::EndpointUrl;
use fieldsync_core::error::{InvalidInputError, RejectedUpload, UploadError};

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Error body returned by the sync API.
#[derive(Debug, Default, Deserialize)]
struct ErrorResponse {
    error: Option<String>,
    message: Option<String>,
}

/// HTTP client bound to one sync API base URL.
#[derive(Debug, Clone)]
pub struct SyncClient {
    client: reqwest::Client,
    base: EndpointUrl,
    token: Option<String>,
    timeout: Duration,
}

impl SyncClient {
    /// Create a client for the given base URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is not a network endpoint or the HTTP
    /// client cannot be built.
    pub fn new(base: EndpointUrl) -> fieldsync_core::Result<Self> {
        Self::with_timeout(base, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(base: EndpointUrl, timeout: Duration) -> fieldsync_core::Result<Self> {
        if !base.is_network() {
            return Err(InvalidInputError::EndpointUrl {
                value: base.to_string(),
                reason: "HTTP sync requires an http(s) URL".to_string(),
            }
            .into());
        }

        let client = reqwest::Client::builder()
            .user_agent(concat!("fieldsync/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()
            .map_err(|e| UploadError::Other {
                message: format!("failed to build HTTP client: {}", e),
            })?;

        Ok(Self {
            client,
            base,
            token: None,
            timeout,
        })
    }

    /// Send `Authorization: Bearer <token>` with every request.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn base(&self) -> &EndpointUrl {
        &self.base
    }

    /// PUT a JSON body and decode the JSON response.
    #[instrument(skip(self, body), fields(base = %self.base))]
    pub async fn put_json<B, R>(&self, path: &str, body: &B) -> Result<R, UploadError>
    where
        B: Serialize,
        R: DeserializeOwned,
    {
        let url = self.base.api_url(path);
        debug!(%url, "PUT");

        let response = self
            .authorize(self.client.put(&url))
            .json(body)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        self.handle_response(response).await
    }

    /// GET a path and return only the status code.
    #[instrument(skip(self), fields(base = %self.base))]
    pub async fn get_status(&self, path: &str) -> Result<StatusCode, UploadError> {
        let url = self.base.api_url(path);
        trace!(%url, "GET");

        let response = self
            .authorize(self.client.get(&url))
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        Ok(response.status())
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match self.token {
            Some(ref token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn handle_response<R: DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<R, UploadError> {
        let status = response.status();
        trace!(status = %status, "Response");

        if status.is_success() {
            response.json::<R>().await.map_err(|e| UploadError::Other {
                message: format!("invalid response body: {}", e),
            })
        } else {
            Err(UploadError::Rejected(
                self.parse_error_response(response).await,
            ))
        }
    }

    async fn parse_error_response(&self, response: reqwest::Response) -> RejectedUpload {
        let status = response.status().as_u16();

        let body = response.json::<ErrorResponse>().await.unwrap_or_default();
        RejectedUpload::new(status, body.error, body.message)
    }

    fn transport_error(&self, err: reqwest::Error) -> UploadError {
        if err.is_timeout() {
            UploadError::Timeout {
                duration_ms: self.timeout.as_millis() as u64,
            }
        } else if err.is_connect() || err.is_request() {
            UploadError::Connection {
                message: err.to_string(),
            }
        } else {
            UploadError::Other {
                message: err.to_string(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_creation() {
        let base = EndpointUrl::new("https://reports.example.com").unwrap();
        let client = SyncClient::new(base.clone()).unwrap();
        assert_eq!(client.base(), &base);
    }

    #[test]
    fn file_url_rejected() {
        let base = EndpointUrl::new("file:///tmp/outbox").unwrap();
        assert!(SyncClient::new(base).is_err());
    }

    #[test]
    fn error_body_fields_optional() {
        let body: ErrorResponse = serde_json::from_str(r#"{"message":"quota"}"#).unwrap();
        assert!(body.error.is_none());
        assert_eq!(body.message.as_deref(), Some("quota"));
    }
}
