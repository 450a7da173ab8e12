//! Blocking HTTP transport
//!
//! Implements [`Transport`] with `reqwest::blocking`. Used for talking to a
//! real workspace (default `api-backend` feature).

use std::time::Duration;

use super::config::ClientConfig;
use super::{ApiRequest, ApiResponse, HttpMethod, Transport};
use crate::error::{Result, WorkspaceError};

/// HTTP transport that sends requests to `<host>/api/2.0`
pub struct HttpTransport {
    base_url: String,
    auth_token: Option<String>,
    client: reqwest::blocking::Client,
}

impl HttpTransport {
    pub fn new(config: &ClientConfig) -> Result<Self> {
        config.validate()?;

        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| WorkspaceError::Transport(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            base_url: config.api_base_url(),
            auth_token: config.token().map(str::to_string),
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Build a request with authentication headers
    fn build_request(
        &self,
        method: HttpMethod,
        resource: &str,
    ) -> reqwest::blocking::RequestBuilder {
        let url = format!("{}{}", self.base_url, resource);
        let method = match method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
        };
        let mut request = self.client.request(method, &url);

        if let Some(ref token) = self.auth_token {
            request = request.header("Authorization", format!("Bearer {}", token));
        }

        request
    }
}

impl Transport for HttpTransport {
    fn execute(&self, request: &ApiRequest) -> Result<ApiResponse> {
        let resource = request.resource();
        let mut builder = self.build_request(request.method, &resource);
        if let Some(ref body) = request.body {
            builder = builder.json(body);
        }

        let response = builder.send().map_err(|e| {
            WorkspaceError::Transport(format!("{} {} failed: {}", request.method, resource, e))
        })?;

        let status = response.status().as_u16();
        let body = response.bytes().map_err(|e| {
            WorkspaceError::Transport(format!("Failed to read response body: {e}"))
        })?;

        Ok(ApiResponse::new(status, body.to_vec()))
    }
}
