//! Resilient remote caller
//!
//! Defines the [`Transport`] seam (one HTTP round trip, no policy) and the
//! [`ApiClient`] that wraps it with retry-on-overload and error
//! classification:
//! - 2xx: the body is deserialized into the caller's type
//! - 429: the same request is retried per the injected [`RetryPolicy`]
//! - 404: [`WorkspaceError::NotFound`]
//! - anything else: [`WorkspaceError::Remote`] with the decoded error body

pub mod config;
#[cfg(feature = "api-backend")]
pub mod http;
pub mod retry;

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::{Result, WorkspaceError};

pub use config::{ClientConfig, RetryConfig};
#[cfg(feature = "api-backend")]
pub use http::HttpTransport;
pub use retry::{BackoffStrategy, RetryPolicy};

/// Status code the workspace API uses to signal transient overload
pub const STATUS_TOO_MANY_REQUESTS: u16 = 429;

/// Status code for a missing object
pub const STATUS_NOT_FOUND: u16 = 404;

/// HTTP method of a workspace API call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Post,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
        }
    }
}

impl std::fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Descriptor of one workspace API call
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: HttpMethod,
    /// Path relative to the API root, e.g. `/workspace/list`
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<serde_json::Value>,
}

impl ApiRequest {
    pub fn get(path: impl Into<String>) -> Self {
        Self {
            method: HttpMethod::Get,
            path: path.into(),
            query: Vec::new(),
            body: None,
        }
    }

    /// Build a POST request with a JSON body
    pub fn post<B: Serialize>(path: impl Into<String>, body: &B) -> Result<Self> {
        Ok(Self {
            method: HttpMethod::Post,
            path: path.into(),
            query: Vec::new(),
            body: Some(serde_json::to_value(body)?),
        })
    }

    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Path plus percent-encoded query string, keys in sorted order
    pub fn resource(&self) -> String {
        if self.query.is_empty() {
            return self.path.clone();
        }
        let mut pairs: Vec<&(String, String)> = self.query.iter().collect();
        pairs.sort_by(|a, b| a.0.cmp(&b.0));
        let query: Vec<String> = pairs
            .iter()
            .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
            .collect();
        format!("{}?{}", self.path, query.join("&"))
    }
}

/// Raw response of one round trip
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl ApiResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// One network round trip to the workspace API.
///
/// Implementations must not retry; that is the job of [`ApiClient`].
pub trait Transport: Send + Sync {
    fn execute(&self, request: &ApiRequest) -> Result<ApiResponse>;
}

/// Structured error body returned with non-2xx responses
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub error_code: String,
    #[serde(default)]
    pub message: String,
}

impl ApiErrorBody {
    /// Decode an error body, falling back to the raw text when it is not JSON
    pub fn decode(status: u16, body: &[u8]) -> Self {
        match serde_json::from_slice::<ApiErrorBody>(body) {
            Ok(decoded) if !decoded.message.is_empty() => decoded,
            Ok(decoded) => ApiErrorBody {
                message: format!("Response from server ({status}): {}", decoded.error_code),
                error_code: decoded.error_code,
            },
            Err(_) => ApiErrorBody {
                error_code: "UNKNOWN".to_string(),
                message: format!(
                    "Response from server ({status}): {}",
                    String::from_utf8_lossy(body).trim()
                ),
            },
        }
    }
}

/// Classification of a response, decided once at the call boundary
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallOutcome {
    Success(Vec<u8>),
    Transient,
    NotFound(ApiErrorBody),
    Terminal { status: u16, error: ApiErrorBody },
}

impl CallOutcome {
    pub fn classify(response: ApiResponse) -> Self {
        if response.is_success() {
            return CallOutcome::Success(response.body);
        }
        match response.status {
            STATUS_TOO_MANY_REQUESTS => CallOutcome::Transient,
            STATUS_NOT_FOUND => {
                CallOutcome::NotFound(ApiErrorBody::decode(response.status, &response.body))
            }
            status => CallOutcome::Terminal {
                status,
                error: ApiErrorBody::decode(status, &response.body),
            },
        }
    }
}

/// Progress of a single resilient call
enum CallState {
    Attempting(u32),
    Succeeded(Vec<u8>),
    Failed(WorkspaceError),
}

/// Session handle for the workspace API.
///
/// Cheap to clone; clones share the underlying transport.
#[derive(Clone)]
pub struct ApiClient {
    transport: Arc<dyn Transport>,
    policy: RetryPolicy,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    pub fn new(transport: Arc<dyn Transport>, policy: RetryPolicy) -> Self {
        Self { transport, policy }
    }

    /// Build a client backed by the blocking HTTP transport
    #[cfg(feature = "api-backend")]
    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        let transport = HttpTransport::new(config)?;
        Ok(Self::new(Arc::new(transport), config.retry.to_policy()))
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Execute a request with retry, then deserialize the success body.
    ///
    /// An empty success body is treated as `{}`.
    pub fn call<T: DeserializeOwned>(&self, request: &ApiRequest) -> Result<T> {
        let mut state = CallState::Attempting(1);
        loop {
            state = match state {
                CallState::Attempting(attempt) => self.attempt(request, attempt),
                CallState::Succeeded(body) => return decode_body(&body),
                CallState::Failed(err) => return Err(err),
            };
        }
    }

    fn attempt(&self, request: &ApiRequest, attempt: u32) -> CallState {
        tracing::debug!(
            method = %request.method,
            resource = %request.resource(),
            attempt,
            "Calling workspace API"
        );
        let response = match self.transport.execute(request) {
            Ok(response) => response,
            Err(e) => return CallState::Failed(e),
        };

        match CallOutcome::classify(response) {
            CallOutcome::Success(body) => CallState::Succeeded(body),
            CallOutcome::Transient if self.policy.allows_retry_after(attempt) => {
                let delay = self.policy.delay_after(attempt);
                tracing::warn!(
                    resource = %request.resource(),
                    attempt,
                    delay_ms = delay.as_millis() as u64,
                    "Workspace API rate limited, retrying"
                );
                if !delay.is_zero() {
                    std::thread::sleep(delay);
                }
                CallState::Attempting(attempt + 1)
            }
            CallOutcome::Transient => {
                CallState::Failed(WorkspaceError::RetryExhausted { attempts: attempt })
            }
            CallOutcome::NotFound(error) => CallState::Failed(WorkspaceError::NotFound {
                path: request_path(request),
                message: error.message,
            }),
            CallOutcome::Terminal { status, error } => CallState::Failed(WorkspaceError::Remote {
                status,
                code: error.error_code,
                message: error.message,
            }),
        }
    }
}

/// Workspace path a request targets, from its query or JSON body
fn request_path(request: &ApiRequest) -> String {
    if let Some((_, path)) = request.query.iter().find(|(k, _)| k == "path") {
        return path.clone();
    }
    request
        .body
        .as_ref()
        .and_then(|body| body.get("path"))
        .and_then(|path| path.as_str())
        .unwrap_or_default()
        .to_string()
}

fn decode_body<T: DeserializeOwned>(body: &[u8]) -> Result<T> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return serde_json::from_slice(b"{}").map_err(WorkspaceError::from);
    }
    serde_json::from_slice(body).map_err(|e| {
        WorkspaceError::Serialization(format!("Failed to parse response: {e}"))
    })
}
