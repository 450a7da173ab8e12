//! Scripted transport for integration tests
//!
//! Each [`HttpFixture`] describes one expected call and its canned response.
//! Calls must arrive in fixture order.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::io::{Cursor, Write};
use std::sync::{Arc, Mutex};

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde_json::{Value, json};
use workspace_notebook_sdk::{
    ApiClient, ApiRequest, ApiResponse, HttpMethod, NotebookController, RetryPolicy, Transport,
    WorkspaceApi,
};

#[derive(Debug, Clone)]
pub struct HttpFixture {
    pub method: HttpMethod,
    pub resource: String,
    pub status: u16,
    pub response: Option<Value>,
    pub expected_request: Option<Value>,
}

impl HttpFixture {
    pub fn get(resource: &str) -> Self {
        Self {
            method: HttpMethod::Get,
            resource: resource.to_string(),
            status: 200,
            response: None,
            expected_request: None,
        }
    }

    pub fn post(resource: &str) -> Self {
        Self {
            method: HttpMethod::Post,
            ..Self::get(resource)
        }
    }

    pub fn status(mut self, status: u16) -> Self {
        self.status = status;
        self
    }

    pub fn response(mut self, body: Value) -> Self {
        self.response = Some(body);
        self
    }

    pub fn error(self, status: u16, code: &str, message: &str) -> Self {
        self.status(status)
            .response(json!({"error_code": code, "message": message}))
    }

    pub fn expect_request(mut self, body: Value) -> Self {
        self.expected_request = Some(body);
        self
    }
}

#[derive(Default)]
pub struct FixtureTransport {
    fixtures: Mutex<VecDeque<HttpFixture>>,
    requests: Mutex<Vec<ApiRequest>>,
}

impl FixtureTransport {
    pub fn new(fixtures: Vec<HttpFixture>) -> Arc<Self> {
        Arc::new(Self {
            fixtures: Mutex::new(fixtures.into()),
            requests: Mutex::new(Vec::new()),
        })
    }

    /// Requests received so far, rendered as `METHOD resource`
    pub fn calls(&self) -> Vec<String> {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .map(|r| format!("{} {}", r.method, r.resource()))
            .collect()
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn assert_exhausted(&self) {
        let remaining = self.fixtures.lock().unwrap();
        assert!(
            remaining.is_empty(),
            "Unused fixtures: {:?}",
            remaining
                .iter()
                .map(|f| format!("{} {}", f.method, f.resource))
                .collect::<Vec<_>>()
        );
    }
}

impl Transport for FixtureTransport {
    fn execute(&self, request: &ApiRequest) -> workspace_notebook_sdk::Result<ApiResponse> {
        self.requests.lock().unwrap().push(request.clone());

        let fixture = self.fixtures.lock().unwrap().pop_front().unwrap_or_else(|| {
            panic!(
                "No fixture left for {} {}",
                request.method,
                request.resource()
            )
        });
        assert_eq!(
            (fixture.method, fixture.resource.as_str()),
            (request.method, request.resource().as_str()),
            "Request does not match the next fixture"
        );
        if let Some(expected) = &fixture.expected_request {
            assert_eq!(request.body.as_ref(), Some(expected), "Unexpected request body");
        }

        let body = match &fixture.response {
            Some(value) => serde_json::to_vec(value).unwrap(),
            None => Vec::new(),
        };
        Ok(ApiResponse::new(fixture.status, body))
    }
}

pub fn api(transport: &Arc<FixtureTransport>) -> WorkspaceApi {
    WorkspaceApi::new(ApiClient::new(transport.clone(), RetryPolicy::immediate(3)))
}

pub fn controller(transport: &Arc<FixtureTransport>) -> NotebookController {
    NotebookController::new(api(transport))
}

/// Build a zip archive from `(name, content)` pairs; names ending in `/` become directories
pub fn zip_archive(entries: &[(&str, &[u8])]) -> Vec<u8> {
    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    let options = zip::write::SimpleFileOptions::default()
        .compression_method(zip::CompressionMethod::Stored);
    for (name, content) in entries {
        if name.ends_with('/') {
            writer.add_directory(*name, options).unwrap();
        } else {
            writer.start_file(*name, options).unwrap();
            writer.write_all(content).unwrap();
        }
    }
    writer.finish().unwrap().into_inner()
}

/// Notebook descriptor JSON with `(position, command)` cells in the given order
pub fn descriptor(cells: &[(f64, &str)]) -> Vec<u8> {
    let commands: Vec<Value> = cells
        .iter()
        .map(|(position, command)| json!({"position": position, "command": command}))
        .collect();
    serde_json::to_vec(&json!({
        "version": "NotebookV1",
        "name": "nb",
        "language": "python",
        "commands": commands,
    }))
    .unwrap()
}

pub fn b64(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}
