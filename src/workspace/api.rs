//! Workspace API calls
//!
//! Thin typed wrappers over the `/workspace/*` endpoints. Every method issues
//! exactly one remote call except [`WorkspaceApi::list`] in recursive mode,
//! which walks the tree depth-first.

use serde::{Deserialize, Serialize};

use super::{ExportFormat, Language, ObjectStatus, WorkspacePath};
use crate::client::{ApiClient, ApiRequest};
use crate::error::Result;

/// Request body for `/workspace/import`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportRequest {
    /// Base64-encoded notebook content
    pub content: String,
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<Language>,
    pub overwrite: bool,
    pub format: ExportFormat,
}

/// Request body for `/workspace/delete`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteRequest {
    pub path: String,
    pub recursive: bool,
}

/// Request body for `/workspace/mkdirs`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MkdirsRequest {
    pub path: String,
}

/// Response of `/workspace/export`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportResponse {
    /// Base64-encoded content
    pub content: String,
}

/// Response of `/workspace/list`
#[derive(Debug, Clone, Default, Deserialize)]
struct ListResponse {
    #[serde(default)]
    objects: Vec<ObjectStatus>,
}

/// Typed access to the workspace endpoints
#[derive(Debug, Clone)]
pub struct WorkspaceApi {
    client: ApiClient,
}

impl WorkspaceApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    /// Fetch id, kind and language of the object at `path`
    pub fn get_status(&self, path: &WorkspacePath) -> Result<ObjectStatus> {
        let request = ApiRequest::get("/workspace/get-status").with_query("path", path.as_str());
        self.client.call(&request)
    }

    /// List objects under `path`.
    ///
    /// Non-recursive mode returns the immediate children as reported.
    /// Recursive mode expands every directory and returns only non-directory
    /// objects. Any failing sub-listing fails the whole call.
    pub fn list(&self, path: &WorkspacePath, recursive: bool) -> Result<Vec<ObjectStatus>> {
        if !recursive {
            return self.list_children(path);
        }
        let mut objects = Vec::new();
        self.collect_recursive(path, &mut objects)?;
        Ok(objects)
    }

    fn list_children(&self, path: &WorkspacePath) -> Result<Vec<ObjectStatus>> {
        let request = ApiRequest::get("/workspace/list").with_query("path", path.as_str());
        let response: ListResponse = self.client.call(&request)?;
        Ok(response.objects)
    }

    fn collect_recursive(&self, path: &WorkspacePath, out: &mut Vec<ObjectStatus>) -> Result<()> {
        for entry in self.list_children(path)? {
            if entry.is_directory() {
                let dir = WorkspacePath::parse(entry.path.as_str())?;
                self.collect_recursive(&dir, out)?;
            } else {
                out.push(entry);
            }
        }
        Ok(())
    }

    /// Create `path` and any missing parents. Succeeds if it already exists.
    pub fn mkdirs(&self, path: &WorkspacePath) -> Result<()> {
        let request = ApiRequest::post(
            "/workspace/mkdirs",
            &MkdirsRequest {
                path: path.to_string(),
            },
        )?;
        let _: serde_json::Value = self.client.call(&request)?;
        Ok(())
    }

    pub fn import(&self, import: &ImportRequest) -> Result<()> {
        WorkspacePath::parse(import.path.as_str())?;
        let request = ApiRequest::post("/workspace/import", import)?;
        let _: serde_json::Value = self.client.call(&request)?;
        Ok(())
    }

    /// Export the object at `path`, returning base64 content
    pub fn export(&self, path: &WorkspacePath, format: ExportFormat) -> Result<String> {
        let request = ApiRequest::get("/workspace/export")
            .with_query("format", format.as_str())
            .with_query("path", path.as_str());
        let response: ExportResponse = self.client.call(&request)?;
        Ok(response.content)
    }

    pub fn delete(&self, path: &WorkspacePath, recursive: bool) -> Result<()> {
        let request = ApiRequest::post(
            "/workspace/delete",
            &DeleteRequest {
                path: path.to_string(),
                recursive,
            },
        )?;
        let _: serde_json::Value = self.client.call(&request)?;
        Ok(())
    }
}
