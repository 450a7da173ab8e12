//! Notebook lifecycle controller
//!
//! Converges one workspace notebook towards a declared [`DesiredNotebook`]:
//! - `create`: optional parent directory creation, then an upsert import,
//!   then a fresh read of what the workspace actually holds
//! - `read`: export + status; a missing object is reported as absent, not
//!   as an error
//! - `delete`: (recursive) removal
//!
//! The controller is stateless. All state lives in the workspace; callers
//! keep whatever they need to track between calls (see [`TrackedNotebook`]).

pub mod tracked;

use serde::{Deserialize, Serialize};

use crate::error::{Result, WorkspaceError};
use crate::fingerprint::{Fingerprint, fingerprint};
use crate::workspace::api::ImportRequest;
use crate::workspace::{ExportFormat, Language, ObjectType, WorkspaceApi, WorkspacePath};

pub use tracked::TrackedNotebook;

/// Declared state of a notebook
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DesiredNotebook {
    pub path: WorkspacePath,
    /// Base64-encoded content in `format`
    pub content: String,
    #[serde(default)]
    pub language: Option<Language>,
    #[serde(default)]
    pub format: ExportFormat,
    /// Kept for the declared state; imports always overwrite
    #[serde(default)]
    pub overwrite: bool,
    /// Create missing parent directories before importing
    #[serde(default)]
    pub mkdirs: bool,
    /// Delete recursively when the notebook is destroyed
    #[serde(default = "default_delete_recursive")]
    pub delete_recursive: bool,
}

fn default_delete_recursive() -> bool {
    true
}

impl DesiredNotebook {
    pub fn new(path: WorkspacePath, content: impl Into<String>) -> Self {
        Self {
            path,
            content: content.into(),
            language: None,
            format: ExportFormat::default(),
            overwrite: false,
            mkdirs: false,
            delete_recursive: default_delete_recursive(),
        }
    }

    pub fn with_language(mut self, language: Language) -> Self {
        self.language = Some(language);
        self
    }

    pub fn with_format(mut self, format: ExportFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }

    pub fn with_mkdirs(mut self, mkdirs: bool) -> Self {
        self.mkdirs = mkdirs;
        self
    }

    pub fn with_delete_recursive(mut self, recursive: bool) -> Self {
        self.delete_recursive = recursive;
        self
    }

    /// Fingerprint of the declared content
    pub fn fingerprint(&self) -> Result<Fingerprint> {
        fingerprint(&self.content, self.format)
    }
}

/// State of a notebook as reported by the workspace
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotebookState {
    /// External identifier (the workspace path)
    pub id: String,
    pub path: String,
    /// Fingerprint of the exported content
    pub content: Fingerprint,
    pub language: Option<Language>,
    pub format: ExportFormat,
    pub object_id: i64,
    pub object_type: ObjectType,
}

/// Attribute that differs between declared and reported state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Drift {
    Path,
    Content,
    Language,
    Format,
}

/// Create/read/delete for single notebooks
#[derive(Debug, Clone)]
pub struct NotebookController {
    api: WorkspaceApi,
}

impl NotebookController {
    pub fn new(api: WorkspaceApi) -> Self {
        Self { api }
    }

    pub fn api(&self) -> &WorkspaceApi {
        &self.api
    }

    /// Upsert the notebook and report what the workspace now holds.
    ///
    /// Nothing is reported unless every step succeeds.
    pub fn create(&self, desired: &DesiredNotebook) -> Result<NotebookState> {
        self.upload(desired)?;
        self.read(&desired.path, desired.format)?
            .ok_or_else(|| vanished(&desired.path))
    }

    /// Create the parent directory when asked to, then import with overwrite
    pub fn upload(&self, desired: &DesiredNotebook) -> Result<()> {
        if desired.mkdirs {
            self.ensure_parent(&desired.path)?;
        }

        self.api.import(&ImportRequest {
            content: desired.content.clone(),
            path: desired.path.to_string(),
            language: desired.language.clone(),
            overwrite: true,
            format: desired.format,
        })?;
        tracing::info!(path = %desired.path, format = %desired.format, "Imported notebook");
        Ok(())
    }

    fn ensure_parent(&self, path: &WorkspacePath) -> Result<()> {
        let Some(parent) = path.parent() else {
            return Ok(());
        };
        match self.api.get_status(&parent) {
            Ok(_) => Ok(()),
            Err(e) if e.is_not_found() => {
                tracing::debug!(parent = %parent, "Parent directory missing, creating it");
                self.api.mkdirs(&parent)
            }
            Err(e) => Err(e),
        }
    }

    /// Read the notebook at `path`.
    ///
    /// Returns `Ok(None)` when the workspace reports it missing.
    pub fn read(&self, path: &WorkspacePath, format: ExportFormat) -> Result<Option<NotebookState>> {
        let content = match self.api.export(path, format) {
            Ok(content) => content,
            Err(e) if e.is_not_found() => {
                tracing::debug!(path = %path, "Notebook not found on export, reporting absent");
                return Ok(None);
            }
            Err(e) => return Err(e),
        };
        let content = fingerprint(&content, format)?;

        let status = match self.api.get_status(path) {
            Ok(status) => status,
            Err(e) if e.is_not_found() => {
                tracing::debug!(path = %path, "Notebook not found on status, reporting absent");
                return Ok(None);
            }
            Err(e) => return Err(e),
        };

        Ok(Some(NotebookState {
            id: path.to_string(),
            path: status.path,
            content,
            language: status.language,
            format,
            object_id: status.object_id,
            object_type: status.object_type,
        }))
    }

    /// Delete the notebook (or directory) at `path`
    pub fn delete(&self, path: &WorkspacePath, recursive: bool) -> Result<()> {
        self.api.delete(path, recursive)?;
        tracing::info!(path = %path, recursive, "Deleted notebook");
        Ok(())
    }

    /// Attributes where `reported` diverges from `desired`.
    ///
    /// Content is compared by fingerprint. A language the declaration leaves
    /// unset never drifts.
    pub fn diff(desired: &DesiredNotebook, reported: &NotebookState) -> Result<Vec<Drift>> {
        let mut drift = Vec::new();
        if desired.path.as_str() != reported.path {
            drift.push(Drift::Path);
        }
        if desired.fingerprint()? != reported.content {
            drift.push(Drift::Content);
        }
        if desired.language.is_some() && desired.language != reported.language {
            drift.push(Drift::Language);
        }
        if desired.format != reported.format {
            drift.push(Drift::Format);
        }
        Ok(drift)
    }
}

/// Error for a notebook that is missing right after a successful import
pub(crate) fn vanished(path: &WorkspacePath) -> WorkspaceError {
    WorkspaceError::NotFound {
        path: path.to_string(),
        message: format!("{path} disappeared right after import"),
    }
}
