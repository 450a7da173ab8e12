//! Workspace types
//!
//! These types describe the remote namespace:
//! - Validated absolute paths ([`WorkspacePath`])
//! - Object metadata reported by the workspace ([`ObjectStatus`])
//! - Notebook languages and export formats

pub mod api;

use serde::{Deserialize, Serialize};

use crate::error::{Result, WorkspaceError};

pub use api::WorkspaceApi;

/// Absolute, slash-delimited location in the workspace
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct WorkspacePath(String);

impl WorkspacePath {
    /// Validate and wrap a raw path
    pub fn parse(raw: impl Into<String>) -> Result<Self> {
        let raw = raw.into();
        let violations = Self::violations(&raw);
        if !violations.is_empty() {
            return Err(WorkspaceError::InvalidPath {
                reason: violations.join("; "),
                path: raw,
            });
        }
        Ok(Self(raw))
    }

    /// Every rule the raw path breaks. Empty when the path is valid.
    pub fn violations(raw: &str) -> Vec<&'static str> {
        let mut violations = Vec::new();
        if raw.is_empty() {
            violations.push("path cannot be empty");
        }
        if !raw.starts_with('/') {
            violations.push("path must start with '/'");
        }
        violations
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Parent directory, or `None` when the parent is the workspace root
    pub fn parent(&self) -> Option<WorkspacePath> {
        let trimmed = self.0.trim_end_matches('/');
        let idx = trimmed.rfind('/')?;
        if idx == 0 {
            return None;
        }
        Some(WorkspacePath(trimmed[..idx].to_string()))
    }

    /// Last path segment
    pub fn name(&self) -> &str {
        let trimmed = self.0.trim_end_matches('/');
        trimmed.rsplit('/').next().unwrap_or_default()
    }
}

impl TryFrom<String> for WorkspacePath {
    type Error = WorkspaceError;

    fn try_from(value: String) -> Result<Self> {
        WorkspacePath::parse(value)
    }
}

impl TryFrom<&str> for WorkspacePath {
    type Error = WorkspaceError;

    fn try_from(value: &str) -> Result<Self> {
        WorkspacePath::parse(value)
    }
}

impl From<WorkspacePath> for String {
    fn from(path: WorkspacePath) -> Self {
        path.0
    }
}

impl std::str::FromStr for WorkspacePath {
    type Err = WorkspaceError;

    fn from_str(s: &str) -> Result<Self> {
        WorkspacePath::parse(s)
    }
}

impl std::fmt::Display for WorkspacePath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for WorkspacePath {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Notebook source language
///
/// Tags the workspace reports beyond the known ones are kept verbatim in
/// [`Language::Other`] and sent back unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Language {
    Scala,
    Python,
    Sql,
    R,
    Other(String),
}

impl Language {
    pub fn as_str(&self) -> &str {
        match self {
            Language::Scala => "SCALA",
            Language::Python => "PYTHON",
            Language::Sql => "SQL",
            Language::R => "R",
            Language::Other(tag) => tag.as_str(),
        }
    }

    fn known(tag: &str) -> Option<Self> {
        match tag.to_uppercase().as_str() {
            "SCALA" => Some(Language::Scala),
            "PYTHON" => Some(Language::Python),
            "SQL" => Some(Language::Sql),
            "R" => Some(Language::R),
            _ => None,
        }
    }
}

impl From<String> for Language {
    fn from(tag: String) -> Self {
        Language::known(&tag).unwrap_or(Language::Other(tag))
    }
}

impl From<Language> for String {
    fn from(language: Language) -> Self {
        match language {
            Language::Other(tag) => tag,
            known => known.as_str().to_string(),
        }
    }
}

/// Strict parsing for declared languages
impl std::str::FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Language::known(s).ok_or_else(|| {
            format!("Unknown language '{s}'. Valid options: SCALA, PYTHON, SQL, R")
        })
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Encoding in which notebook content is exchanged
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ExportFormat {
    /// Plain source text (default)
    #[default]
    Source,
    Html,
    Jupyter,
    /// Zip bundle of JSON notebook descriptors
    Dbc,
}

impl ExportFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExportFormat::Source => "SOURCE",
            ExportFormat::Html => "HTML",
            ExportFormat::Jupyter => "JUPYTER",
            ExportFormat::Dbc => "DBC",
        }
    }

    /// Whether content is a packaged archive rather than flat bytes
    pub fn is_bundle(&self) -> bool {
        matches!(self, ExportFormat::Dbc)
    }
}

impl std::str::FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "SOURCE" => Ok(ExportFormat::Source),
            "HTML" => Ok(ExportFormat::Html),
            "JUPYTER" => Ok(ExportFormat::Jupyter),
            "DBC" => Ok(ExportFormat::Dbc),
            _ => Err(format!(
                "Unknown export format '{s}'. Valid options: SOURCE, HTML, JUPYTER, DBC"
            )),
        }
    }
}

impl std::fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind of workspace object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ObjectType {
    Notebook,
    Directory,
    Library,
    File,
    Repo,
    /// Any kind this crate does not know about
    #[serde(other)]
    Unknown,
}

/// Remote metadata for a workspace path
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectStatus {
    pub object_id: i64,
    pub object_type: ObjectType,
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<Language>,
}

impl ObjectStatus {
    pub fn is_directory(&self) -> bool {
        self.object_type == ObjectType::Directory
    }
}
