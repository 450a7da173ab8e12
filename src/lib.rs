//! Workspace Notebook SDK - notebook reconciliation for Databricks-style workspaces
//!
//! Provides:
//! - A resilient API caller (retry on 429, structured error classification)
//! - Format-aware content fingerprints (SOURCE bytes, DBC cell commands)
//! - Recursive workspace listing
//! - An idempotent create/read/delete lifecycle for single notebooks
//!
//! # Example
//!
//! ```rust,no_run
//! use workspace_notebook_sdk::{
//!     ApiClient, ClientConfig, DesiredNotebook, ExportFormat, Language, NotebookController,
//!     WorkspaceApi, WorkspacePath,
//! };
//!
//! # #[cfg(feature = "api-backend")]
//! # fn example() -> Result<(), workspace_notebook_sdk::WorkspaceError> {
//! let config = ClientConfig::from_env()?;
//! let controller = NotebookController::new(WorkspaceApi::new(ApiClient::from_config(&config)?));
//!
//! let desired = DesiredNotebook::new(WorkspacePath::parse("/Shared/etl/load.py")?, "YWJjCg==")
//!     .with_language(Language::Python)
//!     .with_format(ExportFormat::Source)
//!     .with_mkdirs(true);
//! let state = controller.create(&desired)?;
//! println!("{} -> object {}", state.id, state.object_id);
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod error;
pub mod fingerprint;
pub mod notebook;
pub mod workspace;

// Re-export commonly used types
#[cfg(feature = "api-backend")]
pub use client::HttpTransport;
pub use client::{
    ApiClient, ApiRequest, ApiResponse, BackoffStrategy, CallOutcome, ClientConfig, HttpMethod,
    RetryConfig, RetryPolicy, Transport,
};
pub use error::{Result, WorkspaceError};
pub use fingerprint::{Fingerprint, fingerprint, same_content};
pub use notebook::{DesiredNotebook, Drift, NotebookController, NotebookState, TrackedNotebook};
pub use workspace::api::{DeleteRequest, ExportResponse, ImportRequest, MkdirsRequest};
pub use workspace::{
    ExportFormat, Language, ObjectStatus, ObjectType, WorkspaceApi, WorkspacePath,
};
