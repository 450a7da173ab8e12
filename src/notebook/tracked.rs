//! Tracked resource state at the host-framework boundary
//!
//! Mirrors how a declarative framework stores a resource between plan/apply
//! runs: an identifier plus the last reported attributes.

use super::{DesiredNotebook, NotebookController, NotebookState, vanished};
use crate::error::Result;
use crate::workspace::{ExportFormat, WorkspacePath};

/// Identifier and last known state of one managed notebook
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrackedNotebook {
    /// Empty while the notebook is absent
    pub id: Option<WorkspacePath>,
    pub state: Option<NotebookState>,
}

impl TrackedNotebook {
    /// Start tracking an existing notebook by path
    pub fn existing(path: WorkspacePath) -> Self {
        Self {
            id: Some(path),
            state: None,
        }
    }

    pub fn is_present(&self) -> bool {
        self.id.is_some()
    }

    /// Create the notebook.
    ///
    /// The identifier is assigned as soon as the import succeeds, so a failing
    /// read-back still leaves the notebook tracked.
    pub fn create(
        &mut self,
        controller: &NotebookController,
        desired: &DesiredNotebook,
    ) -> Result<()> {
        controller.upload(desired)?;
        self.id = Some(desired.path.clone());
        self.state = None;

        self.refresh(controller, desired.format)?;
        if self.id.is_none() {
            return Err(vanished(&desired.path));
        }
        Ok(())
    }

    /// Refresh from the workspace.
    ///
    /// A missing notebook clears the identifier; any other failure keeps it
    /// so callers can tell "gone" from "broken".
    pub fn refresh(&mut self, controller: &NotebookController, format: ExportFormat) -> Result<()> {
        let Some(path) = self.id.clone() else {
            return Ok(());
        };
        match controller.read(&path, format)? {
            Some(state) => self.state = Some(state),
            None => {
                self.id = None;
                self.state = None;
            }
        }
        Ok(())
    }

    /// Delete the notebook. A successful delete leaves it absent.
    pub fn destroy(&mut self, controller: &NotebookController, recursive: bool) -> Result<()> {
        let Some(path) = self.id.clone() else {
            return Ok(());
        };
        controller.delete(&path, recursive)?;
        self.id = None;
        self.state = None;
        Ok(())
    }

    /// Delete using the declared `delete_recursive` flag
    pub fn destroy_declared(
        &mut self,
        controller: &NotebookController,
        desired: &DesiredNotebook,
    ) -> Result<()> {
        self.destroy(controller, desired.delete_recursive)
    }
}
