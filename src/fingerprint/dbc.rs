//! DBC bundle normalization
//!
//! A DBC export is a zip archive with one JSON descriptor per notebook. Its
//! byte layout (timestamps, compression, entry order, metadata) is not stable
//! across exports of the same notebook, so only the cell commands are
//! fingerprinted: ordered by `position`, concatenated, checksummed per entry,
//! and summed across entries.

use std::collections::BTreeMap;
use std::io::{Cursor, Read};

use serde::Deserialize;

use super::Fingerprint;
use crate::error::{Result, WorkspaceError};

/// Notebook descriptor inside a DBC archive. Only the cells matter here.
#[derive(Debug, Deserialize)]
struct NotebookDescriptor {
    commands: Vec<CommandCell>,
}

/// One notebook cell
#[derive(Debug, Deserialize)]
struct CommandCell {
    /// Exports write positions as JSON numbers such as `1.0`
    position: f64,
    command: String,
}

/// Fingerprint raw (already base64-decoded) DBC archive bytes.
///
/// An archive without file entries fingerprints to zero.
pub fn fingerprint_archive(bytes: &[u8]) -> Result<Fingerprint> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes))
        .map_err(|e| WorkspaceError::InvalidPayload(format!("Failed to read DBC archive: {e}")))?;

    let mut total = Fingerprint::default();
    for index in 0..archive.len() {
        let mut entry = archive.by_index(index).map_err(|e| {
            WorkspaceError::InvalidPayload(format!("Failed to read DBC entry {index}: {e}"))
        })?;
        if entry.is_dir() {
            continue;
        }

        let name = entry.name().to_string();
        let mut content = Vec::new();
        entry.read_to_end(&mut content).map_err(|e| {
            WorkspaceError::InvalidPayload(format!("Failed to read DBC entry {name}: {e}"))
        })?;

        let commands = canonical_commands(&content).map_err(|e| match e {
            WorkspaceError::InvalidPayload(reason) => {
                WorkspaceError::InvalidPayload(format!("{name}: {reason}"))
            }
            other => other,
        })?;
        total = total.combine(Fingerprint::of_bytes(commands.as_bytes()));
    }

    Ok(total)
}

/// Concatenated cell commands of one descriptor, ordered by position.
///
/// Cells sharing a position overwrite each other in document order.
pub fn canonical_commands(descriptor: &[u8]) -> Result<String> {
    let notebook: NotebookDescriptor = serde_json::from_slice(descriptor).map_err(|e| {
        WorkspaceError::InvalidPayload(format!("Invalid notebook descriptor: {e}"))
    })?;

    let mut by_position: BTreeMap<i64, String> = BTreeMap::new();
    for cell in notebook.commands {
        by_position.insert(cell.position.trunc() as i64, cell.command);
    }

    Ok(by_position.into_values().collect())
}
