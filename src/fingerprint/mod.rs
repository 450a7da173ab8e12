//! Content fingerprints for notebook payloads
//!
//! A fingerprint is a CRC-32 based checksum of the *canonical* form of a
//! payload, so two exports of the same notebook compare equal even when their
//! bytes differ:
//! - flat formats (SOURCE, HTML, JUPYTER): checksum of the decoded bytes
//! - DBC bundles: per-entry checksum of the cell commands ordered by
//!   position, summed across entries (see [`dbc`])

pub mod dbc;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};

use crate::error::{Result, WorkspaceError};
use crate::workspace::ExportFormat;

/// Opaque checksum of normalized notebook content.
///
/// Only meaningful for equality; it cannot be turned back into content.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Fingerprint(u64);

impl Fingerprint {
    pub fn value(&self) -> u64 {
        self.0
    }

    /// Checksum of a single byte sequence
    pub(crate) fn of_bytes(bytes: &[u8]) -> Self {
        Fingerprint(u64::from(crc32fast::hash(bytes)))
    }

    /// Combine two fingerprints by numeric sum
    pub(crate) fn combine(self, other: Fingerprint) -> Self {
        Fingerprint(self.0.wrapping_add(other.0))
    }
}

impl std::fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for Fingerprint {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        s.parse::<u64>().map(Fingerprint)
    }
}

/// Fingerprint a base64 payload exchanged in `format`
pub fn fingerprint(content_base64: &str, format: ExportFormat) -> Result<Fingerprint> {
    let bytes = decode_base64(content_base64)?;
    if format.is_bundle() {
        dbc::fingerprint_archive(&bytes)
    } else {
        Ok(Fingerprint::of_bytes(&bytes))
    }
}

/// Whether two payloads carry the same logical content
pub fn same_content(a: &str, b: &str, format: ExportFormat) -> Result<bool> {
    Ok(fingerprint(a, format)? == fingerprint(b, format)?)
}

fn decode_base64(content: &str) -> Result<Vec<u8>> {
    STANDARD
        .decode(content)
        .map_err(|e| WorkspaceError::InvalidEncoding(e.to_string()))
}
