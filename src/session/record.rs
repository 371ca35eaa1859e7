//! Flat session record shared with collaborator scripts.
//!
//! The record mirrors the file format follow-up tools consume: a flat JSON
//! object with the session cookie value and, once probed, the sesskey that
//! authorizes the portal's internal AJAX calls.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors reading or writing the session record file.
#[derive(Debug, Error)]
pub enum RecordError {
    /// File system error.
    #[error("IO error accessing {path}: {source}")]
    Io {
        /// The record path.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The file exists but is not a valid session record.
    #[error("malformed session record at {path}: {source}")]
    Format {
        /// The record path.
        path: PathBuf,
        /// The underlying JSON error.
        #[source]
        source: serde_json::Error,
    },
}

/// Session identifiers produced by login and consumed by collaborators.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionRecord {
    /// Value of the portal session cookie.
    pub moodle_session: String,
    /// Per-session key scraped from authenticated pages; required by the
    /// portal's internal AJAX endpoints. Absent until probed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sesskey: Option<String>,
}

impl SessionRecord {
    /// Creates a record from a session cookie value, with no sesskey yet.
    pub fn new(moodle_session: impl Into<String>) -> Self {
        Self {
            moodle_session: moodle_session.into(),
            sesskey: None,
        }
    }

    /// Writes the record as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns [`RecordError::Io`] when the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<(), RecordError> {
        // Serialization of this struct cannot fail; only IO can.
        let json = serde_json::to_string_pretty(self).map_err(|source| RecordError::Format {
            path: path.to_path_buf(),
            source,
        })?;
        std::fs::write(path, json).map_err(|source| RecordError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Reads a previously saved record.
    ///
    /// # Errors
    ///
    /// Returns [`RecordError::Io`] when the file cannot be read and
    /// [`RecordError::Format`] when its content is not a valid record.
    pub fn load(path: &Path) -> Result<Self, RecordError> {
        let data = std::fs::read_to_string(path).map_err(|source| RecordError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&data).map_err(|source| RecordError::Format {
            path: path.to_path_buf(),
            source,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("session.json");

        let mut record = SessionRecord::new("abc123session");
        record.sesskey = Some("Kk11ZzQq".to_string());
        record.save(&path).unwrap();

        let loaded = SessionRecord::load(&path).unwrap();
        assert_eq!(loaded, record);
    }

    #[test]
    fn test_serializes_as_flat_camel_case_object() {
        let record = SessionRecord::new("abc");
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json, serde_json::json!({ "moodleSession": "abc" }));
    }

    #[test]
    fn test_load_tolerates_record_without_sesskey() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(&path, r#"{"moodleSession":"abc"}"#).unwrap();

        let loaded = SessionRecord::load(&path).unwrap();
        assert_eq!(loaded.moodle_session, "abc");
        assert_eq!(loaded.sesskey, None);
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let result = SessionRecord::load(&dir.path().join("absent.json"));
        assert!(matches!(result, Err(RecordError::Io { .. })));
    }

    #[test]
    fn test_load_malformed_file_is_format_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(&path, "not json").unwrap();

        let result = SessionRecord::load(&path);
        assert!(matches!(result, Err(RecordError::Format { .. })));
    }
}
