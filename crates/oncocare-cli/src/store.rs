//! File-backed patient record lookup.
//!
//! Each patient lives in `<records_dir>/<patient id>.json`. Stored documents
//! wrap the record under an envelope key (`patientDetails` by default)
//! alongside storage metadata; bare records are accepted too.

use std::path::{Path, PathBuf};

use oncocare_core::models::record::PatientRecord;
use serde_json::Value;

pub struct RecordStore {
    dir: PathBuf,
    details_key: String,
}

impl RecordStore {
    pub fn new(dir: impl Into<PathBuf>, details_key: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            details_key: details_key.into(),
        }
    }

    /// Load a patient's record. Returns `Ok(None)` when no such patient exists.
    pub fn find(&self, patient_id: &str) -> eyre::Result<Option<PatientRecord>> {
        validate_patient_id(patient_id)?;

        let path = self.dir.join(format!("{patient_id}.json"));
        if !path.exists() {
            tracing::info!(patient_id, dir = %self.dir.display(), "patient not found");
            return Ok(None);
        }

        let record = load_record_file(&path, &self.details_key)?;
        tracing::info!(patient_id, "patient record loaded");
        Ok(Some(record))
    }
}

/// Read a record document from disk, unwrapping the envelope if present.
pub fn load_record_file(path: &Path, details_key: &str) -> eyre::Result<PatientRecord> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| eyre::eyre!("failed to read record at {}: {e}", path.display()))?;
    let document: Value = serde_json::from_str(&contents)
        .map_err(|e| eyre::eyre!("record at {} is not valid JSON: {e}", path.display()))?;

    let record = PatientRecord::from_value(unwrap_details(document, details_key))?;
    Ok(record)
}

/// Take the record out of its storage envelope. Documents without an
/// object under `details_key` are returned unchanged.
pub fn unwrap_details(document: Value, details_key: &str) -> Value {
    match document {
        Value::Object(mut obj) if obj.get(details_key).is_some_and(Value::is_object) => obj
            .remove(details_key)
            .unwrap_or(Value::Object(Default::default())),
        other => other,
    }
}

/// Patient ids are single path components: letters, digits, `-` and `_`.
fn validate_patient_id(patient_id: &str) -> eyre::Result<()> {
    let valid = !patient_id.is_empty()
        && patient_id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if valid {
        Ok(())
    } else {
        Err(eyre::eyre!("invalid patient id: {patient_id:?}"))
    }
}
