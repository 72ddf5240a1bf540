use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::CoreError;
use crate::text;

/// One patient's record: typed clinical sections plus a catch-all bag of
/// top-level fields (`diagnosisDate`, `gleasonScore`, ...).
///
/// Every section is optional in the source document. A missing or `null`
/// section reads as empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientRecord {
    #[serde(default, deserialize_with = "text::nullable_list")]
    pub procedures: Vec<Procedure>,
    #[serde(default, deserialize_with = "text::nullable_list")]
    pub lab_results: Vec<LabResult>,
    #[serde(default, deserialize_with = "text::nullable_list")]
    pub imaging_studies: Vec<ImagingStudy>,
    #[serde(default, deserialize_with = "text::nullable_list")]
    pub medications: Vec<Medication>,
    #[serde(default, deserialize_with = "text::nullable_list")]
    pub comorbidities: Vec<String>,
    #[serde(default, deserialize_with = "text::nullable_list")]
    pub disease_states: Vec<DiseaseState>,
    #[serde(flatten)]
    pub general: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Procedure {
    #[serde(
        rename = "type",
        default,
        deserialize_with = "text::optional_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub kind: Option<String>,
    #[serde(
        default,
        deserialize_with = "text::optional_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub date: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabResult {
    #[serde(
        default,
        deserialize_with = "text::optional_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub test: Option<String>,
    #[serde(
        default,
        deserialize_with = "text::optional_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub value: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImagingStudy {
    #[serde(
        rename = "type",
        default,
        deserialize_with = "text::optional_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub kind: Option<String>,
    #[serde(
        default,
        deserialize_with = "text::optional_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub findings: Option<String>,
}

/// Medication dates use snake_case keys in stored records, unlike the
/// camelCase disease-state dates.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Medication {
    #[serde(
        default,
        deserialize_with = "text::optional_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub name: Option<String>,
    #[serde(
        default,
        deserialize_with = "text::optional_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub dosage: Option<String>,
    #[serde(
        default,
        deserialize_with = "text::optional_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub start_date: Option<String>,
    #[serde(
        default,
        deserialize_with = "text::optional_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub end_date: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiseaseState {
    #[serde(
        default,
        deserialize_with = "text::optional_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub state: Option<String>,
    #[serde(
        default,
        deserialize_with = "text::optional_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub start_date: Option<String>,
    #[serde(
        default,
        deserialize_with = "text::optional_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub end_date: Option<String>,
}

impl PatientRecord {
    /// Parse a record from a JSON document.
    pub fn from_json(document: &str) -> Result<Self, CoreError> {
        serde_json::from_str(document).map_err(|e| CoreError::MalformedRecord(e.to_string()))
    }

    /// Build a record from an already-decoded JSON value.
    pub fn from_value(value: Value) -> Result<Self, CoreError> {
        serde_json::from_value(value).map_err(|e| CoreError::MalformedRecord(e.to_string()))
    }

    pub fn procedures(&self) -> &[Procedure] {
        &self.procedures
    }

    pub fn lab_results(&self) -> &[LabResult] {
        &self.lab_results
    }

    pub fn imaging_studies(&self) -> &[ImagingStudy] {
        &self.imaging_studies
    }

    pub fn medications(&self) -> &[Medication] {
        &self.medications
    }

    pub fn comorbidities(&self) -> &[String] {
        &self.comorbidities
    }

    pub fn disease_states(&self) -> &[DiseaseState] {
        &self.disease_states
    }

    /// The first procedure of the given type, in record order.
    pub fn find_procedure(&self, kind: &str) -> Option<&Procedure> {
        self.procedures
            .iter()
            .find(|p| p.kind.as_deref() == Some(kind))
    }

    /// The first lab result for the given test, in record order.
    pub fn find_lab_result(&self, test: &str) -> Option<&LabResult> {
        self.lab_results
            .iter()
            .find(|l| l.test.as_deref() == Some(test))
    }

    /// The first imaging study of the given type, in record order.
    pub fn find_imaging_study(&self, kind: &str) -> Option<&ImagingStudy> {
        self.imaging_studies
            .iter()
            .find(|i| i.kind.as_deref() == Some(kind))
    }

    /// Dates of every procedure of the given type. Undated entries are skipped.
    pub fn procedure_dates<'a>(&'a self, kind: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.procedures
            .iter()
            .filter(move |p| p.kind.as_deref() == Some(kind))
            .filter_map(|p| p.date.as_deref())
    }

    /// A top-level field rendered as text.
    ///
    /// Returns `None` when the field is absent or `null`. Names of typed
    /// sections render the section as compact JSON, or `None` when it is
    /// empty.
    pub fn top_level_field(&self, name: &str) -> Option<String> {
        if let Some(value) = self.general.get(name) {
            return text::value_text(value);
        }
        match name {
            "procedures" => section_json(&self.procedures),
            "labResults" => section_json(&self.lab_results),
            "imagingStudies" => section_json(&self.imaging_studies),
            "medications" => section_json(&self.medications),
            "comorbidities" => section_json(&self.comorbidities),
            "diseaseStates" => section_json(&self.disease_states),
            _ => None,
        }
    }
}

fn section_json<T: Serialize>(entries: &[T]) -> Option<String> {
    if entries.is_empty() {
        return None;
    }
    serde_json::to_string(entries).ok()
}
