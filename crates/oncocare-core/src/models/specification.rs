use std::fmt;

use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{info, warn};

use crate::error::CoreError;

/// Top-level key holding the list of extraction rules.
pub const REQUIRED_INFORMATION_KEY: &str = "required_information";

/// Procedure type whose most recent date answers a `chemotherapy` rule.
pub const CHEMOTHERAPY_PROCEDURE: &str = "Chemotherapy";

/// The built-in oncology specification used when no document is supplied.
pub const DEFAULT_SPECIFICATION: &str = r#"{
    "required_information": [
        {
            "prompt": "When was the Radical Prostatectomy performed?",
            "name": "Radical Prostatectomy",
            "source": "procedures"
        },
        {
            "prompt": "What was the last PSA level?",
            "name": "PSA",
            "source": "labResults"
        },
        {
            "prompt": "What medications is the patient currently on?",
            "name": "medications",
            "source": "medications"
        },
        {
            "prompt": "What is the patient's diagnosis date?",
            "name": "diagnosisDate",
            "source": "general"
        }
    ]
}"#;

/// The record section (or aggregation) an extraction rule reads from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Source {
    Procedures,
    LabResults,
    ImagingStudies,
    Medications,
    Comorbidities,
    DiseaseStates,
    /// Most recent date across procedures of type `Chemotherapy`.
    Chemotherapy,
    /// Direct lookup of `name` on the record's top-level fields.
    General,
}

impl Source {
    pub const ALL: [Source; 8] = [
        Source::Procedures,
        Source::LabResults,
        Source::ImagingStudies,
        Source::Medications,
        Source::Comorbidities,
        Source::DiseaseStates,
        Source::Chemotherapy,
        Source::General,
    ];

    /// The tag used for this source in specification documents.
    pub fn tag(self) -> &'static str {
        match self {
            Source::Procedures => "procedures",
            Source::LabResults => "labResults",
            Source::ImagingStudies => "imagingStudies",
            Source::Medications => "medications",
            Source::Comorbidities => "comorbidities",
            Source::DiseaseStates => "diseaseStates",
            Source::Chemotherapy => "chemotherapy",
            Source::General => "general",
        }
    }

    /// Look up a source by its exact tag.
    pub fn from_known_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|source| source.tag() == tag)
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// One field to extract: the question to ask, the key to look up, and the
/// section to look in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RequiredInformationItem {
    pub prompt: String,
    pub name: String,
    pub source: Source,
}

/// The declarative list of fields to extract, in output order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DataModelSpecification {
    pub required_information: Vec<RequiredInformationItem>,
}

impl DataModelSpecification {
    /// Parse a JSON specification document.
    ///
    /// The document must be an object with a `required_information` array;
    /// each entry needs string `prompt`, `name`, and `source` fields, and the
    /// prompt must not be blank.
    pub fn parse(document: &str) -> Result<Self, CoreError> {
        let value: Value = serde_json::from_str(document)
            .map_err(|e| malformed(format!("not valid JSON: {e}")))?;

        let entries = value
            .get(REQUIRED_INFORMATION_KEY)
            .and_then(Value::as_array)
            .ok_or_else(|| {
                malformed(format!(
                    "expected an object with a `{REQUIRED_INFORMATION_KEY}` array"
                ))
            })?;

        let required_information = entries
            .iter()
            .enumerate()
            .map(|(index, entry)| parse_item(index, entry))
            .collect::<Result<Vec<_>, _>>()?;

        info!(
            rules = required_information.len(),
            "parsed data model specification"
        );

        Ok(Self {
            required_information,
        })
    }

    /// The built-in oncology specification.
    pub fn builtin() -> Result<Self, CoreError> {
        Self::parse(DEFAULT_SPECIFICATION)
    }

    pub fn items(&self) -> &[RequiredInformationItem] {
        &self.required_information
    }

    pub fn len(&self) -> usize {
        self.required_information.len()
    }

    pub fn is_empty(&self) -> bool {
        self.required_information.is_empty()
    }
}

fn parse_item(index: usize, entry: &Value) -> Result<RequiredInformationItem, CoreError> {
    let object = entry
        .as_object()
        .ok_or_else(|| malformed(format!("entry {index} is not an object")))?;

    let prompt = string_field(object, index, "prompt")?;
    if prompt.trim().is_empty() {
        return Err(malformed(format!("entry {index}: `prompt` is empty")));
    }
    let name = string_field(object, index, "name")?;
    let tag = string_field(object, index, "source")?;

    let source = match Source::from_known_tag(&tag) {
        Some(source) => source,
        None => {
            warn!(index, source = %tag, "unrecognised source tag, using general lookup");
            Source::General
        }
    };

    Ok(RequiredInformationItem {
        prompt,
        name,
        source,
    })
}

fn string_field(object: &Map<String, Value>, index: usize, key: &str) -> Result<String, CoreError> {
    match object.get(key) {
        Some(Value::String(s)) => Ok(s.clone()),
        Some(_) => Err(malformed(format!("entry {index}: `{key}` must be a string"))),
        None => Err(malformed(format!("entry {index}: missing `{key}`"))),
    }
}

fn malformed(message: String) -> CoreError {
    CoreError::MalformedSpecification(message)
}
