//! Sentence templates for the multi-entry record sections.
//!
//! Entries are rendered in record order. An empty section still produces
//! the full sentence with nothing between the colon and the period.

use oncocare_core::models::record::{DiseaseState, Medication};

use crate::{ONGOING, PRESENT, UNKNOWN};

/// `"The patient is currently on the following medications: <list>."`
pub fn format_medications(medications: &[Medication]) -> String {
    let list = join(medications.iter().map(describe_medication));
    format!("The patient is currently on the following medications: {list}.")
}

/// `"<name> (Dosage: <dosage>, Start Date: <start>, End Date: <end>)"`
pub fn describe_medication(medication: &Medication) -> String {
    format!(
        "{} (Dosage: {}, Start Date: {}, End Date: {})",
        or_default(&medication.name, UNKNOWN),
        or_default(&medication.dosage, UNKNOWN),
        or_default(&medication.start_date, UNKNOWN),
        or_default(&medication.end_date, ONGOING),
    )
}

/// `"The patient's disease states are: <list>."`
pub fn format_disease_states(states: &[DiseaseState]) -> String {
    let list = join(states.iter().map(describe_disease_state));
    format!("The patient's disease states are: {list}.")
}

/// `"<state> (from <start> to <end>)"`
pub fn describe_disease_state(state: &DiseaseState) -> String {
    format!(
        "{} (from {} to {})",
        or_default(&state.state, UNKNOWN),
        or_default(&state.start_date, UNKNOWN),
        or_default(&state.end_date, PRESENT),
    )
}

/// `"The patient has the following comorbidities: <list>."`
pub fn format_comorbidities(comorbidities: &[String]) -> String {
    format!(
        "The patient has the following comorbidities: {}.",
        comorbidities.join(", ")
    )
}

fn or_default<'a>(value: &'a Option<String>, default: &'a str) -> &'a str {
    value.as_deref().unwrap_or(default)
}

fn join(parts: impl Iterator<Item = String>) -> String {
    parts.collect::<Vec<_>>().join(", ")
}
