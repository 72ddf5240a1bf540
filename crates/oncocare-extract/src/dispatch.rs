//! Rule dispatch: one extraction strategy per [`Source`].

use oncocare_core::models::prompt::PromptAnswerPair;
use oncocare_core::models::record::PatientRecord;
use oncocare_core::models::specification::{
    CHEMOTHERAPY_PROCEDURE, DataModelSpecification, RequiredInformationItem, Source,
};
use tracing::{debug, info};

use crate::UNKNOWN;
use crate::format;

/// Resolves one rule against a record. `None` means nothing was found.
pub type Strategy = fn(&RequiredInformationItem, &PatientRecord) -> Option<String>;

/// The extraction strategy for a source.
pub fn strategy_for(source: Source) -> Strategy {
    match source {
        Source::Procedures => procedure_date,
        Source::LabResults => lab_value,
        Source::ImagingStudies => imaging_findings,
        Source::Medications => medications,
        Source::Comorbidities => comorbidities,
        Source::DiseaseStates => disease_states,
        Source::Chemotherapy => latest_chemotherapy,
        Source::General => general_field,
    }
}

/// Resolve a single rule, without applying the `"Unknown"` sentinel.
pub fn resolve(item: &RequiredInformationItem, record: &PatientRecord) -> Option<String> {
    strategy_for(item.source)(item, record)
}

/// Produce one prompt/answer pair per rule, in specification order.
pub fn generate(spec: &DataModelSpecification, record: &PatientRecord) -> Vec<PromptAnswerPair> {
    let mut unresolved = 0usize;

    let pairs: Vec<PromptAnswerPair> = spec
        .items()
        .iter()
        .map(|item| {
            let answer = resolve(item, record);
            debug!(
                prompt = %item.prompt,
                name = %item.name,
                source = %item.source,
                found = answer.is_some(),
                "resolved rule"
            );
            let answer = answer.unwrap_or_else(|| {
                unresolved += 1;
                UNKNOWN.to_string()
            });
            PromptAnswerPair::new(item.prompt.clone(), answer)
        })
        .collect();

    info!(prompts = pairs.len(), unresolved, "generated prompts");
    pairs
}

fn procedure_date(item: &RequiredInformationItem, record: &PatientRecord) -> Option<String> {
    record.find_procedure(&item.name)?.date.clone()
}

fn lab_value(item: &RequiredInformationItem, record: &PatientRecord) -> Option<String> {
    record.find_lab_result(&item.name)?.value.clone()
}

fn imaging_findings(item: &RequiredInformationItem, record: &PatientRecord) -> Option<String> {
    record.find_imaging_study(&item.name)?.findings.clone()
}

fn medications(_: &RequiredInformationItem, record: &PatientRecord) -> Option<String> {
    Some(format::format_medications(record.medications()))
}

fn comorbidities(_: &RequiredInformationItem, record: &PatientRecord) -> Option<String> {
    Some(format::format_comorbidities(record.comorbidities()))
}

fn disease_states(_: &RequiredInformationItem, record: &PatientRecord) -> Option<String> {
    Some(format::format_disease_states(record.disease_states()))
}

// Lexicographic max is only chronological for ISO-8601 date strings.
fn latest_chemotherapy(_: &RequiredInformationItem, record: &PatientRecord) -> Option<String> {
    record
        .procedure_dates(CHEMOTHERAPY_PROCEDURE)
        .max()
        .map(str::to_string)
}

fn general_field(item: &RequiredInformationItem, record: &PatientRecord) -> Option<String> {
    record.top_level_field(&item.name)
}
