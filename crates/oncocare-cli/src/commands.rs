use std::path::Path;

use clap::ValueEnum;
use oncocare_core::models::prompt::PromptAnswerPair;
use oncocare_core::models::record::PatientRecord;
use oncocare_core::models::specification::DataModelSpecification;
use oncocare_eval::scoring::{EvaluationReport, PromptOutcome};
use oncocare_extract::transcript::render_transcript;

use crate::config::{self, OncoConfig};
use crate::store::{self, RecordStore};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Pretty-printed JSON array of `{prompt, answer}` objects.
    #[default]
    Json,
    /// One `<prompt> - <answer>` line per pair.
    Text,
}

/// Load the specification at `path`, or the built-in one.
pub fn load_specification(path: Option<&Path>) -> eyre::Result<DataModelSpecification> {
    let spec = match path {
        Some(path) => {
            let document = std::fs::read_to_string(path).map_err(|e| {
                eyre::eyre!("failed to read specification at {}: {e}", path.display())
            })?;
            DataModelSpecification::parse(&document)?
        }
        None => {
            tracing::info!("using built-in specification");
            DataModelSpecification::builtin()?
        }
    };
    Ok(spec)
}

/// Load a record from a file, or look a patient up in the record store.
pub fn resolve_record(
    record: Option<&Path>,
    patient_id: Option<&str>,
    records_dir: Option<&Path>,
    details_key: &str,
) -> eyre::Result<PatientRecord> {
    if let Some(path) = record {
        return store::load_record_file(path, details_key);
    }

    let patient_id =
        patient_id.ok_or_else(|| eyre::eyre!("either --record or --patient-id is required"))?;
    let dir = records_dir.ok_or_else(|| {
        eyre::eyre!("--patient-id needs --records-dir or `records_dir` in the config")
    })?;

    RecordStore::new(dir, details_key)
        .find(patient_id)?
        .ok_or_else(|| eyre::eyre!("patient {patient_id} not found in {}", dir.display()))
}

pub fn load_answers(path: &Path) -> eyre::Result<Vec<PromptAnswerPair>> {
    let document = std::fs::read_to_string(path)
        .map_err(|e| eyre::eyre!("failed to read answers at {}: {e}", path.display()))?;
    let pairs = PromptAnswerPair::parse_list(&document)?;
    tracing::info!(answers = pairs.len(), "loaded produced answers");
    Ok(pairs)
}

pub fn render_pairs(pairs: &[PromptAnswerPair], format: OutputFormat) -> eyre::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(pairs)?),
        OutputFormat::Text => Ok(render_transcript(pairs)),
    }
}

pub fn render_specification(spec: &DataModelSpecification) -> eyre::Result<String> {
    Ok(serde_json::to_string_pretty(spec)?)
}

/// `Accuracy: 66.67% (2/3)`, optionally followed by one line per prompt.
pub fn render_evaluation(report: &EvaluationReport, detailed: bool) -> String {
    let accuracy = &report.accuracy;
    let mut out = format!(
        "Accuracy: {accuracy} ({}/{})",
        accuracy.correct(),
        accuracy.total()
    );

    if detailed {
        for outcome in &report.outcomes {
            let line = match outcome {
                PromptOutcome::Matched { prompt } => format!("\n  [ok] {prompt}"),
                PromptOutcome::Mismatched {
                    prompt,
                    expected,
                    produced,
                } => format!("\n  [mismatch] {prompt}: expected {expected:?}, got {produced:?}"),
                PromptOutcome::Missing { prompt, expected } => {
                    format!("\n  [missing] {prompt}: expected {expected:?}")
                }
            };
            out.push_str(&line);
        }
    }

    out
}

/// Write a default config to `path` (or the default location).
pub fn init_config(path: Option<&Path>, force: bool) -> eyre::Result<std::path::PathBuf> {
    let path = match path {
        Some(path) => path.to_path_buf(),
        None => config::default_config_path()?,
    };
    if path.exists() && !force {
        return Err(eyre::eyre!(
            "config already exists at {} (use --force to overwrite)",
            path.display()
        ));
    }
    config::save_config(&OncoConfig::default(), &path)?;
    Ok(path)
}
