use oncocare_core::error::CoreError;
use oncocare_core::models::prompt::PromptAnswerPair;
use oncocare_core::models::record::PatientRecord;
use serde_json::json;

fn record() -> PatientRecord {
    PatientRecord::from_value(json!({
        "diagnosisDate": "2020-01-01",
        "gleasonScore": 7,
        "metastatic": false,
        "notes": null,
        "procedures": [
            {"type": "Biopsy", "date": "2019-12-10"},
            {"type": "Chemotherapy", "date": "2022-05-01"},
            {"type": "Chemotherapy"},
            {"type": "Biopsy", "date": "2020-03-02"}
        ],
        "labResults": [
            {"test": "PSA", "value": 8.2},
            {"test": "PSA", "value": "9.1"}
        ],
        "imagingStudies": [
            {"type": "CT Scan", "findings": "No evidence of metastatic disease"}
        ],
        "comorbidities": ["Hypertension", "Type 2 Diabetes"]
    }))
    .expect("valid record")
}

#[test]
fn absent_sections_read_as_empty() {
    let record = PatientRecord::from_json("{}").unwrap();
    assert!(record.procedures().is_empty());
    assert!(record.lab_results().is_empty());
    assert!(record.imaging_studies().is_empty());
    assert!(record.medications().is_empty());
    assert!(record.comorbidities().is_empty());
    assert!(record.disease_states().is_empty());
    assert_eq!(record.top_level_field("diagnosisDate"), None);
}

#[test]
fn null_sections_read_as_empty() {
    let record = PatientRecord::from_value(json!({"medications": null, "procedures": null})).unwrap();
    assert!(record.medications().is_empty());
    assert!(record.procedures().is_empty());
}

#[test]
fn lookups_take_the_first_match() {
    let record = record();
    assert_eq!(
        record.find_procedure("Biopsy").and_then(|p| p.date.as_deref()),
        Some("2019-12-10")
    );
    assert_eq!(
        record.find_lab_result("PSA").and_then(|l| l.value.as_deref()),
        Some("8.2")
    );
    assert_eq!(
        record
            .find_imaging_study("CT Scan")
            .and_then(|i| i.findings.as_deref()),
        Some("No evidence of metastatic disease")
    );
    assert!(record.find_procedure("Radical Prostatectomy").is_none());
    assert!(record.find_lab_result("psa").is_none());
}

#[test]
fn procedure_dates_skip_undated_entries() {
    let record = record();
    let dates: Vec<&str> = record.procedure_dates("Chemotherapy").collect();
    assert_eq!(dates, vec!["2022-05-01"]);
}

#[test]
fn top_level_fields_render_as_text() {
    let record = record();
    assert_eq!(record.top_level_field("diagnosisDate").as_deref(), Some("2020-01-01"));
    assert_eq!(record.top_level_field("gleasonScore").as_deref(), Some("7"));
    assert_eq!(record.top_level_field("metastatic").as_deref(), Some("false"));
    assert_eq!(record.top_level_field("notes"), None);
    assert_eq!(record.top_level_field("medications"), None);
}

#[test]
fn section_names_render_the_section_as_compact_json() {
    let record = record();
    assert_eq!(
        record.top_level_field("comorbidities").as_deref(),
        Some(r#"["Hypertension","Type 2 Diabetes"]"#)
    );
    assert_eq!(
        record.top_level_field("imagingStudies").as_deref(),
        Some(r#"[{"type":"CT Scan","findings":"No evidence of metastatic disease"}]"#)
    );

    let procedures: serde_json::Value =
        serde_json::from_str(&record.top_level_field("procedures").unwrap()).unwrap();
    assert_eq!(procedures[2], json!({"type": "Chemotherapy"}));
}

#[test]
fn nested_top_level_fields_render_as_compact_json() {
    let record = PatientRecord::from_value(json!({"stage": {"t": "T2", "n": "N0"}})).unwrap();
    let text = record.top_level_field("stage").unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(parsed, json!({"t": "T2", "n": "N0"}));
}

#[test]
fn wrongly_shaped_section_is_malformed() {
    let err = PatientRecord::from_value(json!({"procedures": "none"})).unwrap_err();
    assert!(matches!(err, CoreError::MalformedRecord(_)));
}

#[test]
fn nested_entry_values_render_as_compact_json() {
    let record = PatientRecord::from_value(json!({
        "labResults": [
            {"test": "Testosterone", "value": {"amount": 320, "unit": "ng/dL"}},
            {"test": "PSA", "value": 8.2}
        ],
        "procedures": [{"type": ["Biopsy", "Core"], "date": "2019-12-10"}]
    }))
    .unwrap();

    let text = record
        .find_lab_result("Testosterone")
        .and_then(|l| l.value.clone())
        .unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(parsed, json!({"amount": 320, "unit": "ng/dL"}));

    assert_eq!(
        record.find_lab_result("PSA").and_then(|l| l.value.as_deref()),
        Some("8.2")
    );
    assert_eq!(record.procedures()[0].kind.as_deref(), Some(r#"["Biopsy","Core"]"#));
}

#[test]
fn produced_answers_coerce_values_to_text() {
    let pairs = PromptAnswerPair::parse_list(
        r#"[
            {"prompt": "What was the last PSA level?", "answer": 8.2},
            {"prompt": "Metastatic?", "answer": true},
            {"prompt": "Diagnosis date?", "answer": "2020-01-01"},
            {"prompt": "Notes?", "answer": null},
            {"prompt": "Stage?"},
            {"prompt": "Stage detail?", "answer": {"t": "T2"}}
        ]"#,
    )
    .unwrap();

    let answers: Vec<&str> = pairs.iter().map(|p| p.answer.as_str()).collect();
    assert_eq!(answers, vec!["8.2", "true", "2020-01-01", "", "", r#"{"t":"T2"}"#]);
}

#[test]
fn produced_answers_must_be_a_list() {
    let err = PromptAnswerPair::parse_list(r#"{"prompt": "x", "answer": "y"}"#).unwrap_err();
    assert!(matches!(err, CoreError::Serialization(_)));
}
