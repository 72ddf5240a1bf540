use oncocare_core::models::prompt::PromptAnswerPair;
use oncocare_core::models::record::PatientRecord;
use oncocare_core::models::specification::{DataModelSpecification, Source};
use oncocare_extract::dispatch::resolve;
use oncocare_extract::generate;
use oncocare_extract::transcript::render_transcript;
use serde_json::{Value, json};

fn spec(rules: Value) -> DataModelSpecification {
    let document = json!({ "required_information": rules }).to_string();
    DataModelSpecification::parse(&document).expect("valid specification")
}

fn rule(prompt: &str, name: &str, source: &str) -> Value {
    json!({"prompt": prompt, "name": name, "source": source})
}

fn patient() -> PatientRecord {
    PatientRecord::from_value(json!({
        "diagnosisDate": "2020-01-01",
        "gleasonScore": 7,
        "procedures": [
            {"type": "Radical Prostatectomy", "date": "2020-04-15"},
            {"type": "Chemotherapy", "date": "2022-05-01"},
            {"type": "Chemotherapy", "date": "2023-02-01"},
            {"type": "Radical Prostatectomy", "date": "2021-01-01"}
        ],
        "labResults": [
            {"test": "PSA", "value": 8.2},
            {"test": "PSA", "value": 4.0},
            {"test": "Testosterone", "value": "320 ng/dL"}
        ],
        "imagingStudies": [
            {"type": "CT Scan", "findings": "No evidence of metastatic disease"},
            {"type": "Bone Scan"}
        ],
        "medications": [
            {"name": "Tamoxifen", "dosage": "20mg", "start_date": "2021-01-01"}
        ],
        "comorbidities": ["Hypertension"],
        "diseaseStates": [
            {"state": "Localized", "startDate": "2020-01-01"}
        ]
    }))
    .expect("valid record")
}

fn answer_for(rules: Value, record: &PatientRecord) -> Vec<String> {
    generate(&spec(rules), record)
        .into_iter()
        .map(|p| p.answer)
        .collect()
}

#[test]
fn one_pair_per_rule_in_specification_order() {
    let rules = json!([
        rule("What is the patient's diagnosis date?", "diagnosisDate", "general"),
        rule("What was the last PSA level?", "PSA", "labResults"),
        rule("When was the Radical Prostatectomy performed?", "Radical Prostatectomy", "procedures"),
    ]);
    let pairs = generate(&spec(rules), &patient());

    assert_eq!(
        pairs,
        vec![
            PromptAnswerPair::new("What is the patient's diagnosis date?", "2020-01-01"),
            PromptAnswerPair::new("What was the last PSA level?", "8.2"),
            PromptAnswerPair::new("When was the Radical Prostatectomy performed?", "2020-04-15"),
        ]
    );
}

#[test]
fn lookups_resolve_the_first_matching_entry() {
    let answers = answer_for(
        json!([
            rule("Prostatectomy?", "Radical Prostatectomy", "procedures"),
            rule("PSA?", "PSA", "labResults"),
            rule("Testosterone?", "Testosterone", "labResults"),
            rule("CT?", "CT Scan", "imagingStudies"),
        ]),
        &patient(),
    );
    assert_eq!(
        answers,
        vec![
            "2020-04-15",
            "8.2",
            "320 ng/dL",
            "No evidence of metastatic disease"
        ]
    );
}

#[test]
fn unmatched_lookups_answer_unknown() {
    let rules = json!([
        rule("Orchiectomy?", "Orchiectomy", "procedures"),
        rule("CEA?", "CEA", "labResults"),
        rule("MRI?", "MRI", "imagingStudies"),
        rule("Bone scan findings?", "Bone Scan", "imagingStudies"),
        rule("Stage?", "stage", "general"),
    ]);
    let answers = answer_for(rules.clone(), &patient());
    assert!(answers.iter().all(|a| a == "Unknown"), "{answers:?}");

    let answers = answer_for(rules, &PatientRecord::default());
    assert!(answers.iter().all(|a| a == "Unknown"), "{answers:?}");
}

#[test]
fn chemotherapy_answers_the_latest_date() {
    let rules = json!([rule("When was the last chemotherapy performed?", "chemo", "chemotherapy")]);
    assert_eq!(answer_for(rules.clone(), &patient()), vec!["2023-02-01"]);

    let no_chemo = PatientRecord::from_value(json!({
        "procedures": [{"type": "Biopsy", "date": "2019-01-01"}]
    }))
    .unwrap();
    assert_eq!(answer_for(rules, &no_chemo), vec!["Unknown"]);
}

#[test]
fn aggregate_sources_ignore_the_rule_name() {
    let answers = answer_for(
        json!([
            rule("Medications?", "anything", "medications"),
            rule("Comorbidities?", "", "comorbidities"),
            rule("Disease states?", "states", "diseaseStates"),
        ]),
        &patient(),
    );
    assert_eq!(
        answers,
        vec![
            "The patient is currently on the following medications: \
             Tamoxifen (Dosage: 20mg, Start Date: 2021-01-01, End Date: ongoing).",
            "The patient has the following comorbidities: Hypertension.",
            "The patient's disease states are: Localized (from 2020-01-01 to present).",
        ]
    );
}

#[test]
fn aggregate_sources_on_an_empty_record_keep_their_sentence() {
    let answers = answer_for(
        json!([rule("Medications?", "medications", "medications")]),
        &PatientRecord::default(),
    );
    assert_eq!(
        answers,
        vec!["The patient is currently on the following medications: ."]
    );
}

#[test]
fn general_rules_coerce_values_to_text() {
    let answers = answer_for(json!([rule("Gleason?", "gleasonScore", "general")]), &patient());
    assert_eq!(answers, vec!["7"]);
}

#[test]
fn general_rules_named_after_a_section_answer_with_its_json() {
    let answers = answer_for(
        json!([
            rule("Comorbidities?", "comorbidities", "general"),
            rule("Allergies?", "allergies", "general")
        ]),
        &patient(),
    );
    assert_eq!(answers, vec![r#"["Hypertension"]"#, "Unknown"]);
}

#[test]
fn nested_entry_values_do_not_block_other_rules() {
    let record = PatientRecord::from_value(json!({
        "diagnosisDate": "2020-01-01",
        "procedures": [{"type": "Radical Prostatectomy", "date": "2020-04-15"}],
        "labResults": [
            {"test": "Testosterone", "value": {"amount": 320, "unit": "ng/dL"}},
            {"test": "PSA", "value": 8.2}
        ]
    }))
    .expect("nested values are accepted");

    let answers: Vec<String> = generate(&DataModelSpecification::builtin().unwrap(), &record)
        .into_iter()
        .map(|p| p.answer)
        .collect();
    assert_eq!(
        answers,
        vec![
            "2020-04-15",
            "8.2",
            "The patient is currently on the following medications: .",
            "2020-01-01",
        ]
    );

    let testosterone = answer_for(
        json!([rule("Testosterone?", "Testosterone", "labResults")]),
        &record,
    );
    assert_eq!(testosterone, vec![r#"{"amount":320,"unit":"ng/dL"}"#]);
}

#[test]
fn resolve_reports_not_found_without_the_sentinel() {
    let spec = spec(json!([rule("Orchiectomy?", "Orchiectomy", "procedures")]));
    let item = &spec.items()[0];
    assert_eq!(item.source, Source::Procedures);
    assert_eq!(resolve(item, &patient()), None);
}

#[test]
fn generate_is_deterministic() {
    let spec = DataModelSpecification::builtin().unwrap();
    let record = patient();
    assert_eq!(generate(&spec, &record), generate(&spec, &record));
}

#[test]
fn transcript_lists_prompt_and_answer_per_line() {
    let pairs = vec![
        PromptAnswerPair::new("What was the last PSA level?", "8.2"),
        PromptAnswerPair::new("What is the patient's diagnosis date?", "Unknown"),
    ];
    assert_eq!(
        render_transcript(&pairs),
        "What was the last PSA level? - 8.2\nWhat is the patient's diagnosis date? - Unknown"
    );
    assert_eq!(render_transcript(&[]), "");
}
