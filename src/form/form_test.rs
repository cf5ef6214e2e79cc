use super::*;

fn at() -> OffsetDateTime {
    OffsetDateTime::from_unix_timestamp(1_700_000_000).unwrap()
}

fn trademark_store() -> FormStore {
    let mut store = FormStore::default();
    store.set_filing_type(Some(FilingType::Trademark));
    store
}

// =========================================================================
// filing type + answers
// =========================================================================

#[test]
fn default_store_is_empty() {
    let store = FormStore::default();
    assert_eq!(store.filing_type(), None);
    assert_eq!(store.current_step(), 0);
    assert!(store.answers().is_none());
    assert!(store.uploaded_files().is_empty());
    assert_eq!(store.compliance_score(), 0);
    assert!(store.suggestions().is_empty());
}

#[test]
fn switching_filing_type_resets_answers() {
    let mut store = trademark_store();
    store
        .update_answers(AnswersPatch::single(FilingType::Trademark, "markName", "Acme").unwrap())
        .unwrap();

    store.set_filing_type(Some(FilingType::Trademark));
    assert_eq!(store.answers().unwrap().text("markName"), Some("Acme"));

    store.set_filing_type(Some(FilingType::Patent));
    assert_eq!(store.answers(), Some(&Answers::empty(FilingType::Patent)));
}

#[test]
fn update_without_filing_type_fails() {
    let mut store = FormStore::default();
    let err = store
        .update_answers(AnswersPatch::Patent(PatentPatch::default()))
        .unwrap_err();
    assert!(matches!(err, FormError::NoFilingType));
}

#[test]
fn update_with_mismatched_patch_leaves_store_untouched() {
    let mut store = trademark_store();
    let before = store.clone();
    assert!(
        store
            .update_answers(AnswersPatch::single(FilingType::Patent, "inventionTitle", "x").unwrap())
            .is_err()
    );
    assert_eq!(store, before);
}

// =========================================================================
// step + score
// =========================================================================

#[test]
fn step_must_be_a_wizard_page() {
    let mut store = FormStore::default();
    store.set_current_step(4).unwrap();
    assert_eq!(store.current_step(), 4);

    let err = store.set_current_step(5).unwrap_err();
    assert!(matches!(err, FormError::StepOutOfRange { step: 5, steps: 5 }));
    assert_eq!(store.current_step(), 4);
}

#[test]
fn compliance_score_is_bounded() {
    let mut store = FormStore::default();
    store.set_compliance_score(100).unwrap();
    assert_eq!(store.compliance_score(), 100);
    assert_eq!(store.set_compliance_score(101).unwrap_err().error_code(), "E_SCORE_OUT_OF_RANGE");
}

// =========================================================================
// files
// =========================================================================

#[test]
fn files_are_added_and_removed_by_id() {
    let mut store = FormStore::default();
    let logo = UploadedFile::new("logo.png", "image/png", "logo", vec![1, 2, 3]);
    let spec = UploadedFile::new("spec.pdf", "application/pdf", "specification", vec![0; 10]);
    let logo_id = logo.id;

    store.add_file(logo.clone()).unwrap();
    store.add_file(spec).unwrap();
    assert!(matches!(store.add_file(logo).unwrap_err(), FormError::DuplicateFile(id) if id == logo_id));

    let removed = store.remove_file(logo_id).unwrap();
    assert_eq!(removed.size, 3);
    assert_eq!(removed.payload.bytes(), &[1, 2, 3]);
    assert_eq!(store.uploaded_files().len(), 1);
    assert!(store.remove_file(logo_id).is_none());
}

#[test]
fn file_payload_is_not_serialized() {
    let file = UploadedFile::new("logo.png", "image/png", "logo", vec![9; 4]);
    let value = serde_json::to_value(&file).unwrap();
    assert_eq!(value["size"], 4);
    assert_eq!(value["mimeType"], "image/png");
    assert!(value.get("payload").is_none());
    assert_eq!(format!("{:?}", file.payload), "Payload(4 bytes)");
}

// =========================================================================
// suggestion log
// =========================================================================

#[test]
fn suggestion_log_deduplicates_per_key() {
    let mut store = FormStore::default();
    assert!(store.add_suggestion("trademark-Acme", "Check the register"));
    assert!(!store.add_suggestion("trademark-Acme", "Check the register"));
    assert!(store.add_suggestion("trademark-Other", "Check the register"));

    assert_eq!(store.suggestions().get("trademark-Acme"), ["Check the register"]);
    assert_eq!(store.suggestions().len(), 2);
    assert!(store.suggestions().get("missing").is_empty());
}

// =========================================================================
// annotations
// =========================================================================

#[test]
fn trademark_annotations_append() {
    let mut store = trademark_store();
    store.add_verification_task("Check USPTO", at()).unwrap();
    store.add_consideration("Consider a logo", at()).unwrap();
    store.add_consideration("Consider a slogan", at()).unwrap();

    let Some(Answers::Trademark(tm)) = store.answers() else { panic!("expected trademark answers") };
    assert_eq!(tm.verification_tasks.len(), 1);
    assert_eq!(tm.considerations.len(), 2);
    assert_eq!(tm.considerations[1].text, "Consider a slogan");
}

#[test]
fn annotation_for_wrong_filing_type_fails() {
    let mut store = trademark_store();
    assert!(store.add_description_improvement("Add figures", at()).is_err());

    let mut store = FormStore::default();
    store.set_filing_type(Some(FilingType::Patent));
    store.add_description_improvement("Add figures", at()).unwrap();
    assert!(store.add_consideration("nope", at()).is_err());
}

#[test]
fn snapshot_serializes_camel_case_keys() {
    let mut store = trademark_store();
    store.add_suggestion("k", "v");
    let value = serde_json::to_value(&store).unwrap();
    assert_eq!(value["filingType"], "trademark");
    assert_eq!(value["currentStep"], 0);
    assert_eq!(value["answers"]["filingType"], "trademark");
    assert_eq!(value["answers"]["markType"], "standard");
    assert_eq!(value["aiSuggestions"]["k"][0], "v");
}
