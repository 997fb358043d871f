use std::fs;

use formdeck_core::storage::{CURRENT_FORM_KEY, SAVED_FORMS_KEY};
use formdeck_core::{
    FieldPatch, FieldType, FieldValue, FormError, FormStore, JsonFileStorage, PreviewSession,
    RuleKind, SaveRejection, SnapshotStorage, ValidationRule,
};
use tempfile::tempdir;

#[test]
fn test_build_save_reload_round_trip() {
    let dir = tempdir().expect("tempdir should be created");
    let storage = JsonFileStorage::open(dir.path()).expect("open should succeed");
    let mut store = FormStore::hydrate(storage);

    let name_id = store.apply(|state| {
        let _ = state.initialize();
        state
            .add_field(FieldType::Text, None)
            .applied()
            .expect("field should be added")
    });
    store
        .apply(|state| {
            state.update_field(
                &name_id,
                &FieldPatch::new()
                    .label("Name")
                    .required(true)
                    .validation_rules(vec![ValidationRule::new(RuleKind::Required)]),
            )
        })
        .expect("update should succeed");

    let err = store
        .apply(|state| state.save_form(""))
        .expect_err("blank name should be rejected");
    assert!(matches!(
        err,
        FormError::SavePrecondition(SaveRejection::MissingName)
    ));
    assert!(store.current_form().is_some());
    assert!(!dir.path().join("savedForms.json").exists());

    let form_id = store
        .apply(|state| state.save_form("My Form"))
        .expect("save should succeed");
    assert!(store.current_form().is_none());
    assert_eq!(store.saved_forms().len(), 1);

    let on_disk = fs::read_to_string(dir.path().join("savedForms.json"))
        .expect("snapshot should be written");
    assert!(on_disk.contains("\"My Form\""));
    assert!(on_disk.contains("\"validationRules\""));

    let reopened = JsonFileStorage::open(dir.path()).expect("reopen should succeed");
    let reloaded = FormStore::hydrate(reopened);
    let form = reloaded.find_saved(&form_id).expect("form should reload");
    assert_eq!(form.fields[0].label, "Name");
    assert!(form.fields[0].required);
}

#[test]
fn test_malformed_snapshot_on_disk_is_ignored() {
    let dir = tempdir().expect("tempdir should be created");
    fs::write(dir.path().join("savedForms.json"), "[{\"broken\": ")
        .expect("write should succeed");

    let storage = JsonFileStorage::open(dir.path()).expect("open should succeed");
    let mut store = FormStore::hydrate(storage);
    assert!(store.saved_forms().is_empty());

    // the next save overwrites the bad snapshot
    store.apply(|state| {
        let _ = state.initialize();
        let _ = state.add_field(FieldType::Checkbox, None);
        state.save_form("Fresh").expect("save should succeed");
    });
    let raw = store
        .storage()
        .get(SAVED_FORMS_KEY)
        .expect("read should succeed")
        .expect("snapshot should exist");
    let forms: Vec<serde_json::Value> = serde_json::from_str(&raw).expect("valid JSON");
    assert_eq!(forms.len(), 1);
}

#[test]
fn test_loaded_form_previews_with_derived_age() {
    let mut store = FormStore::hydrate(formdeck_core::MemoryStorage::new());
    let (dob, age) = store.apply(|state| {
        let _ = state.initialize();
        let dob = state.add_field(FieldType::Date, None).applied().unwrap();
        let age = state.add_field(FieldType::Number, None).applied().unwrap();
        (dob, age)
    });
    store
        .apply(|state| {
            state.update_field(
                &age,
                &FieldPatch::new()
                    .label("Age")
                    .derived(true)
                    .parent_fields(vec![dob.clone()])
                    .derived_formula(Some("Age from Date of Birth".to_string())),
            )
        })
        .expect("derived update should succeed");
    let form_id = store
        .apply(|state| state.save_form("Person"))
        .expect("save should succeed");

    let _ = store.apply(|state| state.load_form(&form_id));
    let form = store.current_form().expect("form should be loaded");
    let mut session = PreviewSession::new(form);
    let birth = chrono::NaiveDate::from_ymd_opt(1990, 7, 4).unwrap();
    assert!(session.change(&dob, FieldValue::Date(birth)));

    let today = chrono::NaiveDate::from_ymd_opt(2020, 7, 3).unwrap();
    assert_eq!(
        session.display_values_at(today)[&age],
        FieldValue::Number(29.0)
    );
}

#[test]
fn test_current_form_key_is_separate_from_saved_forms() {
    let dir = tempdir().expect("tempdir should be created");
    let mut storage = JsonFileStorage::open(dir.path()).expect("open should succeed");
    storage
        .set(CURRENT_FORM_KEY, "null")
        .expect("write should succeed");

    let store = FormStore::hydrate(storage);
    assert!(store.saved_forms().is_empty());
    assert!(dir.path().join("currentForm.json").exists());
}
