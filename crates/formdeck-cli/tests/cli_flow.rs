use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use serde_json::Value;
use tempfile::TempDir;

fn bin() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_formdeck"))
}

fn temp_home() -> TempDir {
    tempfile::Builder::new()
        .prefix("formdeck_cli")
        .tempdir()
        .expect("create temp dir")
}

fn formdeck(home: &Path, args: &[&str]) -> Output {
    Command::new(bin())
        .args(args)
        .env("FORMDECK_DATA_DIR", home.join("data"))
        .env("XDG_CONFIG_HOME", home.join("config"))
        .env("XDG_DATA_HOME", home.join("share"))
        .env("NO_COLOR", "1")
        .env_remove("FORMDECK_CONFIG")
        .env_remove("FORMDECK_LOG")
        .output()
        .expect("run formdeck")
}

fn assert_success(output: &Output, step: &str) {
    assert!(
        output.status.success(),
        "{} failed: stdout={}, stderr={}",
        step,
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr)
    );
}

fn json(home: &Path, args: &[&str]) -> Value {
    let mut full = vec!["--json"];
    full.extend_from_slice(args);
    let output = formdeck(home, &full);
    assert_success(&output, &args.join(" "));
    serde_json::from_slice(&output.stdout).expect("parse json output")
}

fn add_field(home: &Path, field_type: &str) -> String {
    let field = json(home, &["field", "add", field_type]);
    field["id"].as_str().expect("field id").to_string()
}

#[test]
fn test_cli_build_save_list() {
    let home = temp_home();

    let created = json(home.path(), &["new"]);
    assert_eq!(created["created"], true);

    let again = json(home.path(), &["new"]);
    assert_eq!(again["created"], false);
    assert_eq!(again["id"], created["id"]);

    let name_id = add_field(home.path(), "text");
    let updated = json(
        home.path(),
        &["field", "update", &name_id, "--label", "Name", "--required", "true"],
    );
    assert_eq!(updated["label"], "Name");
    assert_eq!(updated["required"], true);
    assert_eq!(updated["validationRules"][0]["type"], "required");

    let missing_name = formdeck(home.path(), &["--format", "plain", "save", "  "]);
    assert!(!missing_name.status.success());
    let stderr = String::from_utf8_lossy(&missing_name.stderr);
    assert!(stderr.contains("error=Please enter a form name"), "stderr={}", stderr);

    let saved = json(home.path(), &["save", "Contact"]);
    assert_eq!(saved["name"], "Contact");
    assert_eq!(saved["id"], created["id"]);

    // Saving empties the editor.
    let show = json(home.path(), &["show"]);
    assert!(show.is_null());

    let list = json(home.path(), &["list"]);
    let forms = list.as_array().expect("list array");
    assert_eq!(forms.len(), 1);
    assert_eq!(forms[0]["name"], "Contact");
    assert_eq!(forms[0]["summary"]["total_fields"], 1);
    assert_eq!(forms[0]["summary"]["required_fields"], 1);
    assert_eq!(forms[0]["summary"]["type_counts"]["text"], 1);
}

#[test]
fn test_cli_save_requires_fields() {
    let home = temp_home();
    assert_success(&formdeck(home.path(), &["new"]), "new");

    let output = formdeck(home.path(), &["--format", "plain", "save", "Empty"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Please add at least one field to the form"), "stderr={}", stderr);
}

#[test]
fn test_cli_field_commands_need_a_form() {
    let home = temp_home();

    let output = formdeck(home.path(), &["--format", "plain", "field", "add", "text"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("error=No form in progress."), "stderr={}", stderr);
    assert!(stderr.contains("hint=Run `formdeck new` to start one."), "stderr={}", stderr);
}

#[test]
fn test_cli_unknown_field_type_is_rejected() {
    let home = temp_home();
    assert_success(&formdeck(home.path(), &["new"]), "new");

    let output = formdeck(home.path(), &["--format", "plain", "field", "add", "color"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("color"), "stderr={}", stderr);
}

#[test]
fn test_cli_add_after_and_move() {
    let home = temp_home();
    assert_success(&formdeck(home.path(), &["new"]), "new");

    let first = add_field(home.path(), "text");
    let last = add_field(home.path(), "number");
    let middle = json(home.path(), &["field", "add", "date", "--after", &first]);
    assert_eq!(middle["order"], 1);

    let form = json(home.path(), &["show"]);
    let ids: Vec<&str> = form["form"]["fields"]
        .as_array()
        .expect("fields")
        .iter()
        .map(|field| field["id"].as_str().expect("id"))
        .collect();
    assert_eq!(ids, vec![first.as_str(), middle["id"].as_str().expect("id"), last.as_str()]);

    assert_success(&formdeck(home.path(), &["field", "move", "2", "0"]), "move");
    let form = json(home.path(), &["show"]);
    assert_eq!(form["form"]["fields"][0]["id"], last.as_str());
    assert_eq!(form["form"]["fields"][0]["order"], 0);
    assert_eq!(form["form"]["fields"][2]["order"], 2);

    let out_of_range = formdeck(home.path(), &["field", "move", "0", "9"]);
    assert!(!out_of_range.status.success());
}

#[test]
fn test_cli_unknown_ids_warn_without_failing() {
    let home = temp_home();
    assert_success(&formdeck(home.path(), &["new"]), "new");
    add_field(home.path(), "text");

    let delete = formdeck(home.path(), &["--format", "plain", "field", "delete", "zzzz"]);
    assert_success(&delete, "delete unknown field");
    assert!(String::from_utf8_lossy(&delete.stderr).contains("warning="));

    let load = formdeck(home.path(), &["--format", "plain", "load", "zzzz"]);
    assert_success(&load, "load unknown form");
    assert!(String::from_utf8_lossy(&load.stderr).contains("warning="));

    let form = json(home.path(), &["show"]);
    assert_eq!(form["form"]["fields"].as_array().expect("fields").len(), 1);
}

#[test]
fn test_cli_load_copies_saved_form() {
    let home = temp_home();
    assert_success(&formdeck(home.path(), &["new"]), "new");
    add_field(home.path(), "checkbox");
    let saved = json(home.path(), &["save", "Consent"]);
    let saved_id = saved["id"].as_str().expect("id").to_string();

    // A unique prefix is enough to name the form.
    assert_success(&formdeck(home.path(), &["load", &saved_id[..8]]), "load");
    let form = json(home.path(), &["show"]);
    assert_eq!(form["form"]["id"], saved_id.as_str());
    assert_eq!(form["form"]["name"], "Consent");

    assert_success(&formdeck(home.path(), &["clear"]), "clear");
    let form = json(home.path(), &["show"]);
    assert!(form.is_null());

    let list = json(home.path(), &["list"]);
    assert_eq!(list.as_array().expect("list").len(), 1);
}

#[test]
fn test_cli_preview_derives_age_and_validates() {
    let home = temp_home();
    assert_success(&formdeck(home.path(), &["new"]), "new");

    let name = add_field(home.path(), "text");
    json(
        home.path(),
        &["field", "update", &name, "--label", "Name", "--required", "true"],
    );
    let dob = add_field(home.path(), "date");
    json(home.path(), &["field", "update", &dob, "--label", "Date of Birth"]);
    let age = add_field(home.path(), "number");
    json(
        home.path(),
        &[
            "field",
            "update",
            &age,
            "--label",
            "Age",
            "--derived",
            "true",
            "--parent",
            &dob,
            "--formula",
            "Age from Date of Birth",
        ],
    );

    let preview = json(
        home.path(),
        &["preview", "--set", "Date of Birth=2000-01-01", "--set", "Name=Ada"],
    );
    assert_eq!(preview["valid"], true);
    let fields = preview["fields"].as_array().expect("fields");
    assert_eq!(fields[0]["value"], "Ada");
    assert_eq!(fields[1]["value"], "2000-01-01");
    assert_eq!(fields[2]["derived"], true);
    let years = fields[2]["value"].as_f64().expect("derived age");
    assert!(years >= 25.0, "age={}", years);
    assert_eq!(preview["summary"]["derived_fields"], 1);

    let failed = formdeck(home.path(), &["--json", "preview", "--submit"]);
    assert!(!failed.status.success());
    let value: Value = serde_json::from_slice(&failed.stdout).expect("parse preview json");
    assert_eq!(value["valid"], false);
    assert_eq!(value["fields"][0]["error"], "This field is required");
    assert!(String::from_utf8_lossy(&failed.stderr).contains("1 field(s) failed validation"));

    let passed = formdeck(
        home.path(),
        &["--format", "plain", "preview", "--set", "Name=Ada", "--submit"],
    );
    assert_success(&passed, "preview submit");
}

#[test]
fn test_cli_remove_saved_form() {
    let home = temp_home();
    assert_success(&formdeck(home.path(), &["new"]), "new");
    add_field(home.path(), "textarea");
    let saved = json(home.path(), &["save", "Feedback"]);
    let saved_id = saved["id"].as_str().expect("id").to_string();

    // stdin is not a terminal here, so confirmation cannot be asked for.
    let refused = formdeck(home.path(), &["--format", "plain", "remove", &saved_id]);
    assert!(!refused.status.success());
    assert!(String::from_utf8_lossy(&refused.stderr).contains("hint=Pass --yes"));

    let removed = json(home.path(), &["remove", &saved_id, "--yes"]);
    assert_eq!(removed["deleted"], true);

    let list = json(home.path(), &["list"]);
    assert!(list.as_array().expect("list").is_empty());
}

#[test]
fn test_cli_plain_list_when_empty() {
    let home = temp_home();
    let output = formdeck(home.path(), &["--format", "plain", "list"]);
    assert_success(&output, "list");
    assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "count=0");
}

#[test]
fn test_cli_completions_bash() {
    let home = temp_home();
    let output = formdeck(home.path(), &["completions", "bash"]);
    assert_success(&output, "completions");
    assert!(String::from_utf8_lossy(&output.stdout).contains("formdeck"));
}
