use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

/// Flow (exclusive: Laminar, Turbulent) and Thermal, with one target.
fn write_config(dir: &Path, top_level_exclusive: bool) -> PathBuf {
    let yaml = format!(
        r#"version: "1.0"
top_level_exclusive: {top_level_exclusive}
analyses:
  - name: Flow
    exclusive: true
    categories: [fluid]
  - name: Laminar
    parent: Flow
  - name: Turbulent
    label: Turbulent Flow
    parent: Flow
    categories: [rans]
  - name: Thermal
    categories: [heat]
definitions:
  - type: SimType
    label: Kind
"#
    );
    let path = dir.join("analyses.yaml");
    fs::write(&path, yaml).expect("failed to write config");
    path
}

fn run(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_analyses"))
        .args(args)
        .output()
        .expect("failed to run analyses")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

// ---------------------------------------------------------------------------
// build
// ---------------------------------------------------------------------------

#[test]
fn build_prints_configured_definitions_as_json() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(dir.path(), false);

    let output = run(&["build", "--config", config.to_str().unwrap()]);
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    let def = &json["definitions"][0];
    assert_eq!(def["type"], "SimType");
    assert_eq!(def["items"][0]["name"], "Flow");
    assert_eq!(def["items"][0]["kind"], "string");
    assert_eq!(
        def["items"][0]["discrete_values"],
        serde_json::json!(["Laminar", "Turbulent"])
    );
    assert_eq!(def["items"][1]["name"], "Thermal");
    assert_eq!(def["items"][1]["kind"], "void");
}

#[test]
fn build_explicit_type_writes_yaml_file() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(dir.path(), true);
    let out = dir.path().join("out").join("resource.yaml");

    let output = run(&[
        "build",
        "--config",
        config.to_str().unwrap(),
        "--type",
        "Other",
        "--label",
        "Choice",
        "--format",
        "yaml",
        "--output",
        out.to_str().unwrap(),
    ]);
    assert!(output.status.success());

    let raw = fs::read_to_string(&out).unwrap();
    let yaml: serde_yaml::Value = serde_yaml::from_str(&raw).unwrap();
    let def = &yaml["definitions"][0];
    assert_eq!(def["type"].as_str(), Some("Other"));
    assert_eq!(def["items"][0]["name"].as_str(), Some("Choice"));
}

#[test]
fn build_fails_for_missing_config() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("missing.yaml");

    let output = run(&["build", "--config", missing.to_str().unwrap()]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("error:"));
}

// ---------------------------------------------------------------------------
// validate / tree / categories
// ---------------------------------------------------------------------------

#[test]
fn validate_reports_counts() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(dir.path(), false);

    let output = run(&["validate", "--config", config.to_str().unwrap()]);
    assert!(output.status.success());
    assert!(stdout(&output).contains("4 analysis(es) and 1 definition(s)"));
}

#[test]
fn tree_shows_nesting_and_inherited_categories() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(dir.path(), false);

    let output = run(&["tree", "--config", config.to_str().unwrap()]);
    assert!(output.status.success());
    let text = stdout(&output);
    assert!(text.contains("Flow [exclusive] {fluid}"));
    assert!(text.contains("  Turbulent \"Turbulent Flow\" {fluid, rans}"));
    assert!(text.contains("Thermal {heat}"));
}

#[test]
fn categories_for_valid_selection() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(dir.path(), false);

    let output = run(&[
        "categories",
        "--config",
        config.to_str().unwrap(),
        "--select",
        "Flow,Turbulent,Thermal",
    ]);
    assert!(output.status.success());
    let lines: Vec<String> = stdout(&output).lines().map(String::from).collect();
    assert_eq!(lines, ["fluid", "heat", "rans"]);
}

#[test]
fn categories_rejects_exclusive_conflict() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(dir.path(), true);

    let output = run(&[
        "categories",
        "--config",
        config.to_str().unwrap(),
        "--select",
        "Flow,Thermal",
    ]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("exclusive"));
}
