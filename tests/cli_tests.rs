//! CLI and basic command tests

mod common;

use common::{freeform_housing, setup_workspace, stepped_shaft, turnplan, write_digest, write_digest_json};
use predicates::prelude::*;
use std::fs;

// ============================================================================
// CLI Basic Tests
// ============================================================================

#[test]
fn test_help_displays() {
    let tmp = setup_workspace();
    turnplan(tmp.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("turnability"));
}

#[test]
fn test_version_displays() {
    let tmp = setup_workspace();
    turnplan(tmp.path())
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("turnplan"));
}

#[test]
fn test_unknown_command_fails() {
    let tmp = setup_workspace();
    turnplan(tmp.path())
        .arg("unknown-command")
        .assert()
        .failure()
        .stderr(predicate::str::contains("error"));
}

// ============================================================================
// Plan Command Tests
// ============================================================================

#[test]
fn test_plan_text_report() {
    let tmp = setup_workspace();
    let digest = write_digest(tmp.path(), "shaft", &stepped_shaft(1));

    turnplan(tmp.path())
        .arg("plan")
        .arg(&digest)
        .assert()
        .success()
        .stdout(predicate::str::contains("TURNING PROCESS PLAN"))
        .stdout(predicate::str::contains("FULL - strictly turnable"))
        .stdout(predicate::str::contains("Face & Center"))
        .stdout(predicate::str::contains("Threading"))
        .stdout(predicate::str::contains("M30 x 3.5"))
        .stdout(predicate::str::contains("Parting Off"))
        .stdout(predicate::str::contains("TOTAL ESTIMATED MACHINING TIME"))
        .stdout(predicate::str::contains("SETUP NOTES"))
        .stdout(predicate::str::contains("Ensure adequate clearance"));
}

#[test]
fn test_plan_json_output() {
    let tmp = setup_workspace();
    let digest = write_digest(tmp.path(), "shaft", &stepped_shaft(0));

    let output = turnplan(tmp.path())
        .args(["plan", "-f", "json", "--material", "Mild Steel (AISI 1018/1020)"])
        .arg(&digest)
        .output()
        .unwrap();
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["scope"], "full");
    assert_eq!(value["material"]["name"], "Mild Steel (AISI 1018/1020)");
    assert_eq!(value["operations"][0]["kind"], "facing");
    assert_eq!(value["fingerprint"].as_str().unwrap().len(), 64);
    assert!(value["validation"]["messages"].as_array().unwrap().len() >= 6);
}

#[test]
fn test_plan_writes_yaml_file_by_extension() {
    let tmp = setup_workspace();
    let digest = write_digest(tmp.path(), "shaft", &stepped_shaft(1));
    let out = tmp.path().join("shaft_plan.yaml");

    turnplan(tmp.path())
        .args(["plan", "--tolerance", "0.03"])
        .arg(&digest)
        .arg("-o")
        .arg(&out)
        .assert()
        .success()
        .stderr(predicate::str::contains("written to"));

    let content = fs::read_to_string(&out).unwrap();
    let value: serde_yml::Value = serde_yml::from_str(&content).unwrap();
    assert_eq!(value["scope"].as_str(), Some("full"));
    assert!(content.contains("fine-finish"));
}

#[test]
fn test_plan_json_digest_input() {
    let tmp = setup_workspace();
    let digest = write_digest_json(tmp.path(), "shaft", &stepped_shaft(1));

    turnplan(tmp.path())
        .args(["plan", "-f", "yaml"])
        .arg(&digest)
        .assert()
        .success()
        .stdout(predicate::str::contains("scope: full"));
}

#[test]
fn test_plan_not_machinable_part() {
    let tmp = setup_workspace();
    let digest = write_digest(tmp.path(), "housing", &freeform_housing());

    turnplan(tmp.path())
        .arg("plan")
        .arg(&digest)
        .assert()
        .success()
        .stdout(predicate::str::contains("NOT SUITABLE FOR TURNING"))
        .stdout(predicate::str::contains("3D printing"))
        .stdout(predicate::str::contains("TURNING LIMITATIONS"))
        .stdout(predicate::str::contains("SETUP NOTES").not());
}

#[test]
fn test_plan_unknown_material_falls_back() {
    let tmp = setup_workspace();
    let digest = write_digest(tmp.path(), "shaft", &stepped_shaft(1));

    turnplan(tmp.path())
        .args(["plan", "--material", "Unobtainium"])
        .arg(&digest)
        .assert()
        .success()
        .stdout(predicate::str::contains("Unknown material 'Unobtainium'"))
        .stdout(predicate::str::contains("Aluminum 6061-T6"));
}

#[test]
fn test_plan_config_overrides_default_material() {
    let tmp = setup_workspace();
    let digest = write_digest(tmp.path(), "shaft", &stepped_shaft(1));
    let config = tmp.path().join("shop.yaml");
    fs::write(
        &config,
        "defaults:\n  material: titanium ti-6al-4v\n  machine: Toolroom CNC lathe (TL-1 class)\n",
    )
    .unwrap();

    let output = turnplan(tmp.path())
        .args(["plan", "-f", "json", "--config"])
        .arg(&config)
        .arg(&digest)
        .output()
        .unwrap();
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["material"]["name"], "Titanium Ti-6Al-4V");
    assert_eq!(value["machine"]["max_rpm"], 1800);
}

#[test]
fn test_plan_config_from_env() {
    let tmp = setup_workspace();
    let digest = write_digest(tmp.path(), "shaft", &stepped_shaft(1));
    let config = tmp.path().join("strict.yaml");
    fs::write(&config, "gate:\n  strict_min_score: 100\n  base_score: 0\n").unwrap();

    turnplan(tmp.path())
        .env("TURNPLAN_CONFIG", &config)
        .args(["classify", "-f", "json"])
        .arg(&digest)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"scope\": \"partial\""));
}

#[test]
fn test_classify_json_reports_effective_gate() {
    let tmp = setup_workspace();
    let digest = write_digest(tmp.path(), "shaft", &stepped_shaft(1));
    let config = tmp.path().join("gate.yaml");
    fs::write(&config, "gate:\n  strict_min_score: 80\n").unwrap();

    let output = turnplan(tmp.path())
        .args(["classify", "-f", "json", "--config"])
        .arg(&config)
        .arg(&digest)
        .output()
        .unwrap();
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["gate"]["strict_min_score"], 80);
    assert_eq!(value["gate"]["partial_min_score"], 40);
}

#[cfg(unix)]
#[test]
fn test_plan_with_external_advisor() {
    let tmp = setup_workspace();
    let digest = write_digest(tmp.path(), "shaft", &stepped_shaft(1));

    turnplan(tmp.path())
        .args(["plan", "--advisor", "cat"])
        .arg(&digest)
        .assert()
        .success()
        .stdout(predicate::str::contains("OPTIMIZATION ADVICE"))
        .stdout(predicate::str::contains("Review this turning process plan"));
}

#[cfg(unix)]
#[test]
fn test_plan_with_hung_advisor_times_out() {
    let tmp = setup_workspace();
    let digest = write_digest(tmp.path(), "shaft", &stepped_shaft(1));

    turnplan(tmp.path())
        .args(["plan", "--advisor", "sleep 10", "--advisor-timeout", "1"])
        .arg(&digest)
        .timeout(std::time::Duration::from_secs(8))
        .assert()
        .success()
        .stdout(predicate::str::contains("timed out after 1s"))
        .stdout(predicate::str::contains("End of Process Plan"));
}

// ============================================================================
// Classify Command Tests
// ============================================================================

#[test]
fn test_classify_text() {
    let tmp = setup_workspace();
    let digest = write_digest(tmp.path(), "shaft", &stepped_shaft(1));

    turnplan(tmp.path())
        .arg("classify")
        .arg(&digest)
        .assert()
        .success()
        .stdout(predicate::str::contains("AXIS FIT"))
        .stdout(predicate::str::contains("[pass] axisymmetric"))
        .stdout(predicate::str::contains("Threading: detected"));
}

#[test]
fn test_classify_json_has_no_operations() {
    let tmp = setup_workspace();
    let digest = write_digest(tmp.path(), "housing", &freeform_housing());

    let output = turnplan(tmp.path())
        .args(["classify", "-f", "json"])
        .arg(&digest)
        .output()
        .unwrap();
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["scope"], "none");
    assert!(value.get("operations").is_none());
    assert_eq!(value["assessment"]["checks"]["limited_complexity"], false);
}

// ============================================================================
// Batch, Profiles and Completions Tests
// ============================================================================

#[test]
fn test_batch_summary_and_csv() {
    let tmp = setup_workspace();
    let parts = tmp.path().join("parts");
    fs::create_dir_all(parts.join("nested")).unwrap();
    write_digest(&parts, "shaft", &stepped_shaft(1));
    write_digest_json(&parts.join("nested"), "housing", &freeform_housing());
    fs::write(parts.join("notes.yaml"), "not a digest").unwrap();
    let csv_path = tmp.path().join("summary.csv");

    turnplan(tmp.path())
        .arg("batch")
        .arg(&parts)
        .arg("--csv")
        .arg(&csv_path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Planning 2 digest file(s)"))
        .stdout(predicate::str::contains("stepped_shaft"))
        .stdout(predicate::str::contains("freeform_housing"))
        .stdout(predicate::str::contains("Summary exported"));

    let csv = fs::read_to_string(&csv_path).unwrap();
    let mut lines = csv.lines();
    assert!(lines.next().unwrap().starts_with("part,scope,score"));
    assert_eq!(lines.count(), 2);
}

#[test]
fn test_batch_reports_broken_digest() {
    let tmp = setup_workspace();
    write_digest(tmp.path(), "shaft", &stepped_shaft(1));
    fs::write(tmp.path().join("broken.digest.yaml"), "surface_counts: [1, 2\n").unwrap();

    turnplan(tmp.path())
        .arg("batch")
        .arg(tmp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("error"))
        .stdout(predicate::str::contains("1 full"));
}

#[test]
fn test_batch_rejects_missing_directory() {
    let tmp = setup_workspace();
    turnplan(tmp.path())
        .args(["batch", "does-not-exist"])
        .current_dir(tmp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Not a directory"));
}

#[test]
fn test_profiles_lists_builtins() {
    let tmp = setup_workspace();
    turnplan(tmp.path())
        .arg("profiles")
        .assert()
        .success()
        .stdout(predicate::str::contains("Aluminum 6061-T6"))
        .stdout(predicate::str::contains("Stainless Steel 304"))
        .stdout(predicate::str::contains("2-axis CNC turning center (ST-20 class)"));
}

#[test]
fn test_profiles_include_config_extras() {
    let tmp = setup_workspace();
    let config = tmp.path().join("extra.yaml");
    fs::write(
        &config,
        "materials:\n  - name: Delrin\n    speed_factor: 2.5\n    specific_power: 0.008\n",
    )
    .unwrap();

    turnplan(tmp.path())
        .args(["profiles", "-f", "yaml", "--config"])
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::contains("Delrin"));
}

#[test]
fn test_completions_bash() {
    let tmp = setup_workspace();
    turnplan(tmp.path())
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("turnplan"));
}
