use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;

#[test]
fn template_prints_seeded_json() {
    let output = cargo_bin_cmd!("npa")
        .args(["template", "--date", "2025-08-07"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["number"], "NPA XX-XX/SETOR/2025");
    assert_eq!(json["issue_date"], "2025-08-07");
}

#[test]
fn outline_of_the_template() {
    cargo_bin_cmd!("npa")
        .arg("outline")
        .assert()
        .success()
        .stdout(predicate::str::contains("(8 pages)").and(predicate::str::contains("references")));
}

#[test]
fn template_round_trips_through_outline() {
    let dir = tempfile::tempdir().unwrap();
    let doc = dir.path().join("npa.json");
    cargo_bin_cmd!("npa")
        .args(["template", "--output"])
        .arg(&doc)
        .assert()
        .success();

    cargo_bin_cmd!("npa")
        .args(["outline", "--input"])
        .arg(&doc)
        .assert()
        .success()
        .stdout(predicate::str::contains("annex C"));
}

#[test]
fn export_docx_writes_file() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("npa.docx");
    cargo_bin_cmd!("npa")
        .args(["export", "--format", "docx", "--output"])
        .arg(&out)
        .assert()
        .success();

    let bytes = std::fs::read(&out).unwrap();
    assert!(bytes.starts_with(b"PK"));
}

#[test]
fn unknown_format_is_rejected() {
    cargo_bin_cmd!("npa")
        .args(["export", "--format", "odt"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown export format"));
}

#[test]
fn unreadable_input_fails_without_output() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("npa.pdf");
    cargo_bin_cmd!("npa")
        .args(["export", "--format", "pdf", "--input", "/nonexistent/npa.json", "--output"])
        .arg(&out)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read document"));
    assert!(!out.exists());
}
