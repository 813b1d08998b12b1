use predicates::prelude::*;
use std::process::Command;
use tempfile::TempDir;

fn cmd() -> assert_cmd::Command {
    assert_cmd::Command::from(Command::new(env!("CARGO_BIN_EXE_rfdoc")))
}

fn fixture_path(name: &str) -> String {
    format!("{}/tests/fixtures/{}", env!("CARGO_MANIFEST_DIR"), name)
}

fn generate(dir: &TempDir, out: &str, args: &[&str]) -> String {
    let out_path = dir.path().join(out);
    cmd()
        .args(args)
        .args(["-o", out_path.to_str().unwrap()])
        .assert()
        .success();
    std::fs::read_to_string(out_path).unwrap()
}

// -- markdown --

#[test]
fn markdown_is_the_default_format() {
    let dir = TempDir::new().unwrap();
    let out_path = dir.path().join("excel.md");

    cmd()
        .arg(fixture_path("ExcelLibrary.py"))
        .args(["-o", out_path.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Successfully parsed 4 keywords from ExcelLibrary",
        ))
        .stdout(predicate::str::contains("Documentation generated:"));

    let output = std::fs::read_to_string(out_path).unwrap();
    assert!(output.starts_with("# ExcelLibrary\n"));
    assert!(output.contains("**Version:** 1.4.0"));
    assert!(output.contains("**Scope:** GLOBAL"));
    assert!(output.contains("- [Open Workbook](#open-workbook)"));
    assert!(output.contains("### Read Cell Value"));
    assert!(output.contains("### Paint Cell"));
    assert!(output.contains("* **read_only** (`bool`) = `False`"));
    assert!(output.contains("**Returns:** `Optional[Union[str, int]]`"));
    assert!(output.contains("| RED | `\"red\"` |"));
    assert!(output.contains("* **rows** (`List[Dict[str, int]]`), required"));
    assert!(output.contains("* ***extra** (`Any`)"));
    assert!(output.contains("* ****options** (`Any`)"));
    assert!(!output.contains("Internal"));
}

#[test]
fn module_library_uses_file_stem() {
    let dir = TempDir::new().unwrap();
    let output = generate(&dir, "out.md", &[&fixture_path("string_utils.py"), "-f", "md"]);
    assert!(output.starts_with("# string_utils\n"));
    assert!(output.contains("**Scope:** SUITE"));
    assert!(output.contains("**Version:** Unknown"));
    assert!(output.contains("### Reverse Text"));
    assert!(output.contains("### Count Words"));
    assert!(!output.contains("### Helper"));
}

#[test]
fn zero_keywords_reports_zero() {
    let dir = TempDir::new().unwrap();
    let out_path = dir.path().join("none.md");
    cmd()
        .arg(fixture_path("NoKeywords.py"))
        .args(["-o", out_path.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("Successfully parsed 0 keywords"));

    let output = std::fs::read_to_string(out_path).unwrap();
    assert!(output.contains("**Keywords:** 0"));
}

// -- html --

#[test]
fn html_output_with_default_template() {
    let dir = TempDir::new().unwrap();
    let output = generate(&dir, "excel.html", &[&fixture_path("ExcelLibrary.py"), "-f", "html"]);

    assert!(output.contains("<title>ExcelLibrary 1.4.0</title>"));
    assert!(output.contains("Keywords (4)"));
    assert!(output.contains("<div class=\"keyword-container\" id=\"open-workbook\">"));
    assert!(output.contains("<table class=\"enum-table\">"));
    assert!(output.contains("<table class=\"doc-table\">"));
    assert!(output.contains("<span class=\"robot-keyword\">Open Workbook</span>"));
    assert!(output.contains("<span class=\"robot-comment\"># open it</span>"));
    assert!(!output.contains("github-button"));
    assert!(!output.contains("{{"));
}

#[test]
fn config_adds_github_button_and_metadata() {
    let dir = TempDir::new().unwrap();
    let output = generate(
        &dir,
        "excel.html",
        &[
            &fixture_path("ExcelLibrary.py"),
            "-f",
            "html",
            "-c",
            &fixture_path("config.json"),
        ],
    );

    assert!(output.contains("href=\"https://github.com/example/excel-library\""));
    assert!(output.contains("href=\"mailto:support@example.com\""));
    assert!(output.contains("<strong>Author:</strong> Excel Team"));
    assert!(output.contains("<strong>License:</strong> Apache-2.0"));
}

#[test]
fn missing_config_falls_back_to_defaults() {
    let dir = TempDir::new().unwrap();
    let output = generate(
        &dir,
        "excel.html",
        &[
            &fixture_path("ExcelLibrary.py"),
            "-f",
            "html",
            "-c",
            &fixture_path("does-not-exist.json"),
        ],
    );
    assert!(!output.contains("github-button"));
}

#[test]
fn custom_template_keeps_unknown_placeholders() {
    let dir = TempDir::new().unwrap();
    let output = generate(
        &dir,
        "excel.html",
        &[
            &fixture_path("ExcelLibrary.py"),
            "-f",
            "html",
            "-t",
            &fixture_path("template.html"),
        ],
    );
    assert!(output.starts_with("<html><body><h1>ExcelLibrary</h1><p>4 keywords</p>{{custom_marker}}"));
    assert!(output.contains("keyword-container"));
}

#[test]
fn template_without_keywords_placeholder_fails() {
    let dir = TempDir::new().unwrap();
    let out_path = dir.path().join("excel.html");
    cmd()
        .arg(fixture_path("ExcelLibrary.py"))
        .args(["-f", "html", "-t", &fixture_path("no_keywords_placeholder.html")])
        .args(["-o", out_path.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("{{keywords}}"));
    assert!(!out_path.exists());
}

// -- errors --

#[test]
fn unknown_format_fails() {
    cmd()
        .arg(fixture_path("ExcelLibrary.py"))
        .args(["-f", "json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown format: json"));
}

#[test]
fn syntax_error_fails() {
    let dir = TempDir::new().unwrap();
    cmd()
        .arg(fixture_path("broken.py"))
        .args(["-o", dir.path().join("out.md").to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("syntax error at line 5"));
}

#[test]
fn non_python_input_is_rejected() {
    cmd()
        .arg(fixture_path("config.json"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("unsupported file type"));
}

#[test]
fn missing_input_fails() {
    cmd()
        .arg(fixture_path("missing.py"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to read"));
}
