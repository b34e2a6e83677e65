use std::fs;
use std::path::Path;

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn pgdx() -> Command {
    let mut cmd: Command = cargo_bin_cmd!("pgdx").into();
    cmd.env("NO_COLOR", "1");
    cmd.env_remove("PAGEDEX_NER_URL");
    cmd
}

/// Write a page file and, optionally, its precomputed spans.
fn write_page(root: &Path, rel: &str, text: &str, spans: Option<&str>) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(&path, text).unwrap();
    if let Some(spans) = spans {
        let mut sidecar = path.into_os_string();
        sidecar.push(".ents.json");
        fs::write(sidecar, spans).unwrap();
    }
}

fn read_record(path: &Path) -> serde_json::Value {
    serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
}

// --- Binary startup ---

#[test]
fn binary_runs() {
    pgdx()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("pgdx"));
}

// --- Dates ---

#[test]
fn dates_normalizes_each_argument() {
    pgdx()
        .args(["dates", "Tue, 20 Oct 2020", "October", "See 1/2/20 and 3/4/20"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Tue, 20 Oct 2020\t2020-10-20"))
        .stdout(predicate::str::contains("October\t-"))
        .stdout(predicate::str::contains("See 1/2/20 and 3/4/20\t2020-01-02,2020-03-04"));
}

#[test]
fn dates_cleans_mentions_like_records() {
    pgdx()
        .args(["dates", " ,Oct 2019,", "Oct 20, \n2020"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\t2019-10-01"))
        .stdout(predicate::str::contains("\t2020-10-20"));
}

#[test]
fn dates_requires_input() {
    pgdx().arg("dates").assert().failure();
}

// --- Records ---

#[test]
fn records_from_span_files() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    write_page(
        input.path(),
        "letters/smith.pdf_page2.pdf.txt",
        "Dear \"Jane\",\nMet in Boston on 10/19/99.",
        Some(
            r#"[{"text": "Jane", "label": "PERSON"},
                {"text": "Boston", "label": "GPE"},
                {"text": "Boston", "label": "GPE"},
                {"text": "10/19/99", "label": "DATE"},
                {"text": "October", "label": "DATE"}]"#,
        ),
    );
    write_page(input.path(), "letters/readme.txt", "not a page", None);

    pgdx()
        .arg("records")
        .arg(input.path())
        .arg(output.path())
        .assert()
        .success()
        .stderr(predicate::str::contains("1 pages"));

    let record = read_record(&output.path().join("letters/smith.pdf_page2.pdf.txt.record"));
    assert_eq!(record["origFile"], "smith");
    assert_eq!(record["page"], "2");
    assert_eq!(record["people"], serde_json::json!(["Jane"]));
    assert_eq!(record["places"], serde_json::json!(["Boston"]));
    assert_eq!(record["dates"], serde_json::json!(["1999-10-19"]));
    assert_eq!(record["txt"], "Dear 'Jane',    Met in Boston on 10/19/99.");
    assert!(!output.path().join("letters/readme.txt.record").exists());
}

#[test]
fn records_page_without_entities() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    write_page(input.path(), "blank.pdf_page1.pdf.txt", "", Some("[]"));

    pgdx()
        .arg("records")
        .arg(input.path())
        .arg(output.path())
        .assert()
        .success();

    let record = read_record(&output.path().join("blank.pdf_page1.pdf.txt.record"));
    for key in ["people", "dates", "places", "orgs", "groups"] {
        assert_eq!(record[key], serde_json::json!([]), "{key}");
    }
}

#[test]
fn records_bulk_with_rules() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    write_page(input.path(), "a.pdf_page1.pdf.txt", "Signed 2020-10-23.", None);
    write_page(input.path(), "a.pdf_page2.pdf.txt", "Filed Oct 20, 2020.", None);

    pgdx()
        .arg("records")
        .arg(input.path())
        .arg(output.path())
        .args(["--extractor", "rules", "--format", "bulk", "--index", "archive"])
        .assert()
        .success();

    let bulk = fs::read_to_string(output.path().join("records.ndjson")).unwrap();
    assert_eq!(bulk.lines().count(), 4);
    assert!(bulk.contains(r#""_index":"archive""#));
    assert!(bulk.contains("2020-10-23"));
    assert!(bulk.contains("2020-10-20"));
}

#[test]
fn records_http_without_endpoint_fails() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();

    pgdx()
        .arg("records")
        .arg(input.path())
        .arg(output.path())
        .args(["--extractor", "http"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No NER endpoint configured"));
}

#[test]
fn records_reports_failed_pages() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    write_page(input.path(), "x.pdf_page1.pdf.txt", "text", Some("{broken"));

    pgdx()
        .arg("records")
        .arg(input.path())
        .arg(output.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("1 page(s) failed"));
}

#[test]
fn records_strict_spans_requires_sidecar() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    write_page(input.path(), "lone.pdf_page1.pdf.txt", "no spans", None);

    pgdx()
        .arg("records")
        .arg(input.path())
        .arg(output.path())
        .arg("--strict-spans")
        .assert()
        .failure()
        .stderr(predicate::str::contains("lone.pdf_page1.pdf.txt"))
        .stderr(predicate::str::contains("1 page(s) failed"));
}

#[test]
fn records_date_rules_with_span_files() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    write_page(
        input.path(),
        "memo.pdf_page1.pdf.txt",
        "Approved 2020-10-23 by Ada.",
        Some(r#"[{"text": "Ada", "label": "PERSON"}]"#),
    );

    pgdx()
        .arg("records")
        .arg(input.path())
        .arg(output.path())
        .arg("--date-rules")
        .assert()
        .success();

    let record = read_record(&output.path().join("memo.pdf_page1.pdf.txt.record"));
    assert_eq!(record["people"], serde_json::json!(["Ada"]));
    assert_eq!(record["dates"], serde_json::json!(["2020-10-23"]));
}

#[test]
fn records_missing_input() {
    let output = TempDir::new().unwrap();

    pgdx()
        .args(["records", "/nonexistent/pagedex-input"])
        .arg(output.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("input directory not found"));
}
