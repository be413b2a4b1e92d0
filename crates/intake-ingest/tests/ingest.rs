use std::path::Path;

use serde_json::json;
use tempfile::TempDir;

use intake_ingest::{IngestError, load_documents, load_path};

fn write(dir: &Path, name: &str, contents: &str) -> std::path::PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, contents).unwrap();
    path
}

#[test]
fn json_array_yields_one_document_per_element() {
    let dir = TempDir::new().unwrap();
    let path = write(
        dir.path(),
        "providers.json",
        r#"[{"provider_name": "Harbor Clinic"}, {"provider_name": "Bayside Dental"}, 42]"#,
    );

    let documents = load_documents(&path).unwrap();
    assert_eq!(documents.len(), 3);
    assert_eq!(documents[1].source.record, 2);
    assert_eq!(documents[1].value["provider_name"], "Bayside Dental");
    assert_eq!(documents[2].value, json!(42));
}

#[test]
fn json_object_is_a_single_document() {
    let dir = TempDir::new().unwrap();
    let path = write(dir.path(), "one.json", r#"{"provider_name": "Harbor Clinic"}"#);

    let documents = load_documents(&path).unwrap();
    assert_eq!(documents.len(), 1);
    assert_eq!(documents[0].source.record, 1);
}

#[test]
fn json_scalar_root_is_rejected() {
    let dir = TempDir::new().unwrap();
    let path = write(dir.path(), "bad.json", "\"not a provider\"");
    assert!(matches!(
        load_documents(&path),
        Err(IngestError::UnexpectedShape { .. })
    ));
}

#[test]
fn json_lines_use_line_numbers() {
    let dir = TempDir::new().unwrap();
    let path = write(
        dir.path(),
        "batch.ndjson",
        "{\"provider_name\": \"A\"}\n\n{\"provider_name\": \"B\"}\n",
    );

    let documents = load_documents(&path).unwrap();
    assert_eq!(documents.len(), 2);
    assert_eq!(documents[1].source.record, 3);
    assert!(documents[1].source.source.ends_with("batch.ndjson"));
}

#[test]
fn malformed_json_line_reports_its_line() {
    let dir = TempDir::new().unwrap();
    let path = write(dir.path(), "batch.jsonl", "{\"a\": 1}\n{broken\n");
    match load_documents(&path) {
        Err(IngestError::JsonLineParse { line, .. }) => assert_eq!(line, 2),
        other => panic!("unexpected result: {other:?}"),
    }
}

#[test]
fn csv_rows_become_nested_documents() {
    let dir = TempDir::new().unwrap();
    let path = write(
        dir.path(),
        "providers.csv",
        "provider_name,provider_type,address_street1,address.zip_code,contact_info.phone_number,services,accreditations.0.organization,accreditations.0.issue_date\n\
         Harbor Clinic,clinic,40 Harbor Way,04101,207-555-0142,primary_care|pediatrics,State Board,2021-03-01\n\
         Bayside Dental,practice,9 Shore Road,04102,,other,,\n",
    );

    let documents = load_documents(&path).unwrap();
    assert_eq!(documents.len(), 2);
    assert_eq!(
        documents[0].value,
        json!({
            "provider_name": "Harbor Clinic",
            "provider_type": "clinic",
            "address": { "street1": "40 Harbor Way", "zip_code": "04101" },
            "contact_info": { "phone_number": "207-555-0142" },
            "services": ["primary_care", "pediatrics"],
            "accreditations": [{ "organization": "State Board", "issue_date": "2021-03-01" }]
        })
    );
    assert!(documents[1].value.get("contact_info").is_none());
    assert_eq!(documents[1].value["accreditations"], json!([]));
    assert_eq!(documents[1].source.record, 2);
}

#[test]
fn unsupported_extension_is_an_error() {
    let dir = TempDir::new().unwrap();
    let path = write(dir.path(), "providers.xlsx", "");
    assert!(matches!(
        load_documents(&path),
        Err(IngestError::UnsupportedFormat { .. })
    ));
}

#[test]
fn missing_file_is_reported() {
    let dir = TempDir::new().unwrap();
    assert!(matches!(
        load_documents(&dir.path().join("absent.json")),
        Err(IngestError::FileNotFound { .. })
    ));
}

#[test]
fn directory_loads_supported_files_in_name_order() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "b.jsonl", "{\"provider_name\": \"B\"}\n");
    write(dir.path(), "a.json", "[{\"provider_name\": \"A\"}]");
    write(dir.path(), "notes.txt", "ignored");

    let documents = load_path(dir.path()).unwrap();
    let names: Vec<_> = documents
        .iter()
        .map(|d| d.value["provider_name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["A", "B"]);
}
