use rule_pipeline::ingestion::{LoadFormat, LoadOptions, load_collection};
use rule_pipeline::pipeline::{DataProcessor, ProcessRequest};
use rule_pipeline::types::{ConditionSpec, Value};
use serde_json::json;

fn users(records: &[rule_pipeline::types::Record]) -> Vec<&str> {
    records
        .iter()
        .filter_map(|r| r.get("user").and_then(Value::as_str))
        .collect()
}

#[test]
fn csv_and_json_fixtures_load_the_same_users() {
    let from_csv = load_collection("tests/fixtures/users.csv", &LoadOptions::default()).unwrap();
    let from_json = load_collection("tests/fixtures/users.json", &LoadOptions::default()).unwrap();
    assert_eq!(from_csv[..3], from_json[..]);
}

#[test]
fn explicit_format_overrides_extension() {
    let opts = LoadOptions {
        format: Some(LoadFormat::Json),
    };
    let data = load_collection("tests/fixtures/users.ndjson", &opts).unwrap();
    assert_eq!(data.len(), 3);
}

#[test]
fn missing_file_is_io_error() {
    let err = load_collection("tests/fixtures/does_not_exist.json", &LoadOptions::default())
        .unwrap_err();
    assert!(err.to_string().starts_with("io error"));
}

#[test]
fn loaded_csv_feeds_the_pipeline() {
    let data = load_collection("tests/fixtures/users.csv", &LoadOptions::default()).unwrap();
    let request = ProcessRequest::new(data).with_condition(
        ConditionSpec::new()
            .with("exclude", json!([{"disabled": true}]))
            .with("sort_by", json!(["rating"])),
    );

    let response = DataProcessor::new().process(&request);
    // The user with an empty rating sorts last.
    assert_eq!(
        users(&response.result),
        vec!["greg@mail.com", "mike@mail.com", "ann@mail.com"]
    );
}
