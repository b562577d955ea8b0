use rule_pipeline::pipeline::{DataProcessor, ProcessRequest, process};
use rule_pipeline::types::{Collection, ConditionSpec, Record, Value};
use serde_json::json;

fn people() -> Collection {
    vec![
        Record::from([("name", "John"), ("email", "b@x")]),
        Record::from([("name", "John"), ("email", "a@x")]),
        Record::from([("name", "Jane"), ("email", "c@x")]),
    ]
}

fn user(u: &str, r: i64, d: bool) -> Record {
    Record::new().with("u", u).with("r", r).with("d", d)
}

fn users() -> Collection {
    vec![user("a", 20, false), user("b", 14, false), user("c", 25, true)]
}

#[test]
fn include_then_sort_by_email() {
    let request = ProcessRequest::new(people()).with_condition(
        ConditionSpec::new()
            .with("include", json!([{"name": "John"}]))
            .with("sort_by", json!(["email"])),
    );

    assert_eq!(
        process(&request).result,
        vec![
            Record::from([("name", "John"), ("email", "a@x")]),
            Record::from([("name", "John"), ("email", "b@x")]),
        ]
    );
}

#[test]
fn exclude_then_sort_by_rating() {
    let request = ProcessRequest::new(users()).with_condition(
        ConditionSpec::new()
            .with("exclude", json!([{"d": true}]))
            .with("sort_by", json!(["r"])),
    );

    let data = users();
    assert_eq!(process(&request).result, vec![data[1].clone(), data[0].clone()]);
}

#[test]
fn empty_condition_returns_equal_copy() {
    let request = ProcessRequest::new(people()).with_condition(ConditionSpec::new());
    let response = process(&request);

    let data = request.data.as_ref().unwrap();
    assert_eq!(&response.result, data);
    assert_ne!(response.result.as_ptr(), data.as_ptr());
}

#[test]
fn unknown_rule_is_skipped() {
    let request = ProcessRequest::new(people())
        .with_condition(ConditionSpec::new().with("foo", json!([{"x": 1}])));
    assert_eq!(process(&request).result, people());
}

#[test]
fn absent_condition_returns_copy() {
    let request = ProcessRequest::new(people());
    assert_eq!(process(&request).result, people());
}

#[test]
fn non_collection_data_yields_empty_result() {
    let processor = DataProcessor::new();
    assert!(processor.process(&ProcessRequest::default()).result.is_empty());

    let response = processor.process_json(&json!({
        "data": "not rows",
        "condition": {"sort_by": ["a"]}
    }));
    assert!(response.result.is_empty());
}

#[test]
fn process_does_not_mutate_request() {
    let request = ProcessRequest::new(users()).with_condition(
        ConditionSpec::new()
            .with("sort_by", json!(["r"]))
            .with("exclude", json!([{"u": "a"}])),
    );
    let before = request.clone();
    let _ = process(&request);
    assert_eq!(request, before);
}

#[test]
fn include_and_exclude_disagree_on_multi_clause_groups() {
    let group = json!([{"u": "a"}, {"d": false}]);

    let included = process(
        &ProcessRequest::new(users())
            .with_condition(ConditionSpec::new().with("include", group.clone())),
    );
    let excluded = process(
        &ProcessRequest::new(users()).with_condition(ConditionSpec::new().with("exclude", group)),
    );

    // Include needs both clauses: only "a".
    assert_eq!(included.result, vec![users()[0].clone()]);
    // Exclude drops anything matching either clause: only "c" survives.
    assert_eq!(excluded.result, vec![users()[2].clone()]);
}

#[test]
fn missing_sort_key_sorts_last_regardless_of_other_keys() {
    let data = vec![
        Record::new().with("id", 1).with("b", 1),
        Record::new().with("id", 2).with("a", 9).with("b", 2),
        Record::new().with("id", 3).with("a", 1).with("b", 3),
    ];
    let request = ProcessRequest::new(data)
        .with_condition(ConditionSpec::new().with("sort_by", json!(["a", "b"])));

    let ids: Vec<Value> = process(&request)
        .result
        .iter()
        .filter_map(|r| r.get("id").cloned())
        .collect();
    assert_eq!(ids, vec![Value::from(3), Value::from(2), Value::from(1)]);
}

#[test]
fn repeated_rule_keys_keep_first_position() {
    let mut condition = ConditionSpec::new()
        .with("sort_by", json!(["r"]))
        .with("exclude", json!([{"d": true}]));
    // Overwrite the sort parameter; it still runs first.
    condition.set("sort_by", json!(["u"]));

    let response = process(&ProcessRequest::new(users()).with_condition(condition));
    let names: Vec<&str> = response
        .result
        .iter()
        .filter_map(|r| r.get("u").and_then(Value::as_str))
        .collect();
    assert_eq!(names, vec!["a", "b"]);
}

#[test]
fn json_round_trip_matches_typed_path() {
    let processor = DataProcessor::new();
    let response = processor
        .process_json_str(
            r#"{"data":[{"u":"a","r":20,"d":false},{"u":"b","r":14,"d":false},{"u":"c","r":25,"d":true}],
                "condition":{"exclude":[{"d":true}],"sort_by":["r"]}}"#,
        )
        .unwrap();
    assert_eq!(
        response.to_json(),
        json!({"result": [{"u": "b", "r": 14, "d": false}, {"u": "a", "r": 20, "d": false}]})
    );
}

#[test]
fn output_records_keep_the_callers_field_order() {
    let response = DataProcessor::new()
        .process_json_str(
            r#"{"data":[{"user":"b","rating":14,"disabled":false},{"user":"a","rating":20,"disabled":false}],
                "condition":{"sort_by":["rating"]}}"#,
        )
        .unwrap();
    let text = serde_json::to_string(&response).unwrap();
    assert_eq!(
        text,
        r#"{"result":[{"user":"b","rating":14,"disabled":false},{"user":"a","rating":20,"disabled":false}]}"#
    );
}

#[test]
fn nested_values_make_the_request_data_not_a_collection() {
    let response = DataProcessor::new().process_json(&json!({
        "data": [{"u": "a"}, {"u": "b", "tags": ["x"]}],
        "condition": {"sort_by": ["u"]}
    }));
    assert!(response.result.is_empty());
}
