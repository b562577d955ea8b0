//! Request/response types for [`super::DataProcessor::process`].

use serde::{Deserialize, Serialize};

use crate::types::{Collection, ConditionSpec, Record};

/// Input to a pipeline run: `{ data, condition? }`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProcessRequest {
    /// Input records. `None` means the caller supplied something that is not a collection of
    /// records; processing it yields an empty result.
    pub data: Option<Collection>,
    /// Rules to apply, in order. `None` returns a copy of `data`.
    pub condition: Option<ConditionSpec>,
}

impl ProcessRequest {
    /// A request over `data` with no condition.
    pub fn new(data: Collection) -> Self {
        Self {
            data: Some(data),
            condition: None,
        }
    }

    /// Builder-style setter for [`Self::condition`].
    pub fn with_condition(mut self, condition: ConditionSpec) -> Self {
        self.condition = Some(condition);
        self
    }

    /// Decode a request from its JSON form.
    ///
    /// - `data` must be an array of flat objects (scalar values only). Anything else, including
    ///   a missing `data`, decodes as "not a collection".
    /// - Records hold scalars only. A single record with a nested array or object makes the whole
    ///   `data` "not a collection"; no rows are processed, so the run yields an empty result.
    /// - `condition` missing or `null` decodes as no condition. A non-object condition names no
    ///   rules.
    /// - A request that is not a JSON object has neither.
    pub fn from_json(v: &serde_json::Value) -> Self {
        let Some(obj) = v.as_object() else {
            return Self::default();
        };

        let data = obj.get("data").and_then(|d| {
            d.as_array()?
                .iter()
                .map(Record::from_json)
                .collect::<Option<Collection>>()
        });

        let condition = match obj.get("condition") {
            None | Some(serde_json::Value::Null) => None,
            Some(c) => Some(ConditionSpec::from_json(c)),
        };

        Self { data, condition }
    }

    /// Parse and decode a request from JSON text.
    pub fn from_json_str(input: &str) -> serde_json::Result<Self> {
        let v: serde_json::Value = serde_json::from_str(input)?;
        Ok(Self::from_json(&v))
    }
}

/// Output of a pipeline run: `{ result }`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProcessResponse {
    pub result: Collection,
}

impl ProcessResponse {
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "result": self.result.iter().map(Record::to_json).collect::<Vec<_>>()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{ProcessRequest, ProcessResponse};
    use crate::types::{Collection, Record};
    use serde_json::json;

    fn data_of(request: serde_json::Value) -> Option<Collection> {
        ProcessRequest::from_json(&request).data
    }

    #[test]
    fn decodes_data_and_ordered_condition() {
        let req = ProcessRequest::from_json(&json!({
            "data": [{"name": "John", "n": 1}],
            "condition": {"sort_by": ["n"], "include": [{"name": "John"}]}
        }));
        let record = Record::new().with("name", "John").with("n", 1);
        assert_eq!(req.data, Some(vec![record]));
        let names: Vec<&str> = req.condition.as_ref().unwrap().rule_names().collect();
        assert_eq!(names, vec!["sort_by", "include"]);
    }

    #[test]
    fn non_array_data_is_not_a_collection() {
        assert_eq!(data_of(json!({"data": {"a": 1}})), None);
        assert_eq!(data_of(json!({"data": "rows"})), None);
        assert_eq!(data_of(json!({})), None);
        assert_eq!(data_of(json!([1, 2])), None);
    }

    #[test]
    fn arrays_of_non_records_are_not_a_collection() {
        assert_eq!(data_of(json!({"data": [1, 2]})), None);
        assert_eq!(data_of(json!({"data": [{"a": {"nested": 1}}]})), None);
    }

    #[test]
    fn one_nested_record_rejects_the_whole_collection() {
        let data = json!({"data": [{"a": 1}, {"a": [2]}, {"a": 3}]});
        assert_eq!(data_of(data), None);
    }

    #[test]
    fn null_condition_is_absent_and_non_object_condition_is_empty() {
        let absent = json!({"data": [], "condition": null});
        assert_eq!(ProcessRequest::from_json(&absent).condition, None);

        let empty = json!({"data": [], "condition": ["include"]});
        let condition = ProcessRequest::from_json(&empty).condition;
        assert_eq!(condition.map(|c| c.len()), Some(0));
    }

    #[test]
    fn response_serializes_as_result_object() {
        let resp = ProcessResponse {
            result: vec![Record::from([("a", 1)])],
        };
        assert_eq!(resp.to_json(), json!({"result": [{"a": 1}]}));
        assert_eq!(
            serde_json::to_value(&resp).unwrap(),
            json!({"result": [{"a": 1}]})
        );
    }

    #[test]
    fn malformed_json_text_is_an_error() {
        assert!(ProcessRequest::from_json_str("{\"data\": [").is_err());
    }
}
