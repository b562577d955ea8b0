//! `rule-pipeline` applies an ordered set of named rules to an in-memory collection of records.
//!
//! A caller hands [`pipeline::DataProcessor::process`] a request of the form
//! `{ data, condition }`. `data` is a [`types::Collection`] of flat [`types::Record`]s;
//! `condition` is a [`types::ConditionSpec`] whose keys name rules and whose values are the
//! rules' parameters. Rules run in the order the keys were declared; each one sees the output
//! of the previous. Unknown rule names are skipped and malformed parameters are no-ops, so
//! processing never fails.
//!
//! ## Built-in rules
//!
//! - `include`: `[{field: value, ...}, ...]`. Keeps records that satisfy **every** clause.
//! - `exclude`: `[{field: value, ...}, ...]`. Drops records that satisfy **any** clause.
//! - `sort_by`: `["field", ...]`. Stable multi-key sort; absent/null values sort last, strings
//!   collate case-, accent- and number-aware.
//!
//! Clause matching is strict equality per field. An absent field never matches.
//!
//! ## Quick example
//!
//! ```rust
//! use rule_pipeline::pipeline::DataProcessor;
//! use serde_json::json;
//!
//! let processor = DataProcessor::new();
//! let response = processor.process_json(&json!({
//!     "data": [
//!         {"user": "mike@mail.com", "rating": 20, "disabled": false},
//!         {"user": "greg@mail.com", "rating": 14, "disabled": false},
//!         {"user": "john@mail.com", "rating": 25, "disabled": true}
//!     ],
//!     "condition": {"exclude": [{"disabled": true}], "sort_by": ["rating"]}
//! }));
//!
//! assert_eq!(
//!     response.to_json(),
//!     json!({"result": [
//!         {"disabled": false, "rating": 14, "user": "greg@mail.com"},
//!         {"disabled": false, "rating": 20, "user": "mike@mail.com"}
//!     ]})
//! );
//! ```
//!
//! ## Custom rules
//!
//! Anything implementing [`rules::Rule`] (including closures of the right shape) can be
//! registered under a name and then referenced from a condition:
//!
//! ```rust
//! use rule_pipeline::pipeline::DataProcessor;
//! use rule_pipeline::types::{Collection, Param, Record};
//! use serde_json::json;
//!
//! let mut processor = DataProcessor::new();
//! processor
//!     .register_rule("reverse", |data: &[Record], _: &Param| -> Collection {
//!         data.iter().rev().cloned().collect()
//!     })
//!     .unwrap();
//!
//! let response = processor.process_json(&json!({
//!     "data": [{"n": 1}, {"n": 2}, {"n": 3}],
//!     "condition": {"reverse": true, "exclude": [{"n": 2}]}
//! }));
//! assert_eq!(response.to_json(), json!({"result": [{"n": 3}, {"n": 1}]}));
//! ```
//!
//! ## Modules
//!
//! - [`types`]: values, records, collections and condition specs
//! - [`rules`]: the [`rules::Rule`] trait, built-in rules and the [`rules::RuleRegistry`]
//! - [`pipeline`]: the dispatcher, request/response types, observers and metrics
//! - [`ingestion`]: host-side loaders for JSON/NDJSON/CSV files
//! - [`error`]: error types

pub mod error;
pub mod ingestion;
pub mod pipeline;
pub mod rules;
pub mod types;

pub use error::{IngestionError, IngestionResult, PipelineError, PipelineResult};
pub use pipeline::{DataProcessor, ProcessRequest, ProcessResponse, process};
