//! The pipeline dispatcher.
//!
//! [`DataProcessor::process`] walks the request's [`ConditionSpec`] in declaration order,
//! resolves each key against its [`RuleRegistry`] and folds the matching rule over the
//! accumulated collection. Unknown keys are skipped. Processing is synchronous, never fails
//! and never mutates the request.
//!
//! ```rust
//! use rule_pipeline::pipeline::{DataProcessor, ProcessRequest};
//! use rule_pipeline::types::{ConditionSpec, Record, Value};
//! use serde_json::json;
//!
//! let processor = DataProcessor::new();
//! let request = ProcessRequest::new(vec![
//!     Record::from([("name", "John"), ("email", "b@x")]),
//!     Record::from([("name", "John"), ("email", "a@x")]),
//!     Record::from([("name", "Jane"), ("email", "c@x")]),
//! ])
//! .with_condition(
//!     ConditionSpec::new()
//!         .with("include", json!([{"name": "John"}]))
//!         .with("sort_by", json!(["email"])),
//! );
//!
//! let response = processor.process(&request);
//! let emails: Vec<_> = response.result.iter().map(|r| r.get("email").cloned()).collect();
//! assert_eq!(emails, vec![Some(Value::from("a@x")), Some(Value::from("b@x"))]);
//! ```

mod observer;
mod request;

use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use crate::error::{IngestionResult, PipelineResult};
use crate::rules::{Rule, RuleRegistry};
use crate::types::ConditionSpec;

pub use observer::{
    CompositePipelineObserver, PipelineEvent, PipelineMetrics, PipelineMetricsSnapshot,
    PipelineObserver, StdErrPipelineObserver,
};
pub use request::{ProcessRequest, ProcessResponse};

/// A configured `name -> kind` binding, e.g. `filter -> include`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleBinding {
    pub name: String,
    /// Canonical name of a built-in rule (`include`, `exclude`, `sort_by`).
    pub kind: String,
}

impl RuleBinding {
    pub fn new(name: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: kind.into(),
        }
    }
}

/// Configuration for a [`DataProcessor`].
#[derive(Clone)]
pub struct ProcessorOptions {
    /// Register `include`, `exclude` and `sort_by` before applying [`Self::rule_bindings`].
    pub register_builtins: bool,
    /// Additional bindings registered in order; later bindings overwrite earlier ones.
    pub rule_bindings: Vec<RuleBinding>,
    /// Optional observer for logging.
    pub observer: Option<Arc<dyn PipelineObserver>>,
}

impl fmt::Debug for ProcessorOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProcessorOptions")
            .field("register_builtins", &self.register_builtins)
            .field("rule_bindings", &self.rule_bindings)
            .field("observer_set", &self.observer.is_some())
            .finish()
    }
}

impl Default for ProcessorOptions {
    fn default() -> Self {
        Self {
            register_builtins: true,
            rule_bindings: Vec::new(),
            observer: None,
        }
    }
}

/// Applies named rules from a [`RuleRegistry`] to request data.
///
/// Registration takes `&mut self` and processing takes `&self`, so the registry cannot change
/// during a run. A configured processor can be shared across threads.
pub struct DataProcessor {
    registry: RuleRegistry,
    observer: Option<Arc<dyn PipelineObserver>>,
    metrics: Arc<PipelineMetrics>,
}

impl DataProcessor {
    /// A processor with the built-in rules registered.
    pub fn new() -> Self {
        Self::from_registry(RuleRegistry::with_builtins())
    }

    /// A processor over an existing registry.
    pub fn from_registry(registry: RuleRegistry) -> Self {
        Self {
            registry,
            observer: None,
            metrics: Arc::new(PipelineMetrics::new()),
        }
    }

    /// Build a processor from options.
    ///
    /// # Errors
    ///
    /// Fails if a [`RuleBinding`] names an unknown kind
    /// ([`crate::PipelineError::TypeConstraintViolation`]) or has a blank name
    /// ([`crate::PipelineError::InvalidRuleName`]).
    pub fn with_options(opts: ProcessorOptions) -> PipelineResult<Self> {
        let mut registry = if opts.register_builtins {
            RuleRegistry::with_builtins()
        } else {
            RuleRegistry::new()
        };
        for binding in &opts.rule_bindings {
            registry.register_kind(binding.name.clone(), &binding.kind)?;
        }

        let mut processor = Self::from_registry(registry);
        processor.observer = opts.observer;
        Ok(processor)
    }

    /// Attach an observer for pipeline events.
    pub fn with_observer(mut self, observer: Arc<dyn PipelineObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    /// Register (or replace) a rule under `name`.
    ///
    /// Returns the rule previously bound to `name`.
    pub fn register_rule<R>(
        &mut self,
        name: impl Into<String>,
        rule: R,
    ) -> PipelineResult<Option<Arc<dyn Rule>>>
    where
        R: Rule + 'static,
    {
        self.registry.register(name, rule)
    }

    pub fn registry(&self) -> &RuleRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut RuleRegistry {
        &mut self.registry
    }

    /// Get a handle to cumulative processing metrics.
    pub fn metrics(&self) -> Arc<PipelineMetrics> {
        Arc::clone(&self.metrics)
    }

    /// Run the pipeline.
    ///
    /// - `data` absent (not a collection): empty result.
    /// - `condition` absent: a copy of `data`.
    /// - otherwise each condition key, in order, is resolved and applied; unknown keys are
    ///   skipped.
    pub fn process(&self, request: &ProcessRequest) -> ProcessResponse {
        let Some(data) = request.data.as_ref() else {
            self.metrics.on_input_rejected();
            self.emit(PipelineEvent::InputRejected);
            return ProcessResponse::default();
        };

        let start = Instant::now();
        self.metrics.begin_run(data.len());
        self.emit(PipelineEvent::RunStarted {
            input_rows: data.len(),
            condition_keys: request.condition.as_ref().map_or(0, ConditionSpec::len),
        });

        let mut result = data.clone();
        if let Some(condition) = &request.condition {
            for (name, params) in condition.iter() {
                let Some(rule) = self.registry.resolve(name) else {
                    self.metrics.on_rule_skipped();
                    self.emit(PipelineEvent::RuleSkipped {
                        rule: name.to_string(),
                    });
                    continue;
                };

                let rule_start = Instant::now();
                let input_rows = result.len();
                result = rule.execute(&result, params);
                self.metrics.on_rule_applied();
                self.emit(PipelineEvent::RuleApplied {
                    rule: name.to_string(),
                    input_rows,
                    output_rows: result.len(),
                    elapsed: rule_start.elapsed(),
                });
            }
        }

        let elapsed = start.elapsed();
        self.metrics.end_run(result.len(), elapsed);
        self.emit(PipelineEvent::RunFinished {
            output_rows: result.len(),
            elapsed,
            metrics: self.metrics.snapshot(),
        });

        ProcessResponse { result }
    }

    /// Decode a JSON request (see [`ProcessRequest::from_json`]) and run it.
    pub fn process_json(&self, request: &serde_json::Value) -> ProcessResponse {
        self.process(&ProcessRequest::from_json(request))
    }

    /// Parse JSON text, then [`Self::process_json`].
    pub fn process_json_str(&self, input: &str) -> IngestionResult<ProcessResponse> {
        let request = ProcessRequest::from_json_str(input)?;
        Ok(self.process(&request))
    }

    fn emit(&self, event: PipelineEvent) {
        if let Some(obs) = &self.observer {
            obs.on_event(&event);
        }
    }
}

impl Default for DataProcessor {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for DataProcessor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DataProcessor")
            .field("registry", &self.registry)
            .field("observer_set", &self.observer.is_some())
            .finish()
    }
}

/// Run `request` through a processor with only the built-in rules.
pub fn process(request: &ProcessRequest) -> ProcessResponse {
    DataProcessor::new().process(request)
}
