use std::sync::{Arc, Mutex};

use rule_pipeline::pipeline::{
    CompositePipelineObserver, DataProcessor, PipelineEvent, PipelineObserver, ProcessorOptions,
    StdErrPipelineObserver,
};
use serde_json::json;

#[derive(Default)]
struct RecordingObserver {
    applied: Mutex<Vec<(String, usize, usize)>>,
    skipped: Mutex<Vec<String>>,
    finished: Mutex<usize>,
}

impl PipelineObserver for RecordingObserver {
    fn on_event(&self, event: &PipelineEvent) {
        match event {
            PipelineEvent::RuleApplied {
                rule,
                input_rows,
                output_rows,
                ..
            } => self
                .applied
                .lock()
                .unwrap()
                .push((rule.clone(), *input_rows, *output_rows)),
            PipelineEvent::RuleSkipped { rule } => self.skipped.lock().unwrap().push(rule.clone()),
            PipelineEvent::RunFinished { .. } => *self.finished.lock().unwrap() += 1,
            _ => {}
        }
    }
}

#[test]
fn configured_observer_sees_row_counts_per_rule() {
    let obs = Arc::new(RecordingObserver::default());
    let processor = DataProcessor::with_options(ProcessorOptions {
        observer: Some(obs.clone()),
        ..Default::default()
    })
    .unwrap();

    let response = processor.process_json(&json!({
        "data": [{"d": true}, {"d": false}, {"d": false}],
        "condition": {"exclude": [{"d": true}], "bogus": 1, "sort_by": ["d"]}
    }));
    assert_eq!(response.result.len(), 2);

    assert_eq!(
        *obs.applied.lock().unwrap(),
        vec![("exclude".to_string(), 3, 2), ("sort_by".to_string(), 2, 2)]
    );
    assert_eq!(*obs.skipped.lock().unwrap(), vec!["bogus".to_string()]);
    assert_eq!(*obs.finished.lock().unwrap(), 1);
}

#[test]
fn observers_do_not_change_results() {
    let request = json!({
        "data": [{"n": 3}, {"n": 1}, {"n": 2}],
        "condition": {"sort_by": ["n"]}
    });

    let recording: Arc<dyn PipelineObserver> = Arc::new(RecordingObserver::default());
    let stderr: Arc<dyn PipelineObserver> = Arc::new(StdErrPipelineObserver);
    let observed = DataProcessor::new()
        .with_observer(Arc::new(CompositePipelineObserver::new(vec![recording, stderr])));

    assert_eq!(
        observed.process_json(&request),
        DataProcessor::new().process_json(&request)
    );
}
