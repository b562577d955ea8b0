use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Events emitted by [`super::DataProcessor::process`].
#[derive(Debug, Clone)]
pub enum PipelineEvent {
    /// The request's data was not a collection; the result is empty.
    InputRejected,
    RunStarted {
        input_rows: usize,
        condition_keys: usize,
    },
    RuleApplied {
        rule: String,
        input_rows: usize,
        output_rows: usize,
        elapsed: Duration,
    },
    /// A condition key did not resolve to a registered rule.
    RuleSkipped { rule: String },
    RunFinished {
        output_rows: usize,
        elapsed: Duration,
        metrics: PipelineMetricsSnapshot,
    },
}

/// Observer hook for pipeline events.
pub trait PipelineObserver: Send + Sync {
    fn on_event(&self, event: &PipelineEvent);
}

/// A simple stderr logger for pipeline events.
#[derive(Debug, Default)]
pub struct StdErrPipelineObserver;

impl PipelineObserver for StdErrPipelineObserver {
    fn on_event(&self, event: &PipelineEvent) {
        match event {
            PipelineEvent::RuleSkipped { rule } => {
                eprintln!("[pipeline][skip] rule={rule} (not registered)")
            }
            PipelineEvent::RuleApplied {
                rule,
                input_rows,
                output_rows,
                elapsed,
            } => eprintln!(
                "[pipeline][rule] rule={rule} rows={input_rows}->{output_rows} elapsed={elapsed:?}"
            ),
            PipelineEvent::RunFinished { metrics, .. } => eprintln!("[pipeline][done] {metrics}"),
            other => eprintln!("[pipeline] {other:?}"),
        }
    }
}

/// Fans events out to a list of observers.
#[derive(Default)]
pub struct CompositePipelineObserver {
    observers: Vec<Arc<dyn PipelineObserver>>,
}

impl CompositePipelineObserver {
    pub fn new(observers: Vec<Arc<dyn PipelineObserver>>) -> Self {
        Self { observers }
    }
}

impl fmt::Debug for CompositePipelineObserver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompositePipelineObserver")
            .field("observers_len", &self.observers.len())
            .finish()
    }
}

impl PipelineObserver for CompositePipelineObserver {
    fn on_event(&self, event: &PipelineEvent) {
        for o in &self.observers {
            o.on_event(event);
        }
    }
}

/// Cumulative counters for a processor.
///
/// Updated during processing; callers can snapshot them at any time.
pub struct PipelineMetrics {
    runs: AtomicU64,
    rejected_inputs: AtomicU64,
    rules_applied: AtomicU64,
    rules_skipped: AtomicU64,
    rows_in: AtomicU64,
    rows_out: AtomicU64,
    last_elapsed_ns: AtomicU64,
}

impl PipelineMetrics {
    pub fn new() -> Self {
        Self {
            runs: AtomicU64::new(0),
            rejected_inputs: AtomicU64::new(0),
            rules_applied: AtomicU64::new(0),
            rules_skipped: AtomicU64::new(0),
            rows_in: AtomicU64::new(0),
            rows_out: AtomicU64::new(0),
            last_elapsed_ns: AtomicU64::new(0),
        }
    }

    pub fn on_input_rejected(&self) {
        let _ = self.rejected_inputs.fetch_add(1, Ordering::SeqCst);
    }

    pub fn begin_run(&self, input_rows: usize) {
        let _ = self.runs.fetch_add(1, Ordering::SeqCst);
        let _ = self.rows_in.fetch_add(input_rows as u64, Ordering::SeqCst);
    }

    pub fn on_rule_applied(&self) {
        let _ = self.rules_applied.fetch_add(1, Ordering::SeqCst);
    }

    pub fn on_rule_skipped(&self) {
        let _ = self.rules_skipped.fetch_add(1, Ordering::SeqCst);
    }

    pub fn end_run(&self, output_rows: usize, elapsed: Duration) {
        let _ = self.rows_out.fetch_add(output_rows as u64, Ordering::SeqCst);
        // Clamp to 1ns so a finished run is distinguishable from "never ran".
        let ns = elapsed.as_nanos().clamp(1, u64::MAX as u128) as u64;
        self.last_elapsed_ns.store(ns, Ordering::SeqCst);
    }

    pub fn snapshot(&self) -> PipelineMetricsSnapshot {
        let elapsed_ns = self.last_elapsed_ns.load(Ordering::SeqCst);
        PipelineMetricsSnapshot {
            runs: self.runs.load(Ordering::SeqCst),
            rejected_inputs: self.rejected_inputs.load(Ordering::SeqCst),
            rules_applied: self.rules_applied.load(Ordering::SeqCst),
            rules_skipped: self.rules_skipped.load(Ordering::SeqCst),
            rows_in: self.rows_in.load(Ordering::SeqCst),
            rows_out: self.rows_out.load(Ordering::SeqCst),
            last_elapsed: (elapsed_ns > 0).then(|| Duration::from_nanos(elapsed_ns)),
        }
    }
}

impl Default for PipelineMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Immutable snapshot of [`PipelineMetrics`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineMetricsSnapshot {
    pub runs: u64,
    pub rejected_inputs: u64,
    pub rules_applied: u64,
    pub rules_skipped: u64,
    pub rows_in: u64,
    pub rows_out: u64,
    pub last_elapsed: Option<Duration>,
}

impl fmt::Display for PipelineMetricsSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "runs={}, rejected_inputs={}, rules_applied={}, rules_skipped={}, rows={}->{}, last_elapsed={:?}",
            self.runs,
            self.rejected_inputs,
            self.rules_applied,
            self.rules_skipped,
            self.rows_in,
            self.rows_out,
            self.last_elapsed
        )
    }
}
