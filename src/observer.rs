//! Stage-boundary instrumentation for pipeline invocations.
//!
//! An observer receives a callback before and after every stage of one
//! invocation. Pass [`NoopObserver`] for zero-overhead execution, or
//! [`StageTimingObserver`] to collect a per-stage [`StageReport`].

use std::time::{Duration, Instant};

/// Receives callbacks at each stage boundary during an invocation.
///
/// All methods default to no-ops, so implementors override only what they
/// need.
pub trait RunObserver {
    /// A stage (1-based, out of `total`) is about to run.
    fn on_stage_start(&mut self, _stage: usize, _total: usize) {}

    /// A stage finished; `report` carries its timing and queue movement.
    fn on_stage_end(&mut self, _stage: usize, _report: &StageReport) {}
}

/// Timing and queue movement measured for one stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StageReport {
    elapsed: Duration,
    consumed: usize,
    queue_depth: usize,
}

impl StageReport {
    /// Build a report from a stage's elapsed time, the number of values it
    /// consumed, and the queue depth after its result was enqueued.
    pub fn new(elapsed: Duration, consumed: usize, queue_depth: usize) -> Self {
        Self {
            elapsed,
            consumed,
            queue_depth,
        }
    }

    /// Wall-clock time the stage callback took.
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Queue values the stage consumed.
    pub fn consumed(&self) -> usize {
        self.consumed
    }

    /// Queue depth after the stage's result was pushed.
    pub fn queue_depth(&self) -> usize {
        self.queue_depth
    }
}

/// Monotonic stopwatch for one stage.
#[derive(Debug, Clone, Copy)]
pub struct StageClock(Instant);

impl StageClock {
    /// Start timing now.
    pub fn start() -> Self {
        Self(Instant::now())
    }

    /// Time elapsed since [`start`](Self::start).
    pub fn elapsed(&self) -> Duration {
        self.0.elapsed()
    }
}

/// Observer that does nothing; the compiler eliminates the calls.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl RunObserver for NoopObserver {}

/// Observer that records a [`StageReport`] per stage, in execution order.
#[derive(Debug, Clone, Default)]
pub struct StageTimingObserver {
    reports: Vec<(usize, StageReport)>,
}

impl StageTimingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    /// The collected `(stage, report)` pairs, one per stage that ran.
    pub fn reports(&self) -> &[(usize, StageReport)] {
        &self.reports
    }
}

impl RunObserver for StageTimingObserver {
    fn on_stage_end(&mut self, stage: usize, report: &StageReport) {
        self.reports.push((stage, *report));
    }
}
