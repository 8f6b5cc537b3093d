//! The built pipeline and its execution engine.
//!
//! A [`Pipeline`] owns an immutable, ordered list of normalized stages.
//! Each invocation seeds a fresh FIFO queue from the caller's arguments and
//! drives it through every stage in order: pop the stage's arity worth of
//! values from the front, resolve the receiver binding, invoke, push the
//! single result to the back. Nothing persists between invocations, so
//! concurrent invocations of one pipeline share only the stage list.
//!
//! The queue lets a stage consume several upstream values (fan-in) while
//! every stage contributes exactly one value back, so the pipeline keeps an
//! arithmetic-expression shape without fixing stage arity to 1.

use std::collections::VecDeque;

use crate::errors::ExecError;
use crate::observer::{NoopObserver, RunObserver, StageClock, StageReport};
use crate::stage::{Binding, Stage, StageShape};
use crate::validation::{ValidationEngine, ValidationReport};

/// Enter a tracing span for a pipeline stage (when the `tracing` feature is
/// enabled). When disabled, this is a no-op and the compiler eliminates it.
macro_rules! trace_stage {
    ($stage:expr, $total:expr) => {
        #[cfg(feature = "tracing")]
        let _span =
            tracing::info_span!("pipeline_stage", stage = $stage, total = $total).entered();
    };
}

/// A callable pipeline: the ordered stage list captured at build time.
///
/// Created by [`PipelineBuilder::build`](crate::builder::PipelineBuilder::build)
/// or the [`compose!`](crate::compose) macro, invoked any number of times,
/// never mutated after creation.
#[derive(Debug)]
pub struct Pipeline<V> {
    stages: Vec<Stage<V>>,
}

impl<V> Pipeline<V> {
    pub(crate) fn new(stages: Vec<Stage<V>>) -> Self {
        Self { stages }
    }

    /// Number of stages.
    pub fn len(&self) -> usize {
        self.stages.len()
    }

    /// `true` for a zero-stage pipeline (the identity on at most one
    /// argument).
    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// The normalized stage list, in execution order.
    pub fn stages(&self) -> &[Stage<V>] {
        &self.stages
    }

    /// V-free structural summary of every stage, in order.
    pub fn shapes(&self) -> Vec<StageShape> {
        self.stages.iter().map(Stage::shape).collect()
    }

    /// Dry-run arity check: project the queue depth a seed of `seed` values
    /// would produce through every stage, without invoking anything.
    ///
    /// Collects *all* findings rather than stopping at the first, so callers
    /// see every underflow plus any final surplus at once. Invocation itself
    /// never consults this; arity is always re-checked live.
    pub fn check(&self, seed: usize) -> ValidationReport {
        ValidationEngine::with_defaults().validate(&self.shapes(), seed)
    }

    /// Run the pipeline against `args`.
    ///
    /// Returns the sole value left in the queue, `Ok(None)` only for a
    /// zero-stage pipeline invoked with no arguments, or an [`ExecError`]
    /// when a stage is starved of values or more than one value remains at
    /// the end.
    pub fn invoke(&self, args: impl IntoIterator<Item = V>) -> Result<Option<V>, ExecError> {
        self.invoke_observed(args, &mut NoopObserver)
    }

    /// Same as [`invoke`](Self::invoke), notifying `observer` at each stage
    /// boundary.
    pub fn invoke_observed(
        &self,
        args: impl IntoIterator<Item = V>,
        observer: &mut impl RunObserver,
    ) -> Result<Option<V>, ExecError> {
        let mut queue: VecDeque<V> = args.into_iter().collect();
        let mut last_this: Option<&V> = None;
        let total = self.stages.len();

        for (idx, stage) in self.stages.iter().enumerate() {
            let position = idx + 1;
            trace_stage!(position, total);
            observer.on_stage_start(position, total);

            if queue.len() < stage.arity {
                return Err(ExecError::insufficient(
                    position,
                    total,
                    stage.arity,
                    queue.len(),
                ));
            }

            let stage_args: Vec<V> = queue.drain(..stage.arity).collect();

            // Set updates the shared receiver slot; Inherit reuses whatever
            // the nearest preceding Set established (or nothing).
            if let Binding::Set(v) = &stage.binding {
                last_this = Some(v);
            }

            let clock = StageClock::start();
            let result = (stage.callback)(last_this, stage_args);
            queue.push_back(result);

            let report = StageReport::new(clock.elapsed(), stage.arity, queue.len());
            observer.on_stage_end(position, &report);
        }

        if queue.len() > 1 {
            return Err(ExecError::surplus(total, queue.len()));
        }
        Ok(queue.pop_front())
    }
}
