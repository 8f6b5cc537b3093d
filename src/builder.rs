//! Incremental pipeline construction with deferred error surfacing.
//!
//! [`PipelineBuilder`] normalizes each stage input the moment it is added,
//! so a bad input is diagnosed with its position, but the failure only
//! surfaces from [`build`](PipelineBuilder::build). This keeps the fluent
//! chain infallible at every `.stage(..)` call while still attributing the
//! first error to the exact stage that caused it.

use crate::errors::ConfigError;
use crate::normalize::IntoStage;
use crate::runner::Pipeline;
use crate::stage::Stage;

/// Fluent builder for a [`Pipeline`].
///
/// Accepts every input shape [`IntoStage`] understands: bare callbacks,
/// `(callback, arity)`, `(callback, context)`, three-element tuples in
/// either order, [`StageSpec`](crate::stage::StageSpec) records, and
/// already-normalized [`Stage`]s.
pub struct PipelineBuilder<V> {
    stages: Vec<Stage<V>>,
    error: Option<ConfigError>,
}

impl<V> PipelineBuilder<V> {
    pub fn new() -> Self {
        Self {
            stages: Vec::new(),
            error: None,
        }
    }

    /// Append a stage. Inputs after the first failure are normalized but
    /// discarded; only the first error is reported.
    pub fn stage<M>(mut self, input: impl IntoStage<V, M>) -> Self {
        let index = self.stages.len();
        match input.into_stage() {
            Ok(stage) => {
                if self.error.is_none() {
                    self.stages.push(stage);
                }
            }
            Err(err) => {
                if self.error.is_none() {
                    let anchored = format!("/stages/{index}{}", err.path);
                    self.error = Some(err.at(anchored));
                }
            }
        }
        self
    }

    /// Finish construction, surfacing the first normalization error if any
    /// stage was rejected.
    pub fn build(self) -> Result<Pipeline<V>, ConfigError> {
        match self.error {
            Some(err) => Err(err),
            None => Ok(Pipeline::new(self.stages)),
        }
    }
}

impl<V> Default for PipelineBuilder<V> {
    fn default() -> Self {
        Self::new()
    }
}

/// Build a [`Pipeline`] from a sequence of stage inputs.
///
/// ```
/// use conveyor::compose;
///
/// let pipeline = compose![
///     |x: i64| x + 1,
///     (|args: Vec<i64>| args[0] * 2, 1usize),
/// ]
/// .unwrap();
/// assert_eq!(pipeline.invoke([3]).unwrap(), Some(8));
/// ```
#[macro_export]
macro_rules! compose {
    [$($stage:expr),* $(,)?] => {
        $crate::PipelineBuilder::new()$(.stage($stage))*.build()
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorCode;
    use crate::stage::{Binding, StageSpec};

    #[test]
    fn test_builder_accepts_every_shape() {
        let pipeline = PipelineBuilder::new()
            .stage(|x: i64| x)
            .stage((|x: i64| x,))
            .stage((|args: Vec<i64>| args[0], 1usize))
            .stage((|_: Option<&i64>, x: i64| x, 7i64))
            .stage((|_: Option<&i64>, args: Vec<i64>| args[0], 7i64, 1usize))
            .stage(StageSpec::new(|x: i64| x))
            .build()
            .unwrap();
        assert_eq!(pipeline.len(), 6);
        assert_eq!(pipeline.invoke([3]).unwrap(), Some(3));
    }

    #[test]
    fn test_first_error_carries_stage_path() {
        let err = PipelineBuilder::new()
            .stage(|x: i64| x)
            .stage((|args: Vec<i64>| args[0], 0usize))
            .build()
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidArity);
        assert_eq!(err.path, "/stages/1/arity");
    }

    #[test]
    fn test_later_errors_do_not_mask_the_first() {
        let err = PipelineBuilder::new()
            .stage((|args: Vec<i64>| args[0], 0usize))
            .stage((|args: Vec<i64>| args[0], 0usize))
            .build()
            .unwrap_err();
        assert_eq!(err.path, "/stages/0/arity");
    }

    #[test]
    fn test_normalized_stage_keeps_binding() {
        let pipeline = PipelineBuilder::new()
            .stage((|_: Option<&i64>, x: i64| x, 42i64))
            .build()
            .unwrap();
        assert!(matches!(pipeline.stages()[0].binding(), Binding::Set(42)));
    }

    #[test]
    fn test_compose_macro_matches_builder() {
        let pipeline = compose![|x: i64| x + 1, |x: i64| x * 2].unwrap();
        assert_eq!(pipeline.invoke([5]).unwrap(), Some(12));

        let empty: Result<Pipeline<i64>, _> = compose![];
        assert!(empty.unwrap().is_empty());
    }

    #[test]
    fn test_compose_macro_trailing_comma() {
        let pipeline = compose![|x: i64| x + 1,].unwrap();
        assert_eq!(pipeline.invoke([0]).unwrap(), Some(1));
    }
}
