//! Queue-driven function composition.
//!
//! `conveyor` builds pipelines out of heterogeneous-arity callbacks and runs
//! them over a FIFO value queue: each stage pops its arity worth of values
//! from the front, produces one value, and pushes it to the back. Stages can
//! fan several upstream values into one, produce values from nothing, and
//! share a receiver value bound by an earlier stage.
//!
//! # Example
//!
//! ```
//! use conveyor::compose;
//!
//! let pipeline = compose![
//!     |x: i64| x + 1,
//!     |x: i64| x * 2,
//! ]
//! .unwrap();
//!
//! assert_eq!(pipeline.invoke([3]).unwrap(), Some(8));
//! ```
//!
//! Stage inputs come in several shapes, all normalized at build time:
//!
//! ```
//! use conveyor::{compose, StageSpec};
//!
//! let pipeline = compose![
//!     // inferred arity from the closure signature
//!     |a: i64, b: i64| a + b,
//!     // explicit arity with a slice-style callback
//!     (|args: Vec<i64>| args[0] * 10, 1usize),
//!     // bound receiver, visible to this and later stages
//!     (|this: Option<&i64>, x: i64| this.copied().unwrap() + x, 5i64),
//!     // record form
//!     StageSpec::new(|x: i64| x - 1),
//! ]
//! .unwrap();
//!
//! assert_eq!(pipeline.invoke([1, 2]).unwrap(), Some(34));
//! ```
//!
//! Arity mismatches are invocation-time errors with the failing stage's
//! 1-based position; [`Pipeline::check`] projects the same arithmetic ahead
//! of time and reports every problem at once.

pub mod builder;
pub mod callback;
pub mod errors;
pub mod normalize;
pub mod observer;
pub mod runner;
pub mod stage;
pub mod validation;

pub use builder::PipelineBuilder;
pub use callback::{BoxedCallback, StageCallback, VariadicCallback};
pub use errors::{ComposeError, ConfigError, ErrorCode, ExecError, Result};
pub use normalize::IntoStage;
pub use observer::{NoopObserver, RunObserver, StageClock, StageReport, StageTimingObserver};
pub use runner::Pipeline;
pub use stage::{Binding, Stage, StageShape, StageSpec};
pub use validation::{
    Severity, ValidationDiagnostic, ValidationEngine, ValidationReport, ValidationRule,
};

/// Crate version, as compiled.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
