//! Error types for pipeline construction and execution.
//!
//! Two error types cover the full pipeline lifecycle:
//!
//! - [`ConfigError`] — build-time problems found while normalizing stage
//!   inputs (an explicit arity that is not a positive integer)
//! - [`ExecError`] — failures during an invocation of a built pipeline
//!   (a stage starved of queue values, or values left over at the end)
//!
//! Both carry a stable [`ErrorCode`] for programmatic matching, a
//! human-readable `message` naming the offending values, and an optional
//! `hint` suggesting a fix. Neither is retried or recovered internally;
//! propagation is an immediate unwind to the caller.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for convenience.
pub type Result<T, E = ComposeError> = std::result::Result<T, E>;

// ─── Error codes ────────────────────────────────────────────────────────────

/// Stable, machine-matchable identifiers shared by errors and validation
/// diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    /// An explicit stage arity was not a positive integer.
    InvalidArity,
    /// A stage required more queue values than were available.
    InsufficientValues,
    /// More than one value remained after every stage ran.
    SurplusValues,
    /// The pipeline has no stages (warning-level; invocation is the
    /// identity on at most one argument).
    EmptyPipeline,
}

impl ErrorCode {
    /// The snake_case name used in Display, JSON, and error messages.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InvalidArity => "invalid_arity",
            Self::InsufficientValues => "insufficient_values",
            Self::SurplusValues => "surplus_values",
            Self::EmptyPipeline => "empty_pipeline",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ─── Build-time errors ──────────────────────────────────────────────────────

/// A problem found while normalizing a stage input, before any execution.
///
/// # Display format
///
/// ```text
/// [invalid_arity] /stages/2/arity: explicit arity must be a positive integer, got 0
/// ```
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[error("[{code}] {path}: {message}")]
pub struct ConfigError {
    /// Stable error code for programmatic matching.
    pub code: ErrorCode,

    /// JSON-pointer-like location of the problem.
    ///
    /// Examples: `"/stages/2/arity"`, `"/arity"` (before the builder knows
    /// the stage position), `""` (root).
    pub path: String,

    /// Human-readable description naming the offending raw value.
    pub message: String,

    /// Optional suggestion for how to fix the problem.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

impl ConfigError {
    /// Create a new build-time error.
    pub fn new(code: ErrorCode, path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code,
            path: path.into(),
            message: message.into(),
            hint: None,
        }
    }

    /// An explicit arity that is not a positive integer.
    pub fn invalid_arity(given: usize) -> Self {
        Self::new(
            ErrorCode::InvalidArity,
            "/arity",
            format!("explicit arity must be a positive integer, got {given}"),
        )
        .with_hint("Use an arity of 1 or more, or let the callback's signature infer it")
    }

    /// Attach a hint suggesting how to fix the problem.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }

    /// Re-anchor the error at a new location (used by the builder once the
    /// stage position is known).
    pub fn at(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }
}

// ─── Invocation-time errors ─────────────────────────────────────────────────

/// A failure during one invocation of a built pipeline.
///
/// Two distinct causes, distinguishable by [`ErrorCode`] and message:
/// a stage needed more queue values than remained, or more than one value
/// was left in the queue after every stage ran.
///
/// # Display format
///
/// ```text
/// [insufficient_values] stage 2 of 3: needs 2 value(s), but only 1 remain in the queue
/// [surplus_values] stage 3 of 3: all stages have been applied, but 2 values remain
/// ```
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[error("[{code}] stage {stage} of {total}: {message}")]
pub struct ExecError {
    /// Stable error code for programmatic matching.
    pub code: ErrorCode,

    /// 1-based position of the stage being reported. For the surplus case
    /// this equals `total` — every stage had already run.
    pub stage: usize,

    /// Total number of stages in the pipeline.
    pub total: usize,

    /// Human-readable description of the failure.
    pub message: String,

    /// Optional suggestion for how to fix or work around the failure.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

impl ExecError {
    /// A stage required `required` queue values but only `available` remained.
    pub fn insufficient(stage: usize, total: usize, required: usize, available: usize) -> Self {
        Self {
            code: ErrorCode::InsufficientValues,
            stage,
            total,
            message: format!("needs {required} value(s), but only {available} remain in the queue"),
            hint: None,
        }
    }

    /// More than one value remained after all stages ran.
    pub fn surplus(total: usize, remaining: usize) -> Self {
        Self {
            code: ErrorCode::SurplusValues,
            stage: total,
            total,
            message: format!("all stages have been applied, but {remaining} values remain"),
            hint: Some(
                "Add a stage that consumes the remaining values, or pass fewer arguments".into(),
            ),
        }
    }

    /// Attach a hint suggesting how to fix or work around the failure.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }

    /// `true` if a stage was starved of queue values.
    pub fn is_insufficient(&self) -> bool {
        self.code == ErrorCode::InsufficientValues
    }

    /// `true` if values were left over after the final stage.
    pub fn is_surplus(&self) -> bool {
        self.code == ErrorCode::SurplusValues
    }
}

// ─── Umbrella ───────────────────────────────────────────────────────────────

/// Either phase's error, for callers that build and invoke in one expression.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ComposeError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Exec(#[from] ExecError),
}
