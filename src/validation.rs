//! Structural pipeline validation.
//!
//! Rules operate on the V-free [`StageShape`] summary of a pipeline plus a
//! hypothetical seed size, so they can be run without any values and without
//! knowing the value type. The engine never short-circuits: every rule runs
//! and every diagnostic is collected, so a report shows all problems at
//! once rather than the first one found.

use serde::Serialize;

use crate::errors::ErrorCode;
use crate::stage::StageShape;

// ─── Diagnostics ─────────────────────────────────────────────────────────

/// How seriously a diagnostic should be taken.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// The pipeline would fail at invocation time.
    Error,
    /// Suspicious but executable.
    Warning,
}

/// A single finding from a validation rule.
#[derive(Debug, Clone, Serialize)]
pub struct ValidationDiagnostic {
    pub severity: Severity,
    pub code: ErrorCode,
    pub path: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

impl ValidationDiagnostic {
    pub fn error(code: ErrorCode, path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            code,
            path: path.into(),
            message: message.into(),
            hint: None,
        }
    }

    pub fn warning(code: ErrorCode, path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            code,
            path: path.into(),
            message: message.into(),
            hint: None,
        }
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

/// Every diagnostic produced by a validation run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ValidationReport {
    diagnostics: Vec<ValidationDiagnostic>,
}

impl ValidationReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, diagnostic: ValidationDiagnostic) {
        self.diagnostics.push(diagnostic);
    }

    pub fn extend(&mut self, diagnostics: impl IntoIterator<Item = ValidationDiagnostic>) {
        self.diagnostics.extend(diagnostics);
    }

    pub fn diagnostics(&self) -> &[ValidationDiagnostic] {
        &self.diagnostics
    }

    pub fn errors(&self) -> impl Iterator<Item = &ValidationDiagnostic> {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &ValidationDiagnostic> {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Warning)
    }

    pub fn has_errors(&self) -> bool {
        self.errors().next().is_some()
    }

    pub fn is_valid(&self) -> bool {
        !self.has_errors()
    }

    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// Pretty JSON rendering, for logs and tooling.
    pub fn to_json_string(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

// ─── Rules ───────────────────────────────────────────────────────────────

/// A structural check over a stage list and a seed size.
pub trait ValidationRule: Send + Sync {
    fn name(&self) -> &'static str;

    fn validate(&self, shapes: &[StageShape], seed: usize) -> Vec<ValidationDiagnostic>;
}

/// Projects the queue depth through every stage and reports each stage that
/// would be starved of values.
///
/// After an underflow the projection continues with a saturated depth, so
/// one missing value early on does not hide independent problems later.
pub struct QueueFlowRule;

impl ValidationRule for QueueFlowRule {
    fn name(&self) -> &'static str {
        "queue_flow"
    }

    fn validate(&self, shapes: &[StageShape], seed: usize) -> Vec<ValidationDiagnostic> {
        let mut diagnostics = Vec::new();
        let mut depth = seed;
        for (idx, shape) in shapes.iter().enumerate() {
            if depth < shape.arity {
                diagnostics.push(ValidationDiagnostic::error(
                    ErrorCode::InsufficientValues,
                    format!("/stages/{idx}"),
                    format!(
                        "stage {} of {} needs {} value(s), but only {} would remain in the queue",
                        idx + 1,
                        shapes.len(),
                        shape.arity,
                        depth
                    ),
                ));
            }
            depth = depth.saturating_sub(shape.arity) + 1;
        }
        diagnostics
    }
}

/// Reports a projected surplus: more than one value left after the final
/// stage.
pub struct LeftoverRule;

impl ValidationRule for LeftoverRule {
    fn name(&self) -> &'static str {
        "leftover"
    }

    fn validate(&self, shapes: &[StageShape], seed: usize) -> Vec<ValidationDiagnostic> {
        let mut depth = seed;
        for shape in shapes {
            depth = depth.saturating_sub(shape.arity) + 1;
        }
        if depth > 1 {
            vec![ValidationDiagnostic::error(
                ErrorCode::SurplusValues,
                "/stages",
                format!("{depth} values would remain after the final stage"),
            )
            .with_hint("add a stage that consumes the extra values, or trim the arguments")]
        } else {
            Vec::new()
        }
    }
}

/// Flags a zero-stage pipeline. Legal, but usually a construction mistake.
pub struct TrivialPipelineRule;

impl ValidationRule for TrivialPipelineRule {
    fn name(&self) -> &'static str {
        "trivial_pipeline"
    }

    fn validate(&self, shapes: &[StageShape], _seed: usize) -> Vec<ValidationDiagnostic> {
        if shapes.is_empty() {
            vec![ValidationDiagnostic::warning(
                ErrorCode::EmptyPipeline,
                "/stages",
                "pipeline has no stages; it passes at most one argument through unchanged",
            )]
        } else {
            Vec::new()
        }
    }
}

// ─── Engine ──────────────────────────────────────────────────────────────

/// Runs a set of rules against a pipeline's shapes.
pub struct ValidationEngine {
    rules: Vec<Box<dyn ValidationRule>>,
}

impl ValidationEngine {
    /// An engine with no rules. Every validation passes.
    pub fn new() -> Self {
        Self { rules: Vec::new() }
    }

    /// The standard rule set: queue-flow projection, leftover detection,
    /// and the trivial-pipeline warning.
    pub fn with_defaults() -> Self {
        Self::new()
            .add_rule(QueueFlowRule)
            .add_rule(LeftoverRule)
            .add_rule(TrivialPipelineRule)
    }

    pub fn add_rule(mut self, rule: impl ValidationRule + 'static) -> Self {
        self.rules.push(Box::new(rule));
        self
    }

    pub fn validate(&self, shapes: &[StageShape], seed: usize) -> ValidationReport {
        let mut report = ValidationReport::new();
        for rule in &self.rules {
            report.extend(rule.validate(shapes, seed));
        }
        report
    }
}

impl Default for ValidationEngine {
    fn default() -> Self {
        Self::with_defaults()
    }
}
