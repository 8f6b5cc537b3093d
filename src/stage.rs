//! The canonical stage descriptor and its receiver-binding rule.
//!
//! Every accepted input shape normalizes into a [`Stage`]: an erased
//! callback, a [`Binding`], and an arity. After normalization the execution
//! engine never looks at raw input again.

use std::fmt;

use crate::callback::{BoxedCallback, StageCallback, VariadicCallback};

// ─── Binding ────────────────────────────────────────────────────────────────

/// How a stage resolves its receiver (`this`-equivalent) at invocation time.
///
/// [`Binding::Inherit`] is the reserved sentinel: reuse whatever receiver the
/// nearest preceding [`Binding::Set`] stage established, or no receiver at
/// all if none has. It is a distinct variant rather than a magic value, so it
/// can never collide with a legitimate user binding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Binding<V> {
    /// Reuse the previously established receiver.
    Inherit,
    /// Bind this value as the receiver and remember it for later
    /// `Inherit` stages.
    Set(V),
}

impl<V> Binding<V> {
    /// `true` for [`Binding::Set`].
    pub fn is_set(&self) -> bool {
        matches!(self, Self::Set(_))
    }
}

// ─── Stage ──────────────────────────────────────────────────────────────────

/// One normalized pipeline stage: `{callback, binding, arity}`.
///
/// Constructed through the input shapes accepted by
/// [`IntoStage`](crate::normalize::IntoStage) — a bare callable, an ordered
/// tuple, or a [`StageSpec`] record — or directly via [`Stage::from_fn`].
pub struct Stage<V> {
    pub(crate) callback: BoxedCallback<V>,
    pub(crate) binding: Binding<V>,
    pub(crate) arity: usize,
}

impl<V> Stage<V> {
    /// Normalize a bare fixed-signature callable: the binding is inherited
    /// and the arity is the callable's declared parameter count.
    pub fn from_fn<F, M>(f: F) -> Self
    where
        F: StageCallback<V, M>,
    {
        let arity = f.arity();
        Self {
            callback: f.into_boxed(),
            binding: Binding::Inherit,
            arity,
        }
    }

    /// The number of queue values this stage consumes per invocation.
    pub fn arity(&self) -> usize {
        self.arity
    }

    /// This stage's receiver-binding rule.
    pub fn binding(&self) -> &Binding<V> {
        &self.binding
    }

    /// V-free metadata used by the validation engine.
    pub fn shape(&self) -> StageShape {
        StageShape {
            arity: self.arity,
            bound: self.binding.is_set(),
        }
    }
}

impl<V> fmt::Debug for Stage<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Stage")
            .field("arity", &self.arity)
            .field("bound", &self.binding.is_set())
            .finish_non_exhaustive()
    }
}

/// Structural summary of a stage: its arity and whether it sets a receiver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StageShape {
    /// Queue values consumed per invocation.
    pub arity: usize,
    /// `true` if the stage binds its own receiver ([`Binding::Set`]).
    pub bound: bool,
}

// ─── StageSpec ──────────────────────────────────────────────────────────────

/// The record input shape: a callback with optional `context` and `arity`
/// overrides, resolved to a [`Stage`] when the pipeline is built.
///
/// Defaults mirror the bare-callable case: an absent context means
/// [`Binding::Inherit`]; an absent arity means the callback's declared
/// parameter count.
///
/// ```
/// use conveyor::StageSpec;
///
/// // Declared count (1) and an explicit receiver.
/// let spec = StageSpec::new(|x: i64| x + 1).context(10);
///
/// // Batch-taking callback with an explicit count.
/// let spec = StageSpec::taking(3, |args: Vec<i64>| args.iter().sum());
/// ```
pub struct StageSpec<V> {
    pub(crate) callback: BoxedCallback<V>,
    /// Declared parameter count, used when no explicit arity is given.
    pub(crate) declared: usize,
    pub(crate) context: Option<V>,
    pub(crate) arity: Option<usize>,
}

impl<V> StageSpec<V> {
    /// Start a record around a fixed-signature callback; the arity defaults
    /// to the signature's declared parameter count.
    pub fn new<F, M>(f: F) -> Self
    where
        F: StageCallback<V, M>,
    {
        let declared = f.arity();
        Self {
            callback: f.into_boxed(),
            declared,
            context: None,
            arity: None,
        }
    }

    /// Start a record around a batch-taking callback with an explicit
    /// consumption count. Zero is rejected when the pipeline is built.
    pub fn taking<F, M>(arity: usize, f: F) -> Self
    where
        F: VariadicCallback<V, M>,
    {
        Self {
            callback: f.into_boxed(),
            declared: 0,
            context: None,
            arity: Some(arity),
        }
    }

    /// Bind a receiver for this stage (and for later inheriting stages).
    pub fn context(mut self, v: V) -> Self {
        self.context = Some(v);
        self
    }
}

impl<V> fmt::Debug for StageSpec<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StageSpec")
            .field("declared", &self.declared)
            .field("arity", &self.arity)
            .field("has_context", &self.context.is_some())
            .finish_non_exhaustive()
    }
}
