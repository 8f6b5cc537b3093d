//! Descriptor normalization — canonicalizing every accepted input shape into
//! a uniform [`Stage`].
//!
//! Three shorthand families are accepted, each encoded at the call site as
//! its own type (no runtime shape inspection):
//!
//! 1. **Bare callable** `f` — binding inherited, arity inferred from the
//!    signature. `(f,)` is the same shape spelled as a 1-tuple.
//! 2. **Ordered tuple** — the remaining elements are a context and/or an
//!    explicit arity, in either order:
//!    - `(f, 3)` — explicit arity, inherited binding
//!    - `(f, ctx)` — bound receiver, inferred arity
//!    - `(f, ctx, 3)` and `(f, 3, ctx)` — identical results
//!    Explicit-arity forms pair with batch-taking callbacks
//!    ([`VariadicCallback`]), since a fixed signature cannot honor a
//!    differing count.
//! 3. **Record** — [`StageSpec`] with optional `context`/`arity` overrides.
//!
//! Every conversion is a pure transform; the only failure is an explicit
//! arity of zero, reported as a [`ConfigError`].

use std::marker::PhantomData;

use crate::callback::{StageCallback, VariadicCallback};
use crate::errors::ConfigError;
use crate::stage::{Binding, Stage, StageSpec};

/// Marker types distinguishing the accepted input shapes.
///
/// Never constructed; inferred at the call site.
pub mod shape {
    use super::PhantomData;

    /// A bare fixed-signature callable.
    pub struct Bare<M>(PhantomData<M>);
    /// `(f,)`.
    pub struct Solo<M>(PhantomData<M>);
    /// `(f, arity)`.
    pub struct WithArity<M>(PhantomData<M>);
    /// `(f, context)`.
    pub struct WithContext<M>(PhantomData<M>);
    /// `(f, context, arity)`.
    pub struct ContextThenArity<M>(PhantomData<M>);
    /// `(f, arity, context)`.
    pub struct ArityThenContext<M>(PhantomData<M>);
    /// A [`StageSpec`](crate::stage::StageSpec) record.
    pub struct Record(());
    /// An already-normalized [`Stage`](crate::stage::Stage).
    pub struct Canonical(());
}

/// Conversion from one raw input shape into the canonical [`Stage`].
pub trait IntoStage<V, M> {
    /// Normalize this input, failing with a [`ConfigError`] for an explicit
    /// arity that is not a positive integer.
    fn into_stage(self) -> Result<Stage<V>, ConfigError>;
}

fn positive(arity: usize) -> Result<usize, ConfigError> {
    if arity == 0 {
        Err(ConfigError::invalid_arity(arity))
    } else {
        Ok(arity)
    }
}

// ─── Shape 1: bare callable ─────────────────────────────────────────────────

impl<V, F, M> IntoStage<V, shape::Bare<M>> for F
where
    F: StageCallback<V, M>,
{
    fn into_stage(self) -> Result<Stage<V>, ConfigError> {
        Ok(Stage::from_fn(self))
    }
}

impl<V, F, M> IntoStage<V, shape::Solo<M>> for (F,)
where
    F: StageCallback<V, M>,
{
    fn into_stage(self) -> Result<Stage<V>, ConfigError> {
        Ok(Stage::from_fn(self.0))
    }
}

// ─── Shape 2: ordered tuples ────────────────────────────────────────────────

impl<V, F, M> IntoStage<V, shape::WithArity<M>> for (F, usize)
where
    F: VariadicCallback<V, M>,
{
    fn into_stage(self) -> Result<Stage<V>, ConfigError> {
        let (f, arity) = self;
        Ok(Stage {
            callback: f.into_boxed(),
            binding: Binding::Inherit,
            arity: positive(arity)?,
        })
    }
}

impl<V, F, M> IntoStage<V, shape::WithContext<M>> for (F, V)
where
    F: StageCallback<V, M>,
{
    fn into_stage(self) -> Result<Stage<V>, ConfigError> {
        let (f, context) = self;
        let arity = f.arity();
        Ok(Stage {
            callback: f.into_boxed(),
            binding: Binding::Set(context),
            arity,
        })
    }
}

impl<V, F, M> IntoStage<V, shape::ContextThenArity<M>> for (F, V, usize)
where
    F: VariadicCallback<V, M>,
{
    fn into_stage(self) -> Result<Stage<V>, ConfigError> {
        let (f, context, arity) = self;
        Ok(Stage {
            callback: f.into_boxed(),
            binding: Binding::Set(context),
            arity: positive(arity)?,
        })
    }
}

impl<V, F, M> IntoStage<V, shape::ArityThenContext<M>> for (F, usize, V)
where
    F: VariadicCallback<V, M>,
{
    fn into_stage(self) -> Result<Stage<V>, ConfigError> {
        let (f, arity, context) = self;
        Ok(Stage {
            callback: f.into_boxed(),
            binding: Binding::Set(context),
            arity: positive(arity)?,
        })
    }
}

// ─── Shape 3: record ────────────────────────────────────────────────────────

impl<V> IntoStage<V, shape::Record> for StageSpec<V> {
    fn into_stage(self) -> Result<Stage<V>, ConfigError> {
        let arity = match self.arity {
            Some(n) => positive(n)?,
            None => self.declared,
        };
        let binding = match self.context {
            Some(v) => Binding::Set(v),
            None => Binding::Inherit,
        };
        Ok(Stage {
            callback: self.callback,
            binding,
            arity,
        })
    }
}

// ─── Already canonical ──────────────────────────────────────────────────────

impl<V> IntoStage<V, shape::Canonical> for Stage<V> {
    fn into_stage(self) -> Result<Stage<V>, ConfigError> {
        Ok(self)
    }
}
