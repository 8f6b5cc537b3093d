//! Callable stage bodies and their statically known parameter counts.
//!
//! A stage body is anything the engine can invoke with a receiver binding and
//! a batch of queue values. Two families exist:
//!
//! - [`StageCallback`] — fixed-signature callables whose arity is read off
//!   the signature itself: `Fn(V, ..) -> V` for context-free bodies and
//!   `Fn(Option<&V>, V, ..) -> V` for bodies that observe the resolved
//!   receiver. Arities 0 through 4 are implemented.
//! - [`VariadicCallback`] — callables taking the whole argument batch as a
//!   `Vec<V>`. These carry no inherent arity and must be paired with an
//!   explicit count (see the `(callback, arity)` input shapes and
//!   [`StageSpec::taking`](crate::stage::StageSpec::taking)).
//!
//! Both traits carry a marker type parameter so the per-signature
//! implementations stay coherent; the marker is inferred at the call site and
//! never named by users.

use std::marker::PhantomData;

/// The erased form every stage body normalizes to: receiver binding in,
/// argument batch in, single result out.
pub type BoxedCallback<V> = Box<dyn Fn(Option<&V>, Vec<V>) -> V + Send + Sync>;

// ─── Markers ────────────────────────────────────────────────────────────────

/// Marker for context-free fixed-arity callables.
pub struct Plain<A>(PhantomData<A>);

/// Marker for receiver-aware fixed-arity callables.
pub struct Contextual<A>(PhantomData<A>);

/// Marker for context-free batch-taking callables.
pub struct Variadic(());

/// Marker for receiver-aware batch-taking callables.
pub struct ContextualVariadic(());

// ─── Fixed-arity callables ──────────────────────────────────────────────────

/// A stage body whose parameter count is declared by its signature.
pub trait StageCallback<V, M> {
    /// The number of queue values this body consumes per invocation.
    fn arity(&self) -> usize;

    /// Erase the signature into the uniform boxed form.
    fn into_boxed(self) -> BoxedCallback<V>;
}

impl<V, F> StageCallback<V, Plain<()>> for F
where
    V: 'static,
    F: Fn() -> V + Send + Sync + 'static,
{
    fn arity(&self) -> usize {
        0
    }

    fn into_boxed(self) -> BoxedCallback<V> {
        Box::new(move |_this, _args| self())
    }
}

impl<V, F> StageCallback<V, Contextual<()>> for F
where
    V: 'static,
    F: Fn(Option<&V>) -> V + Send + Sync + 'static,
{
    fn arity(&self) -> usize {
        0
    }

    fn into_boxed(self) -> BoxedCallback<V> {
        Box::new(move |this, _args| self(this))
    }
}

macro_rules! subst_v {
    ($x:ident) => {
        V
    };
}

/// Generate [`StageCallback`] impls for each positive fixed arity, in both
/// the context-free and receiver-aware flavors.
macro_rules! fixed_callbacks {
    ($($n:literal => ($($arg:ident),+)),+ $(,)?) => {$(
        impl<V, F> StageCallback<V, Plain<($(subst_v!($arg),)+)>> for F
        where
            V: 'static,
            F: Fn($(subst_v!($arg)),+) -> V + Send + Sync + 'static,
        {
            fn arity(&self) -> usize {
                $n
            }

            fn into_boxed(self) -> BoxedCallback<V> {
                Box::new(move |_this, args: Vec<V>| {
                    let mut args = args.into_iter();
                    $(let $arg = args.next().expect("queue length checked before dispatch");)+
                    self($($arg),+)
                })
            }
        }

        impl<V, F> StageCallback<V, Contextual<($(subst_v!($arg),)+)>> for F
        where
            V: 'static,
            F: Fn(Option<&V>, $(subst_v!($arg)),+) -> V + Send + Sync + 'static,
        {
            fn arity(&self) -> usize {
                $n
            }

            fn into_boxed(self) -> BoxedCallback<V> {
                Box::new(move |this, args: Vec<V>| {
                    let mut args = args.into_iter();
                    $(let $arg = args.next().expect("queue length checked before dispatch");)+
                    self(this, $($arg),+)
                })
            }
        }
    )+};
}

fixed_callbacks! {
    1 => (a),
    2 => (a, b),
    3 => (a, b, c),
    4 => (a, b, c, d),
}

// ─── Batch-taking callables ─────────────────────────────────────────────────

/// A stage body that accepts its whole argument batch as one `Vec`.
///
/// Carries no inherent arity: pair it with an explicit count via the
/// `(callback, arity)` input shapes or `StageSpec::taking`.
pub trait VariadicCallback<V, M> {
    /// Erase the signature into the uniform boxed form.
    fn into_boxed(self) -> BoxedCallback<V>;
}

impl<V, F> VariadicCallback<V, Variadic> for F
where
    V: 'static,
    F: Fn(Vec<V>) -> V + Send + Sync + 'static,
{
    fn into_boxed(self) -> BoxedCallback<V> {
        Box::new(move |_this, args| self(args))
    }
}

impl<V, F> VariadicCallback<V, ContextualVariadic> for F
where
    V: 'static,
    F: Fn(Option<&V>, Vec<V>) -> V + Send + Sync + 'static,
{
    fn into_boxed(self) -> BoxedCallback<V> {
        Box::new(move |this, args| self(this, args))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn arity_of<V, M>(f: impl StageCallback<V, M>) -> usize {
        f.arity()
    }

    #[test]
    fn test_arity_read_from_signature() {
        assert_eq!(arity_of::<i64, _>(|| 7), 0);
        assert_eq!(arity_of(|x: i64| x), 1);
        assert_eq!(arity_of(|x: i64, y: i64| x + y), 2);
        assert_eq!(arity_of(|x: i64, y: i64, z: i64| x + y + z), 3);
        assert_eq!(arity_of(|a: i64, b: i64, c: i64, d: i64| a + b + c + d), 4);
    }

    #[test]
    fn test_contextual_arity_excludes_receiver() {
        assert_eq!(arity_of(|_this: Option<&i64>, x: i64| x), 1);
        assert_eq!(arity_of(|_this: Option<&i64>, x: i64, y: i64| x * y), 2);
    }

    #[test]
    fn test_boxed_plain_ignores_receiver() {
        let f = StageCallback::<i64, _>::into_boxed(|x: i64, y: i64| x - y);
        assert_eq!(f(Some(&99), vec![10, 3]), 7);
        assert_eq!(f(None, vec![5, 5]), 0);
    }

    #[test]
    fn test_boxed_contextual_sees_receiver() {
        let f = StageCallback::<i64, _>::into_boxed(|this: Option<&i64>, x: i64| {
            this.copied().unwrap_or(0) + x
        });
        assert_eq!(f(Some(&100), vec![5]), 105);
        assert_eq!(f(None, vec![5]), 5);
    }

    #[test]
    fn test_boxed_variadic_takes_whole_batch() {
        let f = VariadicCallback::<i64, _>::into_boxed(|args: Vec<i64>| args.iter().sum());
        assert_eq!(f(None, vec![1, 2, 3, 4]), 10);
    }

    #[test]
    fn test_boxed_contextual_variadic() {
        let f = VariadicCallback::<i64, _>::into_boxed(|this: Option<&i64>, args: Vec<i64>| {
            this.copied().unwrap_or(1) * args.len() as i64
        });
        assert_eq!(f(Some(&3), vec![0, 0]), 6);
    }

    #[test]
    fn test_boxed_zero_arity() {
        let f = StageCallback::<String, _>::into_boxed(|| "seed".to_string());
        assert_eq!(f(None, Vec::new()), "seed");
    }
}
