//! Deferred, context-dependent values.
//!
//! A [`LazyValue`] is either a literal or a computation over the current
//! [`Context`](crate::context::Context), evaluated on demand. Memoized values
//! cache their first result per (value, context) pair for the lifetime of a
//! plan run; the cache lives in the run's [`Resolver`].

use std::{
    cell::RefCell,
    collections::HashMap,
    fmt,
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
};

use serde_json::Value;

use crate::{
    context::{Context, Scope},
    error::ResolveError,
};

static NEXT_LAZY_ID: AtomicU64 = AtomicU64::new(0);

type ComputeFn = Arc<dyn Fn(&Scope<'_>) -> Result<Value, ResolveError> + Send + Sync>;

/// A deferred value: a literal, or a computation over the current context.
///
/// Evaluating a lazy value may read bindings but never writes them. Literals
/// resolve to themselves with no failure mode; computed values fail with
/// [`ResolveError::Unbound`] when they dereference a missing binding.
///
/// # Examples
///
/// ```
/// use specframe::{Bindings, Context, LazyValue, Resolver};
///
/// let context = Context::root().push(Bindings::new().bind("status", 200));
/// let resolver = Resolver::new();
/// let scope = resolver.scope(&context);
///
/// let lazy = LazyValue::computed(|scope| scope.get("status"));
/// assert_eq!(lazy.resolve(&scope).unwrap(), 200);
/// ```
#[derive(Clone)]
pub struct LazyValue {
    id: u64,
    kind: LazyKind,
}

#[derive(Clone)]
enum LazyKind {
    Literal(Value),
    Computed { compute: ComputeFn, memoized: bool },
    Captured { value: Arc<LazyValue>, context: Context },
}

impl LazyValue {
    fn next_id() -> u64 { NEXT_LAZY_ID.fetch_add(1, Ordering::Relaxed) }

    fn from_kind(kind: LazyKind) -> Self {
        Self {
            id: Self::next_id(),
            kind,
        }
    }

    /// A literal value, independent of any context.
    #[must_use]
    pub fn literal(value: impl Into<Value>) -> Self {
        Self::from_kind(LazyKind::Literal(value.into()))
    }

    /// A computation over the scope in force when the value is resolved.
    #[must_use]
    pub fn computed<F>(compute: F) -> Self
    where
        F: Fn(&Scope<'_>) -> Result<Value, ResolveError> + Send + Sync + 'static,
    {
        Self::from_kind(LazyKind::Computed {
            compute: Arc::new(compute),
            memoized: false,
        })
    }

    /// Like [`computed`](Self::computed), but the first result per context is
    /// cached for the remainder of the plan run.
    #[must_use]
    pub fn memoized<F>(compute: F) -> Self
    where
        F: Fn(&Scope<'_>) -> Result<Value, ResolveError> + Send + Sync + 'static,
    {
        Self::from_kind(LazyKind::Computed {
            compute: Arc::new(compute),
            memoized: true,
        })
    }

    /// Fix this value to always evaluate against `context`, regardless of the
    /// scope it is later resolved in.
    ///
    /// Inclusion arguments are captured this way so that a scenario
    /// parameterizes the scenarios it includes with its own bindings.
    #[must_use]
    pub(crate) fn captured(&self, context: Context) -> Self {
        Self::from_kind(LazyKind::Captured {
            value: Arc::new(self.clone()),
            context,
        })
    }

    /// Evaluate the value within `scope`.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError::Unbound`] when a computed value dereferences a
    /// binding absent from the scope's context.
    pub fn resolve(&self, scope: &Scope<'_>) -> Result<Value, ResolveError> {
        match &self.kind {
            LazyKind::Literal(value) => Ok(value.clone()),
            LazyKind::Computed { compute, memoized } => {
                if *memoized {
                    scope
                        .resolver()
                        .memoize(self.id, scope.context().id(), || compute(scope))
                } else {
                    compute(scope)
                }
            }
            LazyKind::Captured { value, context } => {
                let captured = Scope::new(context, scope.resolver());
                value.resolve(&captured)
            }
        }
    }
}

impl fmt::Debug for LazyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            LazyKind::Literal(value) => write!(f, "LazyValue::Literal({value})"),
            LazyKind::Computed { memoized: true, .. } => write!(f, "LazyValue::Memoized(..)"),
            LazyKind::Computed { .. } => write!(f, "LazyValue::Computed(..)"),
            LazyKind::Captured { value, .. } => write!(f, "LazyValue::Captured({value:?})"),
        }
    }
}

/// Evaluation state for one plan run: the memoization cache keyed by
/// (lazy value identity, context identity).
///
/// One resolver is created per composition and per plan run, so a memoized
/// value is evaluated at most once per context within a run and never shares
/// results across runs.
#[derive(Default)]
pub struct Resolver {
    memo: RefCell<HashMap<(u64, u64), Value>>,
}

impl Resolver {
    /// Create an empty resolver.
    #[must_use]
    pub fn new() -> Self { Self::default() }

    /// Couple `context` with this resolver for lookups and resolution.
    #[must_use]
    pub fn scope<'a>(&'a self, context: &'a Context) -> Scope<'a> { Scope::new(context, self) }

    fn memoize(
        &self,
        value_id: u64,
        context_id: u64,
        compute: impl FnOnce() -> Result<Value, ResolveError>,
    ) -> Result<Value, ResolveError> {
        let key = (value_id, context_id);
        let cached = self.memo.borrow().get(&key).cloned();
        if let Some(value) = cached {
            return Ok(value);
        }
        let value = compute()?;
        self.memo.borrow_mut().insert(key, value.clone());
        Ok(value)
    }
}
