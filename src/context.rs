//! Ordered, shadow-aware binding chains.
//!
//! A [`Context`] is an immutable chain of binding frames. Lookups walk from
//! the innermost frame outward and the first match wins, so a child rebinding
//! a name shadows the parent without affecting it. "Adding a binding" always
//! yields a new child context; contexts only grow along the include chain and
//! are exclusively owned by the scenario instantiation that created them.

use std::{
    collections::BTreeMap,
    fmt,
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
};

use serde_json::Value;

use crate::{
    error::ResolveError,
    lazy::{LazyValue, Resolver},
};

static NEXT_CONTEXT_ID: AtomicU64 = AtomicU64::new(0);

/// An ordered set of named bindings forming one context frame.
///
/// # Examples
///
/// ```
/// use specframe::Bindings;
///
/// let bindings = Bindings::new().bind("status", 201).bind("format", "json");
/// assert!(!bindings.is_empty());
/// ```
#[derive(Clone, Debug, Default)]
pub struct Bindings(BTreeMap<String, LazyValue>);

impl Bindings {
    /// An empty frame.
    #[must_use]
    pub fn new() -> Self { Self::default() }

    /// Bind `name` to a literal value.
    #[must_use]
    pub fn bind(self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.bind_lazy(name, LazyValue::literal(value))
    }

    /// Bind `name` to a lazy value.
    #[must_use]
    pub fn bind_lazy(mut self, name: impl Into<String>, value: LazyValue) -> Self {
        self.0.insert(name.into(), value);
        self
    }

    /// Whether the frame binds no names.
    #[must_use]
    pub fn is_empty(&self) -> bool { self.0.is_empty() }

    pub(crate) fn iter(&self) -> impl Iterator<Item = (&String, &LazyValue)> { self.0.iter() }
}

struct Inner {
    id: u64,
    frame: BTreeMap<String, LazyValue>,
    parent: Option<Context>,
}

/// An immutable chain of binding frames with innermost-first lookup.
///
/// # Examples
///
/// ```
/// use specframe::{Bindings, Context};
///
/// let c1 = Context::root().push(Bindings::new().bind("x", 1));
/// let c2 = c1.push(Bindings::new().bind("x", 2));
/// assert!(c2.has("x"));
/// // Child rebinding never affects the parent; see `lookup`.
/// ```
#[derive(Clone)]
pub struct Context {
    inner: Arc<Inner>,
}

impl Context {
    fn from_frame(frame: BTreeMap<String, LazyValue>, parent: Option<Context>) -> Self {
        Self {
            inner: Arc::new(Inner {
                id: NEXT_CONTEXT_ID.fetch_add(1, Ordering::Relaxed),
                frame,
                parent,
            }),
        }
    }

    /// The empty root context.
    #[must_use]
    pub fn root() -> Self { Self::from_frame(BTreeMap::new(), None) }

    /// Return a child context with one additional frame.
    ///
    /// Bindings of the same name in ancestor frames become shadowed; the
    /// shadowing is total and one-directional.
    #[must_use]
    pub fn push(&self, bindings: Bindings) -> Self {
        Self::from_frame(bindings.0, Some(self.clone()))
    }

    /// Find the lazy value bound to `name`, innermost frame first.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError::Unbound`] when no frame binds `name`.
    pub fn lookup(&self, name: &str) -> Result<&LazyValue, ResolveError> {
        let mut current = Some(self);
        while let Some(context) = current {
            if let Some(value) = context.inner.frame.get(name) {
                return Ok(value);
            }
            current = context.inner.parent.as_ref();
        }
        Err(ResolveError::Unbound {
            name: name.to_owned(),
        })
    }

    /// Non-failing existence probe, used by optional-parameter logic.
    #[must_use]
    pub fn has(&self, name: &str) -> bool { self.lookup(name).is_ok() }

    pub(crate) fn id(&self) -> u64 { self.inner.id }

    fn binding_names(&self) -> Vec<&str> {
        let mut names = Vec::new();
        let mut current = Some(self);
        while let Some(context) = current {
            names.extend(context.inner.frame.keys().map(String::as_str));
            current = context.inner.parent.as_ref();
        }
        names
    }
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context")
            .field("id", &self.inner.id)
            .field("bindings", &self.binding_names())
            .finish()
    }
}

/// A [`Context`] coupled with the current run's [`Resolver`].
///
/// Setup steps, assertions, and computed lazy values all receive a scope:
/// [`get`](Self::get) looks a binding up and resolves it, [`has`](Self::has)
/// probes without failing.
pub struct Scope<'a> {
    context: &'a Context,
    resolver: &'a Resolver,
}

impl<'a> Scope<'a> {
    pub(crate) fn new(context: &'a Context, resolver: &'a Resolver) -> Self {
        Self { context, resolver }
    }

    /// Look up `name` and resolve the bound lazy value.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError::Unbound`] when `name` is absent from the
    /// context, or when the bound value itself dereferences a missing binding.
    pub fn get(&self, name: &str) -> Result<Value, ResolveError> {
        self.context.lookup(name)?.resolve(self)
    }

    /// Non-failing existence probe.
    #[must_use]
    pub fn has(&self, name: &str) -> bool { self.context.has(name) }

    /// The underlying context.
    #[must_use]
    pub fn context(&self) -> &Context { self.context }

    pub(crate) fn resolver(&self) -> &'a Resolver { self.resolver }
}
