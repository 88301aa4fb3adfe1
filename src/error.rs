//! Error taxonomy for scenario definition, composition, and execution.
//!
//! Each phase of the pipeline owns a small error enum:
//!
//! - [`ResolveError`]: a lazy value or assertion dereferenced a binding absent
//!   from its context. An authoring defect, never retried.
//! - [`RegistryError`]: registry misuse (duplicate or unknown scenario name),
//!   fatal at definition or instantiation time.
//! - [`ComposeError`]: structural failures detected while expanding a template
//!   into an execution plan, before any setup step runs.
//! - [`StepError`]: a setup step or subject interaction failed at run time.
//!   Fatal for the remainder of that plan only.

use thiserror::Error;

/// Failure to resolve a binding reference against a context.
#[non_exhaustive]
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ResolveError {
    /// The named binding is absent from the context and all ancestor frames.
    #[error("unbound reference `{name}`")]
    Unbound {
        /// Name of the missing binding.
        name: String,
    },
}

/// Errors raised by [`ScenarioRegistry`](crate::registry::ScenarioRegistry)
/// operations.
#[non_exhaustive]
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// A scenario with this name was already registered.
    ///
    /// Registration is append-only; use
    /// [`replace`](crate::registry::ScenarioRegistry::replace) when reloading
    /// definitions is genuinely intended.
    #[error("scenario `{name}` is already registered")]
    DuplicateScenario {
        /// Name of the colliding scenario.
        name: String,
    },

    /// No scenario with this name has been registered.
    #[error("unknown scenario `{name}`")]
    UnknownScenario {
        /// Name that failed to resolve.
        name: String,
    },
}

/// Errors raised while composing a template into an execution plan.
///
/// Composition failures surface before any side-effecting setup step runs, so
/// a malformed scenario graph never partially executes.
#[non_exhaustive]
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ComposeError {
    /// A registry lookup failed during expansion.
    #[error(transparent)]
    Registry(#[from] RegistryError),

    /// A template (transitively) includes itself.
    #[error("cyclic inclusion: {chain}")]
    CyclicInclusion {
        /// The inclusion chain that closed the cycle, e.g. `a -> b -> a`.
        chain: String,
    },

    /// A configuration leaf failed to resolve against the scenario's context.
    #[error(transparent)]
    Resolve(#[from] ResolveError),
}

/// Run-time failure inside a setup step, assertion, or subject interaction.
#[non_exhaustive]
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StepError {
    /// The step reported a failure with a message.
    #[error("{message}")]
    Failed {
        /// Human-readable cause.
        message: String,
    },

    /// The step dereferenced a binding absent from its context.
    #[error(transparent)]
    Resolve(#[from] ResolveError),
}

impl StepError {
    /// Construct a failure from a message.
    #[must_use]
    pub fn failed(message: impl Into<String>) -> Self {
        Self::Failed {
            message: message.into(),
        }
    }
}
