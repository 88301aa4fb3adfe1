//! Scenario templates: named, parameterizable test fragments.
//!
//! A [`ScenarioTemplate`] bundles declared parameters, local configuration
//! overrides, ordered setup steps, ordered assertions, and inclusions of
//! other templates. Templates are registered once and never mutated;
//! instantiation happens through the
//! [`ScenarioRegistry`](crate::registry::ScenarioRegistry).

use std::{fmt, sync::Arc};

use crate::{
    config::{ConfigTree, ResolvedConfig},
    context::{Bindings, Scope},
    error::StepError,
    runner::Outcome,
};

/// Boxed setup-step closure: runs against the subject for effect.
pub type StepFn<S> =
    Arc<dyn Fn(&mut S, &Scope<'_>, &ResolvedConfig) -> Result<(), StepError> + Send + Sync>;

/// Boxed assertion closure: evaluates a predicate over the subject's latest
/// response plus the tagged context and config.
pub type AssertFn<S> =
    Arc<dyn Fn(&mut S, &Scope<'_>, &ResolvedConfig) -> Result<Outcome, StepError> + Send + Sync>;

/// A side-effecting action run before a scenario's assertions.
pub struct SetupStep<S> {
    pub(crate) description: String,
    pub(crate) run: StepFn<S>,
}

impl<S> Clone for SetupStep<S> {
    fn clone(&self) -> Self {
        Self {
            description: self.description.clone(),
            run: Arc::clone(&self.run),
        }
    }
}

/// A named predicate producing a pass/fail/error outcome.
pub struct Assertion<S> {
    pub(crate) description: String,
    pub(crate) check: AssertFn<S>,
}

impl<S> Clone for Assertion<S> {
    fn clone(&self) -> Self {
        Self {
            description: self.description.clone(),
            check: Arc::clone(&self.check),
        }
    }
}

/// A reference to another template, with argument bindings evaluated in the
/// including scenario's context.
#[derive(Clone, Debug)]
pub struct Inclusion {
    pub(crate) scenario: String,
    pub(crate) arguments: Bindings,
}

/// A named, reusable, parameterized test fragment.
///
/// Built with a chainable API and registered into a
/// [`ScenarioRegistry`](crate::registry::ScenarioRegistry):
///
/// ```
/// use specframe::{Outcome, ScenarioRegistry, ScenarioTemplate};
///
/// let registry: ScenarioRegistry<()> = ScenarioRegistry::new();
/// registry
///     .register(
///         ScenarioTemplate::new("always passes")
///             .assertion("holds", |_subject, _scope, _config| Ok(Outcome::Pass)),
///     )
///     .expect("fresh name");
/// ```
pub struct ScenarioTemplate<S> {
    name: String,
    parameters: Vec<String>,
    overrides: ConfigTree,
    setup: Vec<SetupStep<S>>,
    assertions: Vec<Assertion<S>>,
    inclusions: Vec<Inclusion>,
}

impl<S> ScenarioTemplate<S> {
    /// Start a template with the given unique name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parameters: Vec::new(),
            overrides: ConfigTree::new(),
            setup: Vec::new(),
            assertions: Vec::new(),
            inclusions: Vec::new(),
        }
    }

    /// Declare a parameter name the template expects to find bound.
    ///
    /// Declarations are advisory: composition never checks them eagerly, and
    /// an unsupplied parameter fails only when something dereferences it.
    #[must_use]
    pub fn parameter(mut self, name: impl Into<String>) -> Self {
        self.parameters.push(name.into());
        self
    }

    /// Merge local configuration overrides into the template.
    ///
    /// Applied over the registry defaults and under any per-case override.
    #[must_use]
    pub fn config(mut self, overrides: ConfigTree) -> Self {
        self.overrides = self.overrides.merge(&overrides);
        self
    }

    /// Append a setup step, run for effect before the assertions.
    #[must_use]
    pub fn setup<F>(mut self, description: impl Into<String>, run: F) -> Self
    where
        F: Fn(&mut S, &Scope<'_>, &ResolvedConfig) -> Result<(), StepError> + Send + Sync + 'static,
    {
        self.setup.push(SetupStep {
            description: description.into(),
            run: Arc::new(run),
        });
        self
    }

    /// Append an assertion.
    #[must_use]
    pub fn assertion<F>(mut self, description: impl Into<String>, check: F) -> Self
    where
        F: Fn(&mut S, &Scope<'_>, &ResolvedConfig) -> Result<Outcome, StepError>
            + Send
            + Sync
            + 'static,
    {
        self.assertions.push(Assertion {
            description: description.into(),
            check: Arc::new(check),
        });
        self
    }

    /// Include another template by name, binding its parameters with lazy
    /// values evaluated in this scenario's context.
    #[must_use]
    pub fn include(mut self, scenario: impl Into<String>, arguments: Bindings) -> Self {
        self.inclusions.push(Inclusion {
            scenario: scenario.into(),
            arguments,
        });
        self
    }

    /// The template's unique name.
    #[must_use]
    pub fn name(&self) -> &str { &self.name }

    /// The declared parameter names, in declaration order.
    #[must_use]
    pub fn parameters(&self) -> &[String] { &self.parameters }

    pub(crate) fn overrides(&self) -> &ConfigTree { &self.overrides }

    pub(crate) fn setup_steps(&self) -> &[SetupStep<S>] { &self.setup }

    pub(crate) fn assertions(&self) -> &[Assertion<S>] { &self.assertions }

    pub(crate) fn inclusions(&self) -> &[Inclusion] { &self.inclusions }
}

impl<S> fmt::Debug for ScenarioTemplate<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScenarioTemplate")
            .field("name", &self.name)
            .field("parameters", &self.parameters)
            .field("setup", &self.setup.len())
            .field("assertions", &self.assertions.len())
            .field("inclusions", &self.inclusions.len())
            .finish()
    }
}
