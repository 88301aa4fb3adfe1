//! Flattened execution plans.
//!
//! Composition turns a template and everything it includes into an ordered
//! list of [`PlanEntry`] values, each tagged with the owning scenario's
//! resolved [`Context`] and [`ResolvedConfig`]. A plan is exclusively owned
//! by the runner invocation that built it and discarded after execution.

use std::fmt;

use crate::{
    config::ResolvedConfig,
    context::Context,
    template::{Assertion, SetupStep},
};

pub(crate) enum PlanAction<S> {
    Setup(SetupStep<S>),
    Assertion(Assertion<S>),
}

/// One step of an execution plan: a setup step or an assertion, tagged with
/// the context and config of the scenario that contributed it.
pub struct PlanEntry<S> {
    pub(crate) scenario: String,
    pub(crate) context: Context,
    pub(crate) config: ResolvedConfig,
    pub(crate) action: PlanAction<S>,
}

impl<S> PlanEntry<S> {
    /// Name of the scenario this entry belongs to.
    #[must_use]
    pub fn scenario(&self) -> &str { &self.scenario }

    /// The step or assertion description.
    #[must_use]
    pub fn description(&self) -> &str {
        match &self.action {
            PlanAction::Setup(step) => &step.description,
            PlanAction::Assertion(assertion) => &assertion.description,
        }
    }

    /// Whether this entry is an assertion rather than a setup step.
    #[must_use]
    pub fn is_assertion(&self) -> bool { matches!(self.action, PlanAction::Assertion(_)) }

    /// The resolved configuration tagged onto this entry.
    #[must_use]
    pub fn config(&self) -> &ResolvedConfig { &self.config }
}

impl<S> fmt::Debug for PlanEntry<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlanEntry")
            .field("scenario", &self.scenario)
            .field("description", &self.description())
            .field("assertion", &self.is_assertion())
            .finish()
    }
}

/// The ordered, flattened product of composing a scenario template.
pub struct ExecutionPlan<S> {
    pub(crate) entries: Vec<PlanEntry<S>>,
}

impl<S> ExecutionPlan<S> {
    pub(crate) fn new(entries: Vec<PlanEntry<S>>) -> Self { Self { entries } }

    /// Number of steps and assertions in the plan.
    #[must_use]
    pub fn len(&self) -> usize { self.entries.len() }

    /// Whether the plan contains no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool { self.entries.is_empty() }

    /// Iterate over the plan's entries in execution order.
    pub fn entries(&self) -> impl Iterator<Item = &PlanEntry<S>> { self.entries.iter() }
}

impl<S> fmt::Debug for ExecutionPlan<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.entries.iter()).finish()
    }
}
