//! Process-wide catalog of scenario templates.
//!
//! `ScenarioRegistry` maps scenario names to registered templates and owns
//! the default configuration tree that every instantiation starts from.
//! Registration is an append-only, start-up-time action; once the test
//! process begins executing cases the registry is effectively read-only, so
//! suites sharing one registry across worker threads need no locking.

use std::sync::Arc;

use dashmap::{DashMap, mapref::entry::Entry};
use tracing::debug;

use crate::{
    compose,
    config::ConfigTree,
    context::Bindings,
    error::{ComposeError, RegistryError},
    plan::ExecutionPlan,
    template::ScenarioTemplate,
};

/// Catalog mapping scenario name to [`ScenarioTemplate`], generic over the
/// subject type `S` the templates act on.
///
/// # Examples
///
/// ```
/// use specframe::{ConfigTree, ScenarioRegistry};
///
/// let registry: ScenarioRegistry<()> =
///     ScenarioRegistry::with_defaults(ConfigTree::new().set("create.success_status", 201));
/// assert!(registry.lookup("anything").is_err());
/// ```
pub struct ScenarioRegistry<S> {
    templates: DashMap<String, Arc<ScenarioTemplate<S>>>,
    defaults: ConfigTree,
}

impl<S> Default for ScenarioRegistry<S> {
    fn default() -> Self { Self::new() }
}

impl<S> ScenarioRegistry<S> {
    /// An empty registry with an empty default configuration tree.
    #[must_use]
    pub fn new() -> Self { Self::with_defaults(ConfigTree::new()) }

    /// An empty registry whose instantiations start from `defaults`.
    ///
    /// The default tree is fixed for the registry's lifetime; layering
    /// happens through the pure merge during composition, never by mutating
    /// the defaults.
    #[must_use]
    pub fn with_defaults(defaults: ConfigTree) -> Self {
        Self {
            templates: DashMap::new(),
            defaults,
        }
    }

    /// Register a template under its name.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::DuplicateScenario`] when the name is already
    /// taken. Use [`replace`](Self::replace) when reloading definitions.
    pub fn register(&self, template: ScenarioTemplate<S>) -> Result<(), RegistryError> {
        match self.templates.entry(template.name().to_owned()) {
            Entry::Occupied(entry) => Err(RegistryError::DuplicateScenario {
                name: entry.key().clone(),
            }),
            Entry::Vacant(entry) => {
                debug!(scenario = %entry.key(), "registered scenario");
                entry.insert(Arc::new(template));
                Ok(())
            }
        }
    }

    /// Register a template, replacing any prior entry under the same name.
    ///
    /// The one documented exception to append-only registration, intended
    /// for reloading definitions.
    pub fn replace(&self, template: ScenarioTemplate<S>) {
        debug!(scenario = %template.name(), "replaced scenario");
        self.templates
            .insert(template.name().to_owned(), Arc::new(template));
    }

    /// Look a template up by name.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::UnknownScenario`] when absent.
    pub fn lookup(&self, name: &str) -> Result<Arc<ScenarioTemplate<S>>, RegistryError> {
        self.templates
            .get(name)
            .map(|entry| Arc::clone(entry.value()))
            .ok_or_else(|| RegistryError::UnknownScenario {
                name: name.to_owned(),
            })
    }

    /// The registry's default configuration tree.
    #[must_use]
    pub fn defaults(&self) -> &ConfigTree { &self.defaults }

    /// Expand the named template and everything it includes into a runnable
    /// [`ExecutionPlan`].
    ///
    /// `parameters` becomes the scenario's root context frame; `overrides`,
    /// when supplied, is merged over the template's own overrides (and over
    /// those of every included template) with override-wins semantics.
    ///
    /// # Errors
    ///
    /// Returns [`ComposeError`] on an unknown scenario name, a cyclic
    /// inclusion, or a configuration leaf that fails to resolve. All are
    /// surfaced before any setup step runs.
    pub fn instantiate(
        &self,
        name: &str,
        parameters: Bindings,
        overrides: Option<ConfigTree>,
    ) -> Result<ExecutionPlan<S>, ComposeError> {
        compose::compose(self, name, parameters, overrides)
    }
}

#[cfg(test)]
mod tests {
    use super::ScenarioRegistry;
    use crate::{Outcome, ScenarioTemplate, error::RegistryError};

    fn trivial(name: &str) -> ScenarioTemplate<()> {
        ScenarioTemplate::new(name).assertion("holds", |_, _, _| Ok(Outcome::Pass))
    }

    #[test]
    fn duplicate_registration_is_rejected() {
        let registry = ScenarioRegistry::new();
        registry.register(trivial("taken")).unwrap();
        assert_eq!(
            registry.register(trivial("taken")),
            Err(RegistryError::DuplicateScenario {
                name: "taken".to_owned()
            })
        );
    }

    #[test]
    fn replace_swaps_the_prior_entry() {
        let registry = ScenarioRegistry::new();
        registry.register(trivial("reloaded")).unwrap();
        registry.replace(
            ScenarioTemplate::new("reloaded").assertion("still holds", |_, _, _| Ok(Outcome::Pass)),
        );
        let template = registry.lookup("reloaded").unwrap();
        assert_eq!(template.name(), "reloaded");
    }

    #[test]
    fn unknown_lookup_fails() {
        let registry: ScenarioRegistry<()> = ScenarioRegistry::new();
        assert_eq!(
            registry.lookup("ghost").unwrap_err(),
            RegistryError::UnknownScenario {
                name: "ghost".to_owned()
            }
        );
    }
}
