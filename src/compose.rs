//! Depth-first expansion of templates into execution plans.
//!
//! The composer walks the inclusion graph pre-order: each included
//! scenario's sub-plan lands before the including scenario's own setup steps
//! and assertions, in inclusion order. Inclusion arguments are captured with
//! the including scenario's context, so a scenario parameterizes the
//! scenarios it includes lexically. Cycles are detected eagerly, before any
//! side-effecting step could run.

use tracing::debug;

use crate::{
    config::ConfigTree,
    context::{Bindings, Context},
    error::ComposeError,
    lazy::Resolver,
    plan::{ExecutionPlan, PlanAction, PlanEntry},
    registry::ScenarioRegistry,
    template::ScenarioTemplate,
};

pub(crate) fn compose<S>(
    registry: &ScenarioRegistry<S>,
    name: &str,
    parameters: Bindings,
    overrides: Option<ConfigTree>,
) -> Result<ExecutionPlan<S>, ComposeError> {
    let template = registry.lookup(name)?;
    let context = Context::root().push(parameters);
    let resolver = Resolver::new();
    let mut in_progress = Vec::new();
    let mut entries = Vec::new();
    expand(
        registry,
        &template,
        context,
        overrides.as_ref(),
        &resolver,
        &mut in_progress,
        &mut entries,
    )?;
    debug!(scenario = %name, entries = entries.len(), "composed execution plan");
    Ok(ExecutionPlan::new(entries))
}

fn expand<S>(
    registry: &ScenarioRegistry<S>,
    template: &ScenarioTemplate<S>,
    context: Context,
    overrides: Option<&ConfigTree>,
    resolver: &Resolver,
    in_progress: &mut Vec<String>,
    entries: &mut Vec<PlanEntry<S>>,
) -> Result<(), ComposeError> {
    let name = template.name();
    if in_progress.iter().any(|seen| seen == name) {
        let chain = in_progress
            .iter()
            .map(String::as_str)
            .chain([name])
            .collect::<Vec<_>>()
            .join(" -> ");
        return Err(ComposeError::CyclicInclusion { chain });
    }
    in_progress.push(name.to_owned());
    debug!(scenario = %name, depth = in_progress.len(), "expanding scenario");

    for parameter in template.parameters() {
        if !context.has(parameter) {
            debug!(
                scenario = %name,
                parameter = %parameter,
                "declared parameter is unbound; dereferences will fail lazily"
            );
        }
    }

    let mut config = registry.defaults().merge(template.overrides());
    if let Some(overrides) = overrides {
        config = config.merge(overrides);
    }
    let resolved = config.resolve(&resolver.scope(&context))?;

    for inclusion in template.inclusions() {
        let included = registry.lookup(&inclusion.scenario)?;
        let mut arguments = Bindings::new();
        for (argument, value) in inclusion.arguments.iter() {
            arguments = arguments.bind_lazy(argument.clone(), value.captured(context.clone()));
        }
        let child = context.push(arguments);
        expand(
            registry,
            &included,
            child,
            overrides,
            resolver,
            in_progress,
            entries,
        )?;
    }

    for step in template.setup_steps() {
        entries.push(PlanEntry {
            scenario: name.to_owned(),
            context: context.clone(),
            config: resolved.clone(),
            action: PlanAction::Setup(step.clone()),
        });
    }
    for assertion in template.assertions() {
        entries.push(PlanEntry {
            scenario: name.to_owned(),
            context: context.clone(),
            config: resolved.clone(),
            action: PlanAction::Assertion(assertion.clone()),
        });
    }

    in_progress.pop();
    Ok(())
}
