//! Plan execution and outcome reporting.
//!
//! The runner walks an [`ExecutionPlan`] sequentially. Setup steps run for
//! effect; a failing step aborts the remainder of the plan, since later
//! assertions assume its effects. Assertion failures never abort: every
//! remaining assertion still executes, so a single report surfaces every
//! independent failure rather than stopping at the first.

use serde::Serialize;
use tracing::{trace, warn};

use crate::{
    lazy::Resolver,
    plan::{ExecutionPlan, PlanAction, PlanEntry},
};

/// Result of evaluating one assertion (or of a failing setup step).
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub enum Outcome {
    /// The predicate held.
    Pass,
    /// The predicate did not hold.
    Fail(String),
    /// The predicate could not be evaluated, e.g. an unbound reference.
    Error(String),
}

impl Outcome {
    /// Whether this outcome is a pass.
    #[must_use]
    pub fn is_pass(&self) -> bool { matches!(self, Self::Pass) }

    /// Construct a failure outcome from a message.
    #[must_use]
    pub fn fail(message: impl Into<String>) -> Self { Self::Fail(message.into()) }
}

/// One line of a report: which scenario, which step, what happened.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ReportEntry {
    /// Name of the scenario that contributed the step.
    pub scenario: String,
    /// The step or assertion description.
    pub description: String,
    /// What happened.
    pub outcome: Outcome,
}

/// Ordered outcomes of one plan run.
#[derive(Clone, Debug, Default, Serialize)]
pub struct Report {
    entries: Vec<ReportEntry>,
    aborted: bool,
}

impl Report {
    /// The recorded outcomes, in execution order.
    #[must_use]
    pub fn entries(&self) -> &[ReportEntry] { &self.entries }

    /// Iterate over the recorded outcomes alone.
    pub fn outcomes(&self) -> impl Iterator<Item = &Outcome> {
        self.entries.iter().map(|entry| &entry.outcome)
    }

    /// Whether a setup-step failure cut the run short.
    #[must_use]
    pub fn is_aborted(&self) -> bool { self.aborted }

    /// Whether the run completed with every assertion passing.
    #[must_use]
    pub fn passed(&self) -> bool {
        !self.aborted && self.entries.iter().all(|entry| entry.outcome.is_pass())
    }

    fn record<S>(&mut self, entry: &PlanEntry<S>, outcome: Outcome) {
        self.entries.push(ReportEntry {
            scenario: entry.scenario.clone(),
            description: entry.description().to_owned(),
            outcome,
        });
    }
}

impl<S> ExecutionPlan<S> {
    /// Execute the plan against `subject`, producing a report.
    ///
    /// A fresh memoization cache is created for the run, so memoized lazy
    /// values are evaluated at most once per context within it.
    pub fn run(&self, subject: &mut S) -> Report {
        let resolver = Resolver::new();
        let mut report = Report::default();
        for entry in &self.entries {
            let scope = resolver.scope(&entry.context);
            match &entry.action {
                PlanAction::Setup(step) => {
                    trace!(scenario = %entry.scenario, step = %step.description, "running setup step");
                    if let Err(error) = (step.run)(subject, &scope, &entry.config) {
                        warn!(
                            scenario = %entry.scenario,
                            step = %step.description,
                            %error,
                            "setup step failed; aborting plan"
                        );
                        report.record(entry, Outcome::Error(error.to_string()));
                        report.aborted = true;
                        break;
                    }
                }
                PlanAction::Assertion(assertion) => {
                    let outcome = match (assertion.check)(subject, &scope, &entry.config) {
                        Ok(outcome) => outcome,
                        Err(error) => Outcome::Error(error.to_string()),
                    };
                    match &outcome {
                        Outcome::Pass => {
                            trace!(scenario = %entry.scenario, assertion = %assertion.description, "pass");
                        }
                        Outcome::Fail(message) => {
                            warn!(
                                scenario = %entry.scenario,
                                assertion = %assertion.description,
                                %message,
                                "fail"
                            );
                        }
                        Outcome::Error(cause) => {
                            warn!(
                                scenario = %entry.scenario,
                                assertion = %assertion.description,
                                %cause,
                                "error"
                            );
                        }
                    }
                    report.record(entry, outcome);
                }
            }
        }
        report
    }
}
