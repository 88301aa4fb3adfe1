#![doc(html_root_url = "https://docs.rs/specframe/latest")]
//! Public API for the `specframe` library.
//!
//! This crate provides building blocks for reusable, composable test
//! scenarios: named templates with parameters and inclusions, lazily-bound
//! contexts, layered configuration trees, depth-first composition into flat
//! execution plans, and a runner that reports every assertion outcome
//! independently.

pub mod catalog;
mod compose;
pub mod config;
pub mod context;
pub mod error;
pub mod http;
pub mod lazy;
pub mod plan;
pub mod prelude;
pub mod registry;
pub mod runner;
pub mod template;

pub use config::{ConfigNode, ConfigTree, ResolvedConfig};
pub use context::{Bindings, Context, Scope};
pub use error::{ComposeError, RegistryError, ResolveError, StepError};
pub use http::{HttpResponse, HttpSubject};
pub use lazy::{LazyValue, Resolver};
pub use plan::{ExecutionPlan, PlanEntry};
pub use registry::ScenarioRegistry;
pub use runner::{Outcome, Report, ReportEntry};
pub use template::ScenarioTemplate;
