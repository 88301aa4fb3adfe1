//! Optional convenience imports for common scenario-authoring workflows.
//!
//! This module is intentionally small and focused on high-frequency types.
//! Prefer importing specialised APIs directly from their owning modules.
//!
//! # Examples
//!
//! ```rust
//! use specframe::prelude::*;
//!
//! let registry: ScenarioRegistry<()> = ScenarioRegistry::new();
//! let _ = registry.register(
//!     ScenarioTemplate::new("holds").assertion("holds", |_, _, _| Ok(Outcome::Pass)),
//! );
//! ```

pub use crate::{
    config::{ConfigTree, ResolvedConfig},
    context::{Bindings, Context, Scope},
    error::{ComposeError, RegistryError, ResolveError, StepError},
    http::{HttpResponse, HttpSubject},
    lazy::LazyValue,
    plan::ExecutionPlan,
    registry::ScenarioRegistry,
    runner::{Outcome, Report},
    template::ScenarioTemplate,
};
