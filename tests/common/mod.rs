//! Shared stub subjects for the integration suites.
//!
//! [`StubSubject`] stands in for the collaborator performing the real
//! action: it hands back a canned [`HttpResponse`] and records the
//! parameters and authentication the scenarios applied to it.
//! [`TraceSubject`] records the order in which plan entries touch it.

// Items in this shared module may not be used by all test binaries that import it.
#![allow(
    dead_code,
    reason = "shared test utilities are not used by all test binaries"
)]

use std::collections::BTreeMap;

use serde_json::Value;
use specframe::{HttpResponse, HttpSubject, StepError};

/// A subject answering every action with one canned response.
pub struct StubSubject {
    response: HttpResponse,
    /// Request parameters the scenarios set, by name.
    pub params: BTreeMap<String, Value>,
    /// The user the scenarios signed in, when any did.
    pub signed_in_as: Option<Value>,
}

impl StubSubject {
    /// A stub answering with `response`.
    pub fn returning(response: HttpResponse) -> Self {
        Self {
            response,
            params: BTreeMap::new(),
            signed_in_as: None,
        }
    }
}

impl HttpSubject for StubSubject {
    fn authenticate(&mut self, user: &Value) -> Result<(), StepError> {
        self.signed_in_as = Some(user.clone());
        Ok(())
    }

    fn set_param(&mut self, name: &str, value: Value) -> Result<(), StepError> {
        self.params.insert(name.to_owned(), value);
        Ok(())
    }

    fn response(&mut self) -> Result<&HttpResponse, StepError> { Ok(&self.response) }
}

/// A subject that only records the order in which it is touched.
#[derive(Default)]
pub struct TraceSubject {
    /// Event labels in arrival order.
    pub events: Vec<String>,
}

impl TraceSubject {
    /// Append an event label.
    pub fn record(&mut self, event: impl Into<String>) { self.events.push(event.into()); }
}
