//! Interface to the HTTP test subject collaborator.
//!
//! The engine treats the subject type opaquely; this module is the seam the
//! stock catalog needs from one: an observed [`HttpResponse`] and the
//! [`HttpSubject`] trait for the handful of interactions the shared
//! scenarios perform (authenticate, set a request parameter, expose the
//! latest response). Issuing the real request is entirely the subject's
//! business; the runner treats it as a synchronous call.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;

use crate::error::StepError;

/// The observable response of a performed action: status, content type,
/// headers, body, and (for server-rendered subjects) the template name.
#[derive(Clone, Debug, Serialize)]
pub struct HttpResponse {
    /// HTTP status code.
    pub status: u16,
    /// `Content-Type` of the response, when one was produced.
    pub content_type: Option<String>,
    /// Response headers.
    pub headers: BTreeMap<String, String>,
    /// Raw response body.
    pub body: String,
    /// Name of the server-side template that rendered the response, when the
    /// subject exposes it.
    pub template: Option<String>,
}

impl HttpResponse {
    /// A response with the given status and nothing else.
    #[must_use]
    pub fn new(status: u16) -> Self {
        Self {
            status,
            content_type: None,
            headers: BTreeMap::new(),
            body: String::new(),
            template: None,
        }
    }

    /// Set the content type.
    #[must_use]
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    /// Set the body.
    #[must_use]
    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = body.into();
        self
    }

    /// Add a header.
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Record the rendered template name.
    #[must_use]
    pub fn with_template(mut self, template: impl Into<String>) -> Self {
        self.template = Some(template.into());
        self
    }

    /// Parse the body as JSON.
    ///
    /// # Errors
    ///
    /// Returns a [`StepError`] when the body is not valid JSON.
    pub fn json(&self) -> Result<Value, StepError> {
        serde_json::from_str(&self.body)
            .map_err(|error| StepError::failed(format!("response body is not valid JSON: {error}")))
    }

    /// The `Location` header, when present.
    #[must_use]
    pub fn location(&self) -> Option<&str> {
        self.headers.get("Location").map(String::as_str)
    }

    /// Whether the status is a redirect.
    #[must_use]
    pub fn is_redirect(&self) -> bool { matches!(self.status, 301..=303 | 307 | 308) }
}

/// The interactions the stock scenarios require from a test subject.
///
/// Implementations own the real-world mechanics (issuing the request,
/// session handling); `response` exposes the latest observed response and
/// may perform the request on first call.
pub trait HttpSubject {
    /// Sign the subject's session in as `user`.
    ///
    /// # Errors
    ///
    /// Returns a [`StepError`] when authentication cannot be performed.
    fn authenticate(&mut self, user: &Value) -> Result<(), StepError>;

    /// Set a request parameter for the action under test.
    ///
    /// # Errors
    ///
    /// Returns a [`StepError`] when the parameter cannot be applied.
    fn set_param(&mut self, name: &str, value: Value) -> Result<(), StepError>;

    /// The latest observed response, performing the action if necessary.
    ///
    /// # Errors
    ///
    /// Returns a [`StepError`] when the action fails outright.
    fn response(&mut self) -> Result<&HttpResponse, StepError>;
}
