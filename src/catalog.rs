//! Stock scenario vocabulary for HTTP subjects.
//!
//! The shared templates every suite reaches for: status and JSON-shape
//! checks, login requirements, request-format and authentication fragments,
//! and the composed CRUD successes. [`install`] registers them against any
//! registry whose subject implements [`HttpSubject`];
//! [`standard_registry`] builds a registry carrying them together with
//! [`default_config`].
//!
//! Status codes and the canned authentication error live in
//! [`default_config`] so individual suites and cases can override them.

use serde_json::{Value, json};

use crate::{
    config::ConfigTree,
    context::Bindings,
    error::{RegistryError, StepError},
    http::HttpSubject,
    lazy::LazyValue,
    registry::ScenarioRegistry,
    runner::Outcome,
    template::ScenarioTemplate,
};

/// Status answered when authentication is required and missing.
pub const AUTHENTICATION_FAIL_STATUS: u16 = 401;
/// Canned body message accompanying an authentication failure.
pub const AUTHENTICATION_ERROR_MESSAGE: &str =
    "You need to sign in or sign up before continuing.";
/// Path unauthenticated HTML requests are redirected to.
pub const SIGN_IN_PATH: &str = "/users/sign_in";
/// Status answered when authorization is denied.
pub const AUTHORIZATION_FAIL_STATUS: u16 = 403;
/// Status of a successful create.
pub const CREATE_SUCCESS_STATUS: u16 = 201;
/// Status of a create rejected as unprocessable.
pub const CREATE_FAIL_STATUS: u16 = 422;
/// Status of a successful update.
pub const UPDATE_SUCCESS_STATUS: u16 = 200;
/// Status of an update rejected as unprocessable.
pub const UPDATE_FAIL_STATUS: u16 = 422;
/// Status of a successful destroy.
pub const DESTROY_SUCCESS_STATUS: u16 = 200;

/// The default configuration tree the stock scenarios consult.
///
/// Overridable per suite (registry defaults), per scenario (template
/// overrides), and per case (instantiation overrides), rightmost wins.
#[must_use]
pub fn default_config() -> ConfigTree {
    ConfigTree::new()
        .set("authentication.fail_status", AUTHENTICATION_FAIL_STATUS)
        .set(
            "authentication.json",
            json!({ "error": AUTHENTICATION_ERROR_MESSAGE }),
        )
        .set("authentication.sign_in_path", SIGN_IN_PATH)
        .set("authorization.fail_status", AUTHORIZATION_FAIL_STATUS)
        .set("create.success_status", CREATE_SUCCESS_STATUS)
        .set("create.fail_status", CREATE_FAIL_STATUS)
        .set("update.success_status", UPDATE_SUCCESS_STATUS)
        .set("update.fail_status", UPDATE_FAIL_STATUS)
        .set("destroy.success_status", DESTROY_SUCCESS_STATUS)
}

/// A registry pre-loaded with [`default_config`] and the stock templates.
///
/// # Errors
///
/// Returns a [`RegistryError`] if a stock name is somehow already taken;
/// with a fresh registry this cannot happen.
pub fn standard_registry<S: HttpSubject>() -> Result<ScenarioRegistry<S>, RegistryError> {
    let registry = ScenarioRegistry::with_defaults(default_config());
    install(&registry)?;
    Ok(registry)
}

/// Register the stock templates into `registry`.
///
/// # Errors
///
/// Returns [`RegistryError::DuplicateScenario`] if any stock name is already
/// registered.
pub fn install<S: HttpSubject>(registry: &ScenarioRegistry<S>) -> Result<(), RegistryError> {
    registry.register(
        ScenarioTemplate::new("format: json")
            .setup("set request format to json", |subject: &mut S, _, _| {
                subject.set_param("format", Value::from("json"))
            }),
    )?;

    registry.register(
        ScenarioTemplate::new("format: html")
            .setup("set request format to html", |subject: &mut S, _, _| {
                subject.set_param("format", Value::from("html"))
            }),
    )?;

    registry.register(
        ScenarioTemplate::new("authenticated")
            .parameter("current_user")
            .setup("sign in as the current user", |subject: &mut S, scope, _| {
                let user = scope.get("current_user")?;
                subject.authenticate(&user)
            }),
    )?;

    registry.register(
        ScenarioTemplate::new("action ending with status")
            .parameter("status")
            .assertion(
                "answers with the expected status",
                |subject: &mut S, scope, _| {
                    let expected = if scope.has("status") {
                        status_code(&scope.get("status")?)?
                    } else {
                        200
                    };
                    let actual = subject.response()?.status;
                    Ok(if actual == expected {
                        Outcome::Pass
                    } else {
                        Outcome::fail(format!("expected {expected} got {actual}"))
                    })
                },
            ),
    )?;

    registry.register(
        ScenarioTemplate::new("action rendering json")
            .include("action ending with status", Bindings::new())
            .assertion("renders a JSON content type", |subject: &mut S, _, _| {
                let response = subject.response()?;
                Ok(match &response.content_type {
                    Some(content_type) if content_type.contains("application/json") => {
                        Outcome::Pass
                    }
                    Some(content_type) => {
                        Outcome::fail(format!("expected a JSON content type, got {content_type}"))
                    }
                    None => Outcome::fail("response carries no content type"),
                })
            })
            .assertion(
                "renders the expected JSON body",
                |subject: &mut S, scope, _| {
                    // Skipped entirely when no expectation is bound.
                    if !scope.has("expected_json") {
                        return Ok(Outcome::Pass);
                    }
                    let expected = scope.get("expected_json")?;
                    let actual = subject.response()?.json()?;
                    Ok(if actual == expected {
                        Outcome::Pass
                    } else {
                        Outcome::fail(format!("expected JSON body {expected}, got {actual}"))
                    })
                },
            ),
    )?;

    registry.register(
        ScenarioTemplate::new("JSON action requiring login").include(
            "action rendering json",
            Bindings::new()
                .bind("status", AUTHENTICATION_FAIL_STATUS)
                .bind("expected_json", json!({ "error": AUTHENTICATION_ERROR_MESSAGE })),
        ),
    )?;

    registry.register(
        ScenarioTemplate::new("HTML action requiring login").assertion(
            "redirects to the sign-in path",
            |subject: &mut S, _, config| {
                let expected = config
                    .str("authentication.sign_in_path")
                    .unwrap_or(SIGN_IN_PATH)
                    .to_owned();
                let response = subject.response()?;
                if !response.is_redirect() {
                    return Ok(Outcome::fail(format!(
                        "expected a redirect, got status {}",
                        response.status
                    )));
                }
                Ok(match response.location() {
                    Some(location) if location == expected => Outcome::Pass,
                    Some(location) => {
                        Outcome::fail(format!("expected redirect to {expected}, got {location}"))
                    }
                    None => Outcome::fail("redirect carries no Location header"),
                })
            },
        ),
    )?;

    registry.register(
        ScenarioTemplate::new("action rendering template")
            .parameter("action_name")
            .config(
                // Defaults to the action's own name; case config may pin a
                // literal template instead.
                ConfigTree::new()
                    .set_lazy("template", LazyValue::computed(|scope| scope.get("action_name"))),
            )
            .assertion(
                "renders the configured template",
                |subject: &mut S, _, config| {
                    let Some(expected) = config.str("template").map(str::to_owned) else {
                        return Ok(Outcome::Error("no template configured".to_owned()));
                    };
                    let response = subject.response()?;
                    Ok(match &response.template {
                        Some(template) if *template == expected => Outcome::Pass,
                        Some(template) => Outcome::fail(format!(
                            "expected template {expected}, rendered {template}"
                        )),
                        None => Outcome::fail("no template was rendered"),
                    })
                },
            ),
    )?;

    registry.register(
        ScenarioTemplate::new("GET index JSON (signed out)")
            .include("format: json", Bindings::new())
            .include("JSON action requiring login", Bindings::new()),
    )?;

    registry.register(
        ScenarioTemplate::new("GET index JSON (signed in)")
            .parameter("current_user")
            .include("format: json", Bindings::new())
            .include("authenticated", Bindings::new())
            .include("action rendering json", Bindings::new()),
    )?;

    registry.register(
        ScenarioTemplate::new("JSON POST create succeeds").include(
            "action rendering json",
            Bindings::new().bind("status", CREATE_SUCCESS_STATUS),
        ),
    )?;

    registry.register(
        ScenarioTemplate::new("JSON PUT update succeeds").include(
            "action rendering json",
            Bindings::new().bind("status", UPDATE_SUCCESS_STATUS),
        ),
    )?;

    registry.register(
        ScenarioTemplate::new("JSON DELETE destroy succeeds").include(
            "action rendering json",
            Bindings::new().bind("status", DESTROY_SUCCESS_STATUS),
        ),
    )?;

    Ok(())
}

fn status_code(value: &Value) -> Result<u16, StepError> {
    value
        .as_u64()
        .and_then(|status| u16::try_from(status).ok())
        .ok_or_else(|| StepError::failed(format!("not a status code: {value}")))
}
