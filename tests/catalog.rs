//! Integration tests for the stock scenario catalog.

mod common;

use common::StubSubject;
use rstest::rstest;
use serde_json::json;
use specframe::{
    Bindings, ConfigTree, HttpResponse, Outcome, ScenarioRegistry,
    catalog::{self, AUTHENTICATION_ERROR_MESSAGE},
};

fn registry() -> ScenarioRegistry<StubSubject> {
    catalog::standard_registry().expect("stock names are fresh")
}

fn unauthorized_json_response() -> HttpResponse {
    HttpResponse::new(401)
        .with_content_type("application/json; charset=utf-8")
        .with_body(json!({ "error": AUTHENTICATION_ERROR_MESSAGE }).to_string())
}

#[test]
fn get_index_json_signed_out_passes_against_a_rejecting_subject() {
    let registry = registry();
    let plan = registry
        .instantiate("GET index JSON (signed out)", Bindings::new(), None)
        .unwrap();
    let mut subject = StubSubject::returning(unauthorized_json_response());

    let report = plan.run(&mut subject);
    assert!(report.passed(), "report: {report:?}");
    assert_eq!(subject.params.get("format"), Some(&json!("json")));
}

#[test]
fn get_index_json_signed_in_authenticates_and_checks_the_body() {
    let registry = registry();
    let plan = registry
        .instantiate(
            "GET index JSON (signed in)",
            Bindings::new()
                .bind("current_user", json!({ "id": 7, "email": "a@example.com" }))
                .bind("expected_json", json!([{ "id": 1 }])),
            None,
        )
        .unwrap();
    let mut subject = StubSubject::returning(
        HttpResponse::new(200)
            .with_content_type("application/json")
            .with_body(r#"[{"id":1}]"#),
    );

    let report = plan.run(&mut subject);
    assert!(report.passed(), "report: {report:?}");
    assert_eq!(
        subject.signed_in_as,
        Some(json!({ "id": 7, "email": "a@example.com" }))
    );
    assert_eq!(subject.params.get("format"), Some(&json!("json")));
}

#[test]
fn action_ending_with_status_defaults_to_200() {
    let registry = registry();
    let plan = registry
        .instantiate("action ending with status", Bindings::new(), None)
        .unwrap();
    let mut subject = StubSubject::returning(HttpResponse::new(200));

    assert!(plan.run(&mut subject).passed());
}

#[test]
fn action_ending_with_status_reports_the_mismatch() {
    let registry = registry();
    let plan = registry
        .instantiate(
            "action ending with status",
            Bindings::new().bind("status", 201),
            None,
        )
        .unwrap();
    let mut subject = StubSubject::returning(HttpResponse::new(422));

    let report = plan.run(&mut subject);
    assert_eq!(
        report.entries()[0].outcome,
        Outcome::Fail("expected 201 got 422".to_owned())
    );
}

#[test]
fn html_action_requiring_login_checks_the_redirect_target() {
    let registry = registry();
    let plan = registry
        .instantiate("HTML action requiring login", Bindings::new(), None)
        .unwrap();

    let mut redirected = StubSubject::returning(
        HttpResponse::new(302).with_header("Location", "/users/sign_in"),
    );
    assert!(plan.run(&mut redirected).passed());

    let mut elsewhere = StubSubject::returning(
        HttpResponse::new(302).with_header("Location", "/dashboard"),
    );
    assert!(!plan.run(&mut elsewhere).passed());
}

#[test]
fn action_rendering_template_defaults_to_the_action_name() {
    let registry = registry();
    let plan = registry
        .instantiate(
            "action rendering template",
            Bindings::new().bind("action_name", "index"),
            None,
        )
        .unwrap();
    let mut subject = StubSubject::returning(HttpResponse::new(200).with_template("index"));

    assert!(plan.run(&mut subject).passed());
}

#[test]
fn action_rendering_template_honours_a_case_override() {
    let registry = registry();
    let plan = registry
        .instantiate(
            "action rendering template",
            Bindings::new().bind("action_name", "index"),
            Some(ConfigTree::new().set("template", "custom/listing")),
        )
        .unwrap();
    let mut subject =
        StubSubject::returning(HttpResponse::new(200).with_template("custom/listing"));

    assert!(plan.run(&mut subject).passed());
}

#[rstest]
#[case("JSON POST create succeeds", 201)]
#[case("JSON PUT update succeeds", 200)]
#[case("JSON DELETE destroy succeeds", 200)]
fn crud_successes_check_their_status(#[case] scenario: &str, #[case] status: u16) {
    let registry = registry();
    let plan = registry.instantiate(scenario, Bindings::new(), None).unwrap();
    let mut subject = StubSubject::returning(
        HttpResponse::new(status).with_content_type("application/json"),
    );

    let report = plan.run(&mut subject);
    assert!(report.passed(), "report: {report:?}");
}

#[test]
fn json_action_requiring_login_rejects_a_wrong_body() {
    let registry = registry();
    let plan = registry
        .instantiate("JSON action requiring login", Bindings::new(), None)
        .unwrap();
    let mut subject = StubSubject::returning(
        HttpResponse::new(401)
            .with_content_type("application/json")
            .with_body(r#"{"error":"something else"}"#),
    );

    let report = plan.run(&mut subject);
    assert!(!report.passed());
    // Status and content type still pass; only the body check fails.
    let outcomes: Vec<_> = report.outcomes().collect();
    assert_eq!(outcomes.len(), 3);
    assert!(outcomes[0].is_pass());
    assert!(outcomes[1].is_pass());
    assert!(matches!(outcomes[2], Outcome::Fail(_)));
}
