mod common;
use common::seeded_client;

use serde_json::json;
use wiremock::matchers::{any, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn error_statuses_map_to_their_kinds_with_a_single_request() {
    for (status, kind) in [
        (401, "authentication"),
        (403, "authorization"),
        (404, "not_found"),
        (500, "http"),
    ] {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/9/teams"))
            .respond_with(ResponseTemplate::new(status))
            .expect(1)
            .mount(&server)
            .await;

        let client = seeded_client(&server.uri());
        let err = client
            .execute("GET", "/9/teams", None, &[])
            .await
            .expect_err("status must map to an error");
        assert_eq!(err.kind(), kind, "status {}", status);
    }
}

#[tokio::test]
async fn unprocessable_entity_carries_the_field_errors() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/1/clients"))
        .respond_with(
            ResponseTemplate::new(422).set_body_json(json!({
                "errors": {"name": ["can't be blank"]}
            })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = seeded_client(&server.uri());
    let err = client
        .execute("POST", "/1/clients", Some(&json!({"client": {}})), &[])
        .await
        .expect_err("422 must fail");
    assert_eq!(err.kind(), "validation");
    assert!(err.to_string().contains("can't be blank"));
}

#[tokio::test]
async fn empty_success_body_becomes_an_empty_object() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/1/projects/4"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let client = seeded_client(&server.uri());
    let result = client
        .execute("DELETE", "/1/projects/4", None, &[])
        .await
        .expect("empty body is a success");
    assert_eq!(result, json!({}));
}

#[tokio::test]
async fn non_json_success_body_is_a_malformed_response() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/1/projects"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>not json</html>"))
        .expect(1)
        .mount(&server)
        .await;

    let client = seeded_client(&server.uri());
    let err = client
        .execute("GET", "/1/projects", None, &[])
        .await
        .expect_err("html body must fail");
    assert_eq!(err.kind(), "malformed_response");
}

#[tokio::test]
async fn unsupported_methods_are_rejected_before_any_network_activity() {
    let server = MockServer::start().await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let client = seeded_client(&server.uri());
    let err = client
        .execute("PATCH", "/1/clients/1", None, &[])
        .await
        .expect_err("PATCH is not supported");
    assert_eq!(err.kind(), "unsupported_method");
}

#[tokio::test]
async fn requests_carry_the_session_token_as_bearer_auth() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/accounts"))
        .and(header("authorization", "Bearer test-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let client = seeded_client(&server.uri());
    client
        .execute("GET", "/accounts", None, &[])
        .await
        .expect("authorized request succeeds");
}
