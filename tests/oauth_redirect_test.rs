//! # OAuth 重定向流程集成测试

mod common;

use task_client::auth::{Destination, ExecutionContext, FlowState};
use url::Url;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn authorization_leg_navigates_without_leaking_session_token() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let (client, navigator) = common::client_for(&common::config_for(&server, dir.path()));
    client.store.save("session-token").unwrap();

    Mock::given(method("GET"))
        .and(path("/o/oauth2/v2/auth"))
        .and(query_param("response_type", "code"))
        .and(query_param("access_type", "offline"))
        .and(query_param("redirect_uri", "http://localhost:8080/users/grantCode"))
        .respond_with(ResponseTemplate::new(200).set_body_string("https://idp.example/signin?step=1"))
        .expect(1)
        .mount(&server)
        .await;

    let state = client
        .oauth
        .begin_authorization(ExecutionContext::Interactive, navigator.as_ref())
        .await;

    let target = Url::parse("https://idp.example/signin?step=1").unwrap();
    assert!(matches!(&state, FlowState::AuthorizationRequested { target: t } if *t == target));
    assert_eq!(navigator.destinations(), vec![Destination::External(target)]);

    let requests = server.received_requests().await.unwrap();
    assert!(requests[0].headers.get("authorization").is_none());
}

#[tokio::test]
async fn authorization_failure_is_reported_not_retried() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let (client, navigator) = common::client_for(&common::config_for(&server, dir.path()));

    Mock::given(method("GET"))
        .and(path("/o/oauth2/v2/auth"))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&server)
        .await;

    let state = client
        .oauth
        .begin_authorization(ExecutionContext::Interactive, navigator.as_ref())
        .await;

    assert!(state.is_failed());
    assert!(navigator.destinations().is_empty());
}

#[tokio::test]
async fn callback_leg_exchanges_grant_but_does_not_persist() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let (client, _) = common::client_for(&common::config_for(&server, dir.path()));

    Mock::given(method("GET"))
        .and(path("/users/grantCode"))
        .and(query_param("code", "4/0Ab"))
        .and(query_param("scope", "email openid"))
        .and(query_param("authuser", "0"))
        .and(query_param("prompt", "consent"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let callback = Url::parse(
        "http://localhost:4200/redirect?code=4%2F0Ab&scope=email%20openid&authuser=0&prompt=consent",
    )
    .unwrap();
    let state = client
        .oauth
        .handle_callback(ExecutionContext::Interactive, &callback)
        .await;

    assert!(matches!(state, FlowState::SessionEstablished));
    assert!(!client.store.is_authenticated().unwrap());
}

#[tokio::test]
async fn non_interactive_context_issues_nothing() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let (client, navigator) = common::client_for(&common::config_for(&server, dir.path()));

    let state = client
        .oauth
        .begin_authorization(ExecutionContext::NonInteractive, navigator.as_ref())
        .await;

    assert!(matches!(state, FlowState::Idle));
    assert!(server.received_requests().await.unwrap().is_empty());
    assert!(navigator.destinations().is_empty());
}
