use crate::e2e::helpers;

use helpers::TestContext;
use hyper::StatusCode;
use lingo_gateway::domain::language::{Capability, LanguageSupportTable, ProviderConfig, ProviderKind};
use test_context::test_context;

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_return_ok_for_health_check(ctx: &TestContext) {
    let response = ctx.client.get("/health").await.unwrap();

    response.assert_status(StatusCode::OK);

    // Health endpoint returns plain text
    let body = String::from_utf8(response.body_bytes.clone()).unwrap();
    assert_eq!(body, "OK");
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_report_providers_per_capability(ctx: &TestContext) {
    let response = ctx.client.get("/health/ready").await.unwrap();

    response.assert_status(StatusCode::OK);

    let body = response.body.as_ref().unwrap();
    assert_eq!(body["status"], "ready");
    assert_eq!(body["providers"]["translate"], serde_json::json!(["google"]));
    assert_eq!(body["providers"]["synthesize"], serde_json::json!(["google"]));
    assert_eq!(body["providers"]["transcribe"], serde_json::json!(["google"]));
}

#[tokio::test]
async fn it_should_report_empty_capabilities_for_restricted_tables() {
    let table = LanguageSupportTable::builder()
        .language(
            Capability::Synthesize,
            "hy",
            ProviderConfig::new(ProviderKind::Google),
        )
        .build()
        .unwrap();
    let ctx = TestContext::with_language_table(table).await;

    let response = ctx.client.get("/health/ready").await.unwrap();

    response.assert_status(StatusCode::OK);
    let body = response.body.as_ref().unwrap();
    assert_eq!(body["providers"]["synthesize"], serde_json::json!(["google"]));
    assert_eq!(body["providers"]["translate"], serde_json::json!([]));
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_include_request_id_in_responses(ctx: &TestContext) {
    let response = ctx.client.get("/health").await.unwrap();
    response.assert_header_exists("x-request-id");

    let response = ctx
        .client
        .post("/translate", &serde_json::json!({ "text": "", "target": "fr" }))
        .await
        .unwrap();
    response.assert_header_exists("x-request-id");
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_give_each_request_its_own_id(ctx: &TestContext) {
    let first = ctx.client.get("/health").await.unwrap();
    let second = ctx.client.get("/health").await.unwrap();

    assert_ne!(first.header("x-request-id"), second.header("x-request-id"));
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_handle_concurrent_health_checks(ctx: &TestContext) {
    let mut futures = Vec::new();
    for _ in 0..10 {
        let client = ctx.client.clone();
        futures.push(async move { client.get("/health").await });
    }

    let results = futures::future::join_all(futures).await;

    for result in results {
        let response = result.unwrap();
        response.assert_status(StatusCode::OK);
    }
}
