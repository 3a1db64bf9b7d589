use crate::e2e::helpers;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use helpers::api_client::MultipartForm;
use helpers::{TestContext, MAX_UPLOAD_BYTES};
use hyper::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::json;
use test_context::test_context;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, ResponseTemplate};

fn transcript(text: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "results": [ { "alternatives": [ { "transcript": text, "confidence": 0.92 } ] } ]
    }))
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_transcribe_uploaded_audio(ctx: &TestContext) {
    Mock::given(method("POST"))
        .and(path("/v1/speech:recognize"))
        .and(body_partial_json(json!({
            "config": { "encoding": "WEBM_OPUS", "sampleRateHertz": 48000, "languageCode": "en-US" },
            "audio": { "content": STANDARD.encode(b"fake webm audio") }
        })))
        .respond_with(transcript("hello world"))
        .expect(1)
        .mount(&ctx.google)
        .await;

    let form = MultipartForm::new()
        .file("audio", "clip.webm", "audio/webm", b"fake webm audio")
        .text("lang", "en-US");
    let response = ctx.client.post_multipart("/recognize", form).await.unwrap();

    response.assert_status(StatusCode::OK);
    assert_eq!(response.body.unwrap(), json!({ "text": "hello world" }));
    assert_eq!(ctx.stored_uploads(), 0);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_use_default_language_when_none_given(ctx: &TestContext) {
    Mock::given(method("POST"))
        .and(path("/v1/speech:recognize"))
        .and(body_partial_json(json!({ "config": { "languageCode": "hy-AM" } })))
        .respond_with(transcript("բարեւ"))
        .expect(1)
        .mount(&ctx.google)
        .await;

    let form = MultipartForm::new().file("audio", "clip.webm", "audio/webm", b"opus");
    let response = ctx.client.post_multipart("/recognize", form).await.unwrap();

    response.assert_status(StatusCode::OK);
    assert_eq!(response.body.unwrap()["text"], "բարեւ");
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_take_encoding_from_the_upload_content_type(ctx: &TestContext) {
    Mock::given(method("POST"))
        .and(path("/v1/speech:recognize"))
        .and(body_partial_json(json!({ "config": { "encoding": "FLAC" } })))
        .respond_with(transcript("flac audio"))
        .expect(1)
        .mount(&ctx.google)
        .await;

    let form = MultipartForm::new().file("audio", "clip.flac", "audio/flac", b"fLaC");
    let response = ctx.client.post_multipart("/recognize", form).await.unwrap();

    response.assert_status(StatusCode::OK);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_reject_missing_audio_and_store_nothing(ctx: &TestContext) {
    Mock::given(method("POST"))
        .respond_with(transcript("never"))
        .expect(0)
        .mount(&ctx.google)
        .await;

    let form = MultipartForm::new().text("lang", "hy-AM");
    let response = ctx.client.post_multipart("/recognize", form).await.unwrap();

    response
        .assert_status(StatusCode::BAD_REQUEST)
        .assert_error_message("Audio file is required");
    assert_eq!(ctx.stored_uploads(), 0);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_reject_non_multipart_requests(ctx: &TestContext) {
    let response = ctx
        .client
        .post("/recognize", &json!({ "audio": "base64?" }))
        .await
        .unwrap();

    response.assert_status(StatusCode::BAD_REQUEST);
    assert!(response.body.as_ref().unwrap().get("error").is_some());
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_reject_oversized_uploads_and_clean_up(ctx: &TestContext) {
    let audio = vec![0u8; MAX_UPLOAD_BYTES + 1];

    let form = MultipartForm::new().file("audio", "big.webm", "audio/webm", &audio);
    let response = ctx.client.post_multipart("/recognize", form).await.unwrap();

    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(ctx.stored_uploads(), 0);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_clean_up_when_the_provider_fails(ctx: &TestContext) {
    Mock::given(method("POST"))
        .and(path("/v1/speech:recognize"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&ctx.google)
        .await;

    let form = MultipartForm::new().file("audio", "clip.webm", "audio/webm", b"opus");
    let response = ctx.client.post_multipart("/recognize", form).await.unwrap();

    response
        .assert_status(StatusCode::BAD_GATEWAY)
        .assert_error_message("transcribe failed");
    assert_eq!(ctx.stored_uploads(), 0);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_reject_a_second_audio_part(ctx: &TestContext) {
    let form = MultipartForm::new()
        .file("audio", "one.webm", "audio/webm", b"one")
        .file("audio", "two.webm", "audio/webm", b"two");
    let response = ctx.client.post_multipart("/recognize", form).await.unwrap();

    response
        .assert_status(StatusCode::BAD_REQUEST)
        .assert_error_message("Only one audio file");
    assert_eq!(ctx.stored_uploads(), 0);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_isolate_concurrent_uploads(ctx: &TestContext) {
    for (audio, text) in [("first clip", "first"), ("second clip", "second")] {
        Mock::given(method("POST"))
            .and(path("/v1/speech:recognize"))
            .and(body_partial_json(json!({ "audio": { "content": STANDARD.encode(audio) } })))
            .respond_with(transcript(text))
            .expect(1)
            .mount(&ctx.google)
            .await;
    }

    let first = ctx.client.post_multipart(
        "/recognize",
        MultipartForm::new().file("audio", "a.webm", "audio/webm", b"first clip"),
    );
    let second = ctx.client.post_multipart(
        "/recognize",
        MultipartForm::new().file("audio", "b.webm", "audio/webm", b"second clip"),
    );
    let (first, second) = tokio::join!(first, second);

    let first = first.unwrap();
    let second = second.unwrap();
    first.assert_status(StatusCode::OK);
    second.assert_status(StatusCode::OK);
    assert_eq!(first.body.unwrap()["text"], "first");
    assert_eq!(second.body.unwrap()["text"], "second");
    assert_eq!(ctx.stored_uploads(), 0);
}
