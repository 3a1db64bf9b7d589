use crate::e2e::helpers;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use helpers::TestContext;
use hyper::StatusCode;
use lingo_gateway::domain::language::{Capability, LanguageSupportTable, ProviderConfig, ProviderKind};
use lingo_gateway::domain::tts::VoiceGender;
use serde_json::json;
use test_context::test_context;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, ResponseTemplate};

const MP3_BYTES: [u8; 8] = [0xFF, 0xFB, 0x90, 0x00, 0x00, 0x00, 0x00, 0x00];

fn audio_response() -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({ "audioContent": STANDARD.encode(MP3_BYTES) }))
}

/// Speech enabled for Armenian only
fn armenian_only_table() -> LanguageSupportTable {
    LanguageSupportTable::builder()
        .language(
            Capability::Synthesize,
            "hy",
            ProviderConfig::new(ProviderKind::Google)
                .with_locale("hy-AM")
                .with_gender(VoiceGender::Female),
        )
        .build()
        .unwrap()
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_return_raw_mp3_bytes(ctx: &TestContext) {
    Mock::given(method("POST"))
        .and(path("/v1/text:synthesize"))
        .and(body_partial_json(json!({
            "input": { "text": "Hello there" },
            "voice": { "languageCode": "en-US", "ssmlGender": "FEMALE" },
            "audioConfig": { "audioEncoding": "MP3" }
        })))
        .respond_with(audio_response())
        .expect(1)
        .mount(&ctx.google)
        .await;

    let response = ctx
        .client
        .post("/speak", &json!({ "text": "Hello there", "lang": "en-US" }))
        .await
        .unwrap();

    response
        .assert_status(StatusCode::OK)
        .assert_header("content-type", "audio/mpeg")
        .assert_header("x-language", "en-US")
        .assert_header("x-provider", "google");
    assert_eq!(response.body_bytes, MP3_BYTES.to_vec());
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_serve_the_tts_alias(ctx: &TestContext) {
    Mock::given(method("POST"))
        .and(path("/v1/text:synthesize"))
        .respond_with(audio_response())
        .mount(&ctx.google)
        .await;

    let response = ctx
        .client
        .post("/tts", &json!({ "text": "Bonjour", "lang": "fr" }))
        .await
        .unwrap();

    response
        .assert_status(StatusCode::OK)
        .assert_header("content-type", "audio/mpeg");
    assert_eq!(response.body_bytes, MP3_BYTES.to_vec());
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_pass_client_voice_upstream(ctx: &TestContext) {
    Mock::given(method("POST"))
        .and(path("/v1/text:synthesize"))
        .and(body_partial_json(json!({
            "voice": { "languageCode": "hy-AM", "name": "hy-AM-Wavenet-B", "ssmlGender": "MALE" }
        })))
        .respond_with(audio_response())
        .expect(1)
        .mount(&ctx.google)
        .await;

    let response = ctx
        .client
        .post(
            "/speak",
            &json!({ "text": "Բարեւ", "lang": "hy-AM", "voice": "hy-AM-Wavenet-B", "gender": "male" }),
        )
        .await
        .unwrap();

    response.assert_status(StatusCode::OK);
}

#[tokio::test]
async fn it_should_synthesize_the_single_enabled_language() {
    let ctx = TestContext::with_language_table(armenian_only_table()).await;
    Mock::given(method("POST"))
        .and(path("/v1/text:synthesize"))
        .and(body_partial_json(json!({ "voice": { "languageCode": "hy-AM" } })))
        .respond_with(audio_response())
        .expect(1)
        .mount(&ctx.google)
        .await;

    let response = ctx
        .client
        .post("/speak", &json!({ "text": "Բարեւ ձեզ", "lang": "hy" }))
        .await
        .unwrap();

    response
        .assert_status(StatusCode::OK)
        .assert_header("x-language", "hy");
}

#[tokio::test]
async fn it_should_refuse_other_languages_without_calling_provider() {
    let ctx = TestContext::with_language_table(armenian_only_table()).await;
    Mock::given(method("POST"))
        .respond_with(audio_response())
        .expect(0)
        .mount(&ctx.google)
        .await;

    let response = ctx
        .client
        .post("/speak", &json!({ "text": "Hello", "lang": "en" }))
        .await
        .unwrap();

    response
        .assert_status(StatusCode::BAD_REQUEST)
        .assert_error_message("synthesize is not available for language en");
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_reject_missing_text_or_language(ctx: &TestContext) {
    Mock::given(method("POST"))
        .respond_with(audio_response())
        .expect(0)
        .mount(&ctx.google)
        .await;

    let response = ctx
        .client
        .post("/speak", &json!({ "lang": "en" }))
        .await
        .unwrap();
    response
        .assert_status(StatusCode::BAD_REQUEST)
        .assert_error_message("Text cannot be empty");

    let response = ctx
        .client
        .post("/speak", &json!({ "text": "Hello" }))
        .await
        .unwrap();
    response
        .assert_status(StatusCode::BAD_REQUEST)
        .assert_error_message("Language is required");
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_detect_language_for_auto(ctx: &TestContext) {
    Mock::given(method("POST"))
        .and(path("/v1/text:synthesize"))
        .and(body_partial_json(json!({ "voice": { "languageCode": "de" } })))
        .respond_with(audio_response())
        .expect(1)
        .mount(&ctx.google)
        .await;

    let response = ctx
        .client
        .post(
            "/speak",
            &json!({
                "text": "Dies ist ein Test auf Deutsch. Der schnelle braune Fuchs springt über den faulen Hund.",
                "lang": "auto"
            }),
        )
        .await
        .unwrap();

    response
        .assert_status(StatusCode::OK)
        .assert_header("x-language", "de");
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_map_rejected_synthesis_to_bad_gateway(ctx: &TestContext) {
    Mock::given(method("POST"))
        .and(path("/v1/text:synthesize"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": { "code": 400, "message": "Voice 'nope' does not exist." }
        })))
        .mount(&ctx.google)
        .await;

    let response = ctx
        .client
        .post("/speak", &json!({ "text": "Hello", "lang": "en", "voice": "nope" }))
        .await
        .unwrap();

    response
        .assert_status(StatusCode::BAD_GATEWAY)
        .assert_error_message("synthesize failed: upstream rejected the request");
    assert!(!String::from_utf8_lossy(&response.body_bytes).contains("nope"));
}
