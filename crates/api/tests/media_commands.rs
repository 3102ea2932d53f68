//! Script and video generation commands against a mocked media API.

mod support;

use serde_json::json;
use tokio_util::sync::CancellationToken;
use vioshop_domain::{GenerationOptions, IntegrationError, Language};
use vioshop_lib::{generate_asset, generate_business_description, generate_script};
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use support::{create_context_with_keys, create_test_context, product, static_keys, MEDIA_KEY};

#[tokio::test]
async fn generate_script_returns_model_text() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1beta/models/text-test:generateContent"))
        .and(header("x-goog-api-key", MEDIA_KEY))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{ "content": { "parts": [{ "text": "Stop scrolling!" }] } }]
        })))
        .expect(1)
        .mount(&server)
        .await;
    let t = create_test_context(&server).await;

    let script = generate_script(&t.ctx, &product("1"), Some("Beauty")).await.unwrap();
    assert_eq!(script, "Stop scrolling!");

    let requests = server.received_requests().await.expect("request recording enabled");
    let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
    let prompt = body["contents"][0]["parts"][0]["text"].as_str().unwrap();
    assert!(prompt.contains("Product 1"));
    assert!(prompt.contains("Beauty"));
}

#[tokio::test]
async fn business_description_uses_requested_language() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1beta/models/text-test:generateContent"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{ "content": { "parts": [{ "text": "  AI-driven agency.  " }] } }]
        })))
        .expect(1)
        .mount(&server)
        .await;
    let t = create_test_context(&server).await;

    let text = generate_business_description(&t.ctx, Language::En).await.unwrap();
    assert_eq!(text, "AI-driven agency.");

    let requests = server.received_requests().await.expect("request recording enabled");
    let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
    let prompt = body["contents"][0]["parts"][0]["text"].as_str().unwrap();
    assert!(prompt.starts_with("Write a professional business description"));
}

#[tokio::test]
async fn generate_asset_runs_submit_poll_fetch() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1beta/models/veo-test:predictLongRunning"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "name": "operations/op-9" })),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1beta/operations/op-9"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "name": "operations/op-9",
            "done": true,
            "response": {
                "generateVideoResponse": {
                    "generatedSamples": [{
                        "video": { "uri": format!("{}/files/op-9.mp4", server.uri()) }
                    }]
                }
            }
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/files/op-9.mp4"))
        .and(query_param("key", MEDIA_KEY))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"video".to_vec()))
        .expect(1)
        .mount(&server)
        .await;
    let t = create_test_context(&server).await;

    let asset = generate_asset(
        &t.ctx,
        "Meet the lamp that changes your desk.",
        &GenerationOptions::default(),
        &CancellationToken::new(),
    )
    .await
    .unwrap();

    assert_eq!(asset.bytes, b"video".to_vec());
}

#[tokio::test]
async fn generate_asset_without_key_makes_no_request() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;
    let t = create_context_with_keys(&server, static_keys(None)).await;

    let err = generate_asset(
        &t.ctx,
        "script",
        &GenerationOptions::default(),
        &CancellationToken::new(),
    )
    .await
    .unwrap_err();

    assert!(matches!(err, IntegrationError::Unauthenticated(_)));
}

#[tokio::test]
async fn cancelled_generation_stops_before_submit() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;
    let t = create_test_context(&server).await;

    let cancel = CancellationToken::new();
    cancel.cancel();
    let err = generate_asset(&t.ctx, "script", &GenerationOptions::default(), &cancel)
        .await
        .unwrap_err();

    assert_eq!(err, IntegrationError::Cancelled);
}
