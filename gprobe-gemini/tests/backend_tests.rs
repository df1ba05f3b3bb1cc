use std::time::Duration;

use google_cloud_auth::credentials::api_key_credentials;
use gprobe_gemini::{Error, GeminiBuilder, GeminiClient, Model};
use serde_json::json;
use url::Url;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn ok_body(text: &str) -> serde_json::Value {
    json!({
        "candidates": [{
            "content": {"role": "model", "parts": [{"text": text}]},
            "finishReason": "STOP"
        }],
        "usageMetadata": {"promptTokenCount": 12, "candidatesTokenCount": 4, "totalTokenCount": 16}
    })
}

fn studio_client(server: &MockServer) -> GeminiClient {
    let base_url = Url::parse(&format!("{}/v1beta/", server.uri())).unwrap();
    GeminiBuilder::new("test-key").with_base_url(base_url).build().unwrap()
}

fn vertex_client(server: &MockServer) -> GeminiClient {
    let base_url = Url::parse(&format!("{}/v1/", server.uri())).unwrap();
    GeminiBuilder::new_without_api_key()
        .with_google_cloud("demo-project", "us-central1")
        .with_credentials(api_key_credentials::Builder::new("vertex-key").build())
        .with_base_url(base_url)
        .build()
        .unwrap()
}

#[tokio::test]
async fn studio_sends_key_and_generation_config() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1beta/models/gemini-2.0-flash:generateContent"))
        .and(header("x-goog-api-key", "test-key"))
        .and(body_partial_json(json!({
            "contents": [{"role": "user", "parts": [{"text": "Hello"}]}],
            "generationConfig": {"maxOutputTokens": 50}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok_body("API working correctly")))
        .expect(1)
        .mount(&server)
        .await;

    let response = studio_client(&server)
        .generate_content(Model::GEMINI_2_0_FLASH)
        .with_user_message("Hello")
        .with_max_output_tokens(50)
        .with_temperature(0.1)
        .execute()
        .await
        .unwrap();

    assert_eq!(response.try_text().unwrap(), "API working correctly");
    assert_eq!(response.usage_metadata.unwrap().total_token_count, Some(16));
}

#[tokio::test]
async fn vertex_targets_publisher_model_path() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(
            "/v1/projects/demo-project/locations/us-central1/publishers/google/models/gemini-2.0-flash-lite:generateContent",
        ))
        .and(header("x-goog-api-key", "vertex-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok_body("hi")))
        .expect(1)
        .mount(&server)
        .await;

    let client = vertex_client(&server);
    client.check_auth().await.unwrap();
    let response = client
        .generate_content(Model::GEMINI_2_0_FLASH_LITE)
        .with_user_message("Hello")
        .execute()
        .await
        .unwrap();

    assert_eq!(response.text(), "hi");
}

#[tokio::test]
async fn error_status_carries_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(404).set_body_string(
            "Publisher Model `gemini-2.0-flash-exp` was not found or your project does not have access to it.",
        ))
        .mount(&server)
        .await;

    let err = vertex_client(&server)
        .generate_content(Model::GEMINI_2_0_FLASH_EXP)
        .with_user_message("Hello")
        .execute()
        .await
        .unwrap_err();

    match &err {
        Error::BadResponse { code, description } => {
            assert_eq!(*code, 404);
            assert!(description.as_deref().unwrap().contains("was not found"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(!err.is_timeout());
}

#[tokio::test]
async fn slow_response_hits_client_timeout() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(ok_body("late"))
                .set_delay(Duration::from_millis(500)),
        )
        .mount(&server)
        .await;

    let base_url = Url::parse(&format!("{}/v1beta/", server.uri())).unwrap();
    let client = GeminiBuilder::new("test-key")
        .with_base_url(base_url)
        .with_timeout(Duration::from_millis(50))
        .build()
        .unwrap();

    let err = client
        .generate_content(Model::GEMINI_2_0_FLASH)
        .with_user_message("Please write a very detailed analysis")
        .execute()
        .await
        .unwrap_err();

    assert!(err.is_timeout(), "expected timeout, got {err:?}");
}

#[tokio::test]
async fn malformed_body_is_a_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let err = studio_client(&server)
        .generate_content(Model::GEMINI_2_0_FLASH)
        .with_user_message("Hello")
        .execute()
        .await
        .unwrap_err();

    assert!(matches!(err, Error::DecodeResponse { .. }));
}
