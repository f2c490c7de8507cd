//! BedrockClient wire tests against a local HTTP server, using the endpoint
//! override instead of the real service.

use transcript_refiner::inference::{BedrockClient, InferenceService};
use transcript_refiner::models::PromptPayload;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const MODEL_ID: &str = "test-model";
const MODEL_BODY: &str = r#"{"output":{"message":{"content":[{"text":"ok"}]}}}"#;

#[tokio::test]
async fn test_invoke_model_posts_payload_and_returns_raw_body() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(format!("/model/{}/invoke", MODEL_ID)))
        .respond_with(ResponseTemplate::new(200).set_body_raw(MODEL_BODY, "application/json"))
        .expect(1)
        .mount(&server)
        .await;

    let client = BedrockClient::with_endpoint("us-east-1".to_string(), server.uri()).await;

    let payload = PromptPayload::user("correct this".to_string());
    let raw = client
        .invoke(MODEL_ID, serde_json::to_vec(&payload).unwrap())
        .await
        .unwrap();
    assert_eq!(raw, MODEL_BODY.as_bytes());

    // The request body on the wire is the payload JSON, untouched.
    let requests = server.received_requests().await.unwrap();
    let sent: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert_eq!(sent["messages"][0]["content"][0]["text"], "correct this");
    assert_eq!(sent["inferenceConfig"]["maxTokens"], 512);
    assert_eq!(sent["inferenceConfig"]["stopSequences"], serde_json::json!([]));
}

#[tokio::test]
async fn test_service_error_surfaces_as_inference_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500).set_body_raw(
            r#"{"message":"internal failure"}"#,
            "application/json",
        ))
        .mount(&server)
        .await;

    let client = BedrockClient::with_endpoint("us-east-1".to_string(), server.uri()).await;

    let err = client
        .invoke(MODEL_ID, b"{}".to_vec())
        .await
        .unwrap_err();
    assert!(err.to_string().contains("Inference API error"));
}
