//! Data models and structures
//!
//! Defines the wire types for the correction request, the HTTP-style response
//! envelope, and the Bedrock invoke_model request/response bodies.

use crate::prompts::PromptTemplate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Default model used when `MODEL_ID` is not set.
pub const DEFAULT_MODEL_ID: &str = "us.amazon.nova-lite-v1:0";

/// Request body: two base64-encoded files.
#[derive(Debug, Clone, Deserialize)]
pub struct CorrectionRequest {
    #[serde(rename = "pptxFile", default)]
    pub pptx_file: String,
    #[serde(rename = "txtFile", default)]
    pub txt_file: String,
}

/// The platform invocation event. Only `body` participates in the pipeline;
/// the request context carries authorizer claims that are logged and ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct InvocationEvent {
    #[serde(default)]
    pub body: String,
    #[serde(rename = "requestContext", default)]
    pub request_context: Option<RequestContext>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RequestContext {
    #[serde(default)]
    pub authorizer: Option<Authorizer>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Authorizer {
    #[serde(default)]
    pub claims: Option<serde_json::Value>,
}

/// JSON body of every response, success or failure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResponseEnvelope {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ResponseEnvelope {
    pub fn success(response: String) -> Self {
        Self {
            success: true,
            response: Some(response),
            error: None,
        }
    }

    pub fn failure(error: String) -> Self {
        Self {
            success: false,
            response: None,
            error: Some(error),
        }
    }
}

/// HTTP-style response returned to the platform.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpResponse {
    #[serde(rename = "statusCode")]
    pub status_code: u16,
    pub headers: BTreeMap<String, String>,
    pub body: String,
}

/// The fixed header set carried by every response regardless of outcome.
pub fn cors_headers() -> BTreeMap<String, String> {
    let mut headers = BTreeMap::new();
    headers.insert("Content-Type".to_string(), "application/json".to_string());
    headers.insert(
        "Access-Control-Allow-Origin".to_string(),
        "*".to_string(),
    );
    headers.insert(
        "Access-Control-Allow-Headers".to_string(),
        "Content-Type,X-Amz-Date,Authorization,X-Api-Key,X-Amz-Security-Token".to_string(),
    );
    headers.insert(
        "Access-Control-Allow-Methods".to_string(),
        "OPTIONS,POST".to_string(),
    );
    headers
}

impl HttpResponse {
    pub fn ok(envelope: &ResponseEnvelope) -> Self {
        Self::with_status(200, envelope)
    }

    pub fn server_error(envelope: &ResponseEnvelope) -> Self {
        Self::with_status(500, envelope)
    }

    fn with_status(status_code: u16, envelope: &ResponseEnvelope) -> Self {
        Self {
            status_code,
            headers: cors_headers(),
            // ResponseEnvelope has no non-serializable members
            body: serde_json::to_string(envelope).expect("envelope serializes"),
        }
    }
}

// Bedrock invoke_model request body
#[derive(Debug, Serialize)]
pub struct PromptPayload {
    pub messages: Vec<PromptMessage>,
    #[serde(rename = "inferenceConfig")]
    pub inference_config: InferenceConfig,
}

#[derive(Debug, Serialize)]
pub struct PromptMessage {
    pub role: String,
    pub content: Vec<PromptContent>,
}

#[derive(Debug, Serialize)]
pub struct PromptContent {
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct InferenceConfig {
    #[serde(rename = "maxTokens")]
    pub max_tokens: u32,
    #[serde(rename = "stopSequences")]
    pub stop_sequences: Vec<String>,
    pub temperature: f32,
    #[serde(rename = "topP")]
    pub top_p: f32,
}

impl PromptPayload {
    /// Single user-role message with the fixed generation parameters.
    pub fn user(instruction: String) -> Self {
        Self {
            messages: vec![PromptMessage {
                role: "user".to_string(),
                content: vec![PromptContent { text: instruction }],
            }],
            inference_config: InferenceConfig {
                max_tokens: 512,
                stop_sequences: Vec::new(),
                temperature: 0.7,
                top_p: 0.9,
            },
        }
    }
}

// Bedrock invoke_model response body. Every layer is optional so the pipeline
// can report a missing `output.message.content` instead of a parse error.
#[derive(Debug, Deserialize)]
pub struct ModelResponse {
    pub output: Option<ModelOutput>,
}

#[derive(Debug, Deserialize)]
pub struct ModelOutput {
    pub message: Option<OutputMessage>,
}

#[derive(Debug, Deserialize)]
pub struct OutputMessage {
    #[serde(default)]
    pub content: Vec<OutputContent>,
}

#[derive(Debug, Deserialize)]
pub struct OutputContent {
    pub text: Option<String>,
}

impl ModelResponse {
    /// Text of the first content segment, if the response has one.
    pub fn first_text(&self) -> Option<&str> {
        self.output
            .as_ref()?
            .message
            .as_ref()?
            .content
            .first()?
            .text
            .as_deref()
    }
}

// Configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub model_id: String,
    pub template: PromptTemplate,
}

impl Config {
    pub fn from_env() -> crate::Result<Self> {
        dotenvy::dotenv().ok();

        let model_id =
            std::env::var("MODEL_ID").unwrap_or_else(|_| DEFAULT_MODEL_ID.to_string());

        let template = match std::env::var("PROMPT_TEMPLATE") {
            Ok(name) => PromptTemplate::from_name(&name).ok_or_else(|| {
                crate::Error::Config(format!("Unknown PROMPT_TEMPLATE '{}'", name))
            })?,
            Err(_) => PromptTemplate::default(),
        };

        Ok(Self { model_id, template })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_field_renames_and_defaults() {
        let req: CorrectionRequest =
            serde_json::from_str(r#"{"pptxFile":"cHB0eA==","txtFile":"dHh0"}"#).unwrap();
        assert_eq!(req.pptx_file, "cHB0eA==");
        assert_eq!(req.txt_file, "dHh0");

        // A missing field reads as empty so the presence gate catches it.
        let partial: CorrectionRequest = serde_json::from_str(r#"{"pptxFile":"x"}"#).unwrap();
        assert!(partial.txt_file.is_empty());
    }

    #[test]
    fn test_envelope_skips_absent_fields() {
        let ok = serde_json::to_string(&ResponseEnvelope::success("done".to_string())).unwrap();
        assert!(ok.contains("\"success\":true"));
        assert!(ok.contains("\"response\":\"done\""));
        assert!(!ok.contains("error"));

        let err = serde_json::to_string(&ResponseEnvelope::failure("boom".to_string())).unwrap();
        assert!(err.contains("\"success\":false"));
        assert!(err.contains("\"error\":\"boom\""));
        assert!(!err.contains("response"));
    }

    #[test]
    fn test_responses_carry_fixed_cors_headers() {
        let ok = HttpResponse::ok(&ResponseEnvelope::success("x".to_string()));
        let err = HttpResponse::server_error(&ResponseEnvelope::failure("y".to_string()));

        for response in [&ok, &err] {
            assert_eq!(
                response.headers.get("Access-Control-Allow-Origin"),
                Some(&"*".to_string())
            );
            assert_eq!(
                response.headers.get("Access-Control-Allow-Methods"),
                Some(&"OPTIONS,POST".to_string())
            );
            assert_eq!(
                response.headers.get("Access-Control-Allow-Headers"),
                Some(
                    &"Content-Type,X-Amz-Date,Authorization,X-Api-Key,X-Amz-Security-Token"
                        .to_string()
                )
            );
            assert_eq!(
                response.headers.get("Content-Type"),
                Some(&"application/json".to_string())
            );
        }
        assert_eq!(ok.status_code, 200);
        assert_eq!(err.status_code, 500);
    }

    #[test]
    fn test_prompt_payload_wire_format() {
        let payload = PromptPayload::user("fix this".to_string());
        let json: serde_json::Value =
            serde_json::to_value(&payload).unwrap();

        assert_eq!(json["messages"][0]["role"], "user");
        assert_eq!(json["messages"][0]["content"][0]["text"], "fix this");
        assert_eq!(json["inferenceConfig"]["maxTokens"], 512);
        assert_eq!(json["inferenceConfig"]["temperature"], 0.7_f32 as f64);
        assert_eq!(json["inferenceConfig"]["topP"], 0.9_f32 as f64);
        assert_eq!(
            json["inferenceConfig"]["stopSequences"],
            serde_json::json!([])
        );
    }

    #[test]
    fn test_model_response_first_text() {
        let well_formed: ModelResponse = serde_json::from_str(
            r#"{"output":{"message":{"content":[{"text":"X"},{"text":"Y"}]}}}"#,
        )
        .unwrap();
        assert_eq!(well_formed.first_text(), Some("X"));

        let no_output: ModelResponse = serde_json::from_str(r#"{}"#).unwrap();
        assert_eq!(no_output.first_text(), None);

        let empty_content: ModelResponse =
            serde_json::from_str(r#"{"output":{"message":{"content":[]}}}"#).unwrap();
        assert_eq!(empty_content.first_text(), None);

        let textless: ModelResponse =
            serde_json::from_str(r#"{"output":{"message":{"content":[{"image":"..."}]}}}"#)
                .unwrap();
        assert_eq!(textless.first_text(), None);
    }

    #[test]
    fn test_invocation_event_claims_are_optional() {
        let bare: InvocationEvent = serde_json::from_str(r#"{"body":"{}"}"#).unwrap();
        assert!(bare.request_context.is_none());

        let with_claims: InvocationEvent = serde_json::from_str(
            r#"{"body":"{}","requestContext":{"authorizer":{"claims":{"email":"a@b.c"}}}}"#,
        )
        .unwrap();
        let claims = with_claims
            .request_context
            .unwrap()
            .authorizer
            .unwrap()
            .claims
            .unwrap();
        assert_eq!(claims["email"], "a@b.c");
    }
}
