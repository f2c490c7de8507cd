//! Request handling for slide-grounded transcript correction.
//!
//! One linear pipeline per invocation: decode the two payloads, extract the
//! slide reference text, build the instruction, call the model once, unwrap
//! the first text segment. Every failure is caught at the `handle` boundary
//! and converted to a 500 envelope.

use crate::inference::{
    extract_region_from_arn, BedrockClient, InferenceService, DEFAULT_REGION,
};
use crate::models::{
    Config, CorrectionRequest, HttpResponse, InvocationEvent, ModelResponse, PromptPayload,
    ResponseEnvelope,
};
use crate::pptx;
use crate::prompts::PromptTemplate;
use crate::{Error, Result};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use tokio::sync::OnceCell;
use tracing::{error, info};

/// Handles one correction request end to end.
pub struct Handler {
    inference: Box<dyn InferenceService>,
    model_id: String,
    template: PromptTemplate,
}

impl Handler {
    /// Build a handler from concrete dependencies.
    ///
    /// This is primarily useful for tests that need to inject a mock
    /// inference client.
    pub fn with_services(
        inference: Box<dyn InferenceService>,
        model_id: String,
        template: PromptTemplate,
    ) -> Self {
        Self {
            inference,
            model_id,
            template,
        }
    }

    /// Construct a handler backed by a Bedrock client in the given region.
    pub async fn from_env(config: Config, region: String) -> Self {
        info!("Initialized Bedrock client in region: {}", region);
        Self::with_services(
            Box::new(BedrockClient::new(region).await),
            config.model_id,
            config.template,
        )
    }

    /// Produce a response envelope for an invocation event. Never fails past
    /// this boundary: every pipeline error becomes a 500 envelope.
    pub async fn handle(&self, event: &InvocationEvent) -> HttpResponse {
        log_caller(event);

        match self.process(&event.body).await {
            Ok(text) => HttpResponse::ok(&ResponseEnvelope::success(text)),
            Err(e) => {
                error!("Request failed: {}", e);
                HttpResponse::server_error(&ResponseEnvelope::failure(e.to_string()))
            }
        }
    }

    async fn process(&self, body: &str) -> Result<String> {
        let request: CorrectionRequest = serde_json::from_str(body)?;

        // Fail before contacting any external service.
        if request.pptx_file.is_empty() || request.txt_file.is_empty() {
            return Err(Error::MissingInput);
        }

        let pptx_bytes = BASE64.decode(&request.pptx_file)?;
        let txt_bytes = BASE64.decode(&request.txt_file)?;
        let transcript = String::from_utf8(txt_bytes)?;

        let reference_text = pptx::extract_text(&pptx_bytes)?;
        if reference_text.is_empty() {
            info!("Presentation has no text shapes; continuing with empty reference");
        }

        let instruction = self.template.render(&reference_text, &transcript);
        let payload = PromptPayload::user(instruction);

        let raw = self
            .inference
            .invoke(&self.model_id, serde_json::to_vec(&payload)?)
            .await?;

        let response: ModelResponse = serde_json::from_slice(&raw)?;
        let text = response.first_text().ok_or(Error::EmptyModelResponse)?;

        Ok(text.to_string())
    }
}

/// Log the upstream-verified caller identity, when present. Claims never
/// influence the pipeline.
fn log_caller(event: &InvocationEvent) {
    let claims = event
        .request_context
        .as_ref()
        .and_then(|ctx| ctx.authorizer.as_ref())
        .and_then(|auth| auth.claims.as_ref());

    if let Some(claims) = claims {
        let who = claims
            .get("email")
            .or_else(|| claims.get("cognito:username"))
            .and_then(|v| v.as_str())
            .unwrap_or("unknown");
        info!("Authenticated user: {}", who);
    }
}

static SHARED: OnceCell<Handler> = OnceCell::const_new();

/// Handler shared by every invocation in this process.
///
/// The inference region is derived from the first invocation's function ARN
/// (falling back to [`DEFAULT_REGION`] for unrecognized shapes) and the built
/// client is reused for as long as the execution environment lives.
pub async fn shared_handler(invoked_function_arn: &str) -> Result<&'static Handler> {
    SHARED
        .get_or_try_init(|| async {
            let config = Config::from_env()?;
            let region = extract_region_from_arn(invoked_function_arn)
                .unwrap_or(DEFAULT_REGION)
                .to_string();
            Ok(Handler::from_env(config, region).await)
        })
        .await
}
